#![doc(test(attr(deny(warnings))))]

//! Subtrack Core computes renewal dates, overdue status, accumulated cost and amortized
//! rates for tracked subscriptions, plus the record store and CLI plumbing around them.

pub mod billing;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod storage;
pub mod utils;

pub use billing::{
    accumulate_cost, advance_cycles, aggregate_global_statistics, average_daily_cost,
    average_monthly_cost, build_renewal_options, compute_statistics, format_elapsed_duration,
    next_renewal_on_or_after, normalize_cycle, renewal_option_counts, CycleDefinition, CycleKind,
    GlobalStatistics, RenewalOption, Statistics, SubscriptionRecord,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subtrack Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
