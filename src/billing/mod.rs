//! Recurring-billing engine: cycles, renewal dates, cost accumulation and statistics.
//!
//! Every function here is pure. "Today" is always passed in by the caller.

pub mod calendar;
pub mod cost;
pub mod cycle;
pub mod options;
pub mod record;
pub mod renewal;
pub mod statistics;

pub use calendar::{days_between, CalendarSpan};
pub use cost::{
    accumulate_cost, average_daily_cost, average_monthly_cost, cycle_daily_rate,
    cycle_monthly_rate, elapsed_months, format_elapsed_duration, CostAccumulation,
    AVERAGE_DAYS_PER_MONTH,
};
pub use cycle::{months_per_cycle, normalize_cycle, CycleDefinition, CycleKind};
pub use options::{build_renewal_options, renewal_label, renewal_option_counts, RenewalOption};
pub use record::SubscriptionRecord;
pub use renewal::{advance_cycles, next_renewal_on_or_after, CycleBoundaries};
pub use statistics::{
    aggregate_global_statistics, compute_statistics, renewal_state, GlobalStatistics,
    RenewalState, Statistics,
};
