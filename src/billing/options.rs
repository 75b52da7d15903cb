//! Manual renewal choices offered for non auto-renewing subscriptions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::cost::pluralize;
use super::cycle::{CycleDefinition, CycleKind};
use super::renewal::advance_cycles;

const MONTHLY_COUNTS: [u32; 4] = [1, 3, 6, 12];
const QUARTERLY_COUNTS: [u32; 3] = [1, 2, 4];
const YEARLY_COUNTS: [u32; 3] = [1, 2, 3];

/// A priced "renew for N cycles" choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewalOption {
    pub cycle_count: u32,
    pub label: String,
    pub total_cost: Decimal,
    pub new_renewal_date: NaiveDate,
}

/// Candidate cycle counts for a cycle kind, ascending.
pub fn renewal_option_counts(kind: CycleKind) -> &'static [u32] {
    match kind {
        CycleKind::Monthly => &MONTHLY_COUNTS,
        CycleKind::Quarterly => &QUARTERLY_COUNTS,
        CycleKind::Yearly => &YEARLY_COUNTS,
    }
}

/// Expands [`renewal_option_counts`] into priced options renewing from `base`.
pub fn build_renewal_options(
    base: NaiveDate,
    cycle: &CycleDefinition,
    price_per_cycle: Decimal,
) -> Vec<RenewalOption> {
    renewal_option_counts(cycle.kind())
        .iter()
        .map(|&count| RenewalOption {
            cycle_count: count,
            label: renewal_label(cycle, count),
            total_cost: price_per_cycle * Decimal::from(count),
            new_renewal_date: advance_cycles(base, cycle, count),
        })
        .collect()
}

/// Human label for `count` cycles, in units of the cycle kind ("6 months", "1 year").
pub fn renewal_label(cycle: &CycleDefinition, count: u32) -> String {
    let (singular, plural) = cycle.kind().unit_names();
    pluralize(cycle.duration().saturating_mul(count), singular, plural)
}
