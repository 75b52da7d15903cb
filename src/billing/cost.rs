//! Historical cost accumulation and amortized rates.
//!
//! No transaction ledger backs these numbers. Accumulated cost assumes the subscription was
//! billed once at the start of every cycle, at full price and without proration.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calendar::{days_between, CalendarSpan};
use super::cycle::CycleDefinition;
use super::renewal::CycleBoundaries;

/// Average calendar month length used for month/day rate conversions.
pub const AVERAGE_DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);

/// Result of walking cycle boundaries up to a reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostAccumulation {
    pub cost: Decimal,
    pub cycles_completed: u32,
}

/// Sums `price_per_cycle` for every cycle boundary `start + k * cycle` (k >= 0) that falls on or
/// before `reference`.
///
/// Returns zero when `reference <= start`: nothing has been billed before a day has elapsed.
pub fn accumulate_cost(
    start: NaiveDate,
    cycle: &CycleDefinition,
    reference: NaiveDate,
    price_per_cycle: Decimal,
) -> CostAccumulation {
    if reference <= start {
        return CostAccumulation::default();
    }
    let mut cycles_completed = 0u32;
    for (_, boundary) in CycleBoundaries::new(start, cycle) {
        if boundary > reference {
            break;
        }
        cycles_completed = cycles_completed.saturating_add(1);
        if cycles_completed == u32::MAX {
            break;
        }
    }
    CostAccumulation {
        cost: price_per_cycle * Decimal::from(cycles_completed),
        cycles_completed,
    }
}

/// Renders the calendar period between two dates, e.g. `"1 year 2 months 3 days"`.
pub fn format_elapsed_duration(start: NaiveDate, reference: NaiveDate) -> String {
    let span = CalendarSpan::between(start, reference);
    if span.is_zero() {
        return "0 days".into();
    }
    let parts: Vec<String> = [
        (span.years, "year", "years"),
        (span.months, "month", "months"),
        (span.days, "day", "days"),
    ]
    .into_iter()
    .filter(|(value, _, _)| *value > 0)
    .map(|(value, singular, plural)| pluralize(value, singular, plural))
    .collect();
    parts.join(" ")
}

/// Elapsed time expressed in average-length months.
pub fn elapsed_months(start: NaiveDate, reference: NaiveDate) -> Decimal {
    let days = days_between(start, reference);
    if days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(days) / AVERAGE_DAYS_PER_MONTH
}

pub fn average_monthly_cost(accumulated: Decimal, elapsed_months: Decimal) -> Decimal {
    if elapsed_months <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    accumulated / elapsed_months.max(Decimal::ONE)
}

pub fn average_daily_cost(accumulated: Decimal, elapsed_days: i64) -> Decimal {
    if elapsed_days <= 0 {
        return Decimal::ZERO;
    }
    accumulated / Decimal::from(elapsed_days.max(1))
}

/// Monthly-equivalent price of one cycle.
pub fn cycle_monthly_rate(cycle: &CycleDefinition, price_per_cycle: Decimal) -> Decimal {
    price_per_cycle / Decimal::from(cycle.months().max(1))
}

/// Daily-equivalent price of one cycle, using [`AVERAGE_DAYS_PER_MONTH`].
pub fn cycle_daily_rate(cycle: &CycleDefinition, price_per_cycle: Decimal) -> Decimal {
    cycle_monthly_rate(cycle, price_per_cycle) / AVERAGE_DAYS_PER_MONTH
}

pub(crate) fn pluralize(value: u32, singular: &str, plural: &str) -> String {
    if value == 1 {
        format!("{} {}", value, singular)
    } else {
        format!("{} {}", value, plural)
    }
}
