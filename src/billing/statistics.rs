//! Per-record and collection-wide statistics.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calendar::days_between;
use super::cost::{
    accumulate_cost, average_daily_cost, average_monthly_cost, cycle_daily_rate,
    cycle_monthly_rate, elapsed_months, format_elapsed_duration,
};
use super::record::SubscriptionRecord;
use super::renewal::advance_cycles;

/// Derived figures for a single subscription as of a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub accumulated_cost: Decimal,
    pub accumulated_duration_label: String,
    pub average_monthly_cost: Decimal,
    pub average_daily_cost: Decimal,
    pub completed_cycle_count: u32,
    pub days_until_renewal: i64,
    pub is_overdue: bool,
}

/// Totals over a collection of subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStatistics {
    pub total_daily_cost: Decimal,
    pub total_monthly_cost: Decimal,
    pub active_count: usize,
    pub overdue_count: usize,
    pub paused_count: usize,
    pub one_time_purchase_total_value: Decimal,
    pub one_time_purchase_daily_value: Decimal,
    pub total_subscriptions: usize,
    pub total_cost: Decimal,
}

impl GlobalStatistics {
    /// Contribution of a single record.
    pub fn from_record(record: &SubscriptionRecord, today: NaiveDate) -> Self {
        let mut totals = GlobalStatistics {
            total_subscriptions: 1,
            ..GlobalStatistics::default()
        };
        if record.is_active && !record.is_paused {
            totals.active_count = 1;
        }
        if record.is_paused {
            totals.paused_count = 1;
        }

        let stats = compute_statistics(record, today);
        if record.one_time {
            totals.one_time_purchase_daily_value = stats.average_daily_cost;
            totals.one_time_purchase_total_value = stats.accumulated_cost;
            totals.total_cost = stats.accumulated_cost;
            return totals;
        }

        if stats.is_overdue {
            totals.overdue_count = 1;
        }
        totals.total_daily_cost = stats.average_daily_cost;
        totals.total_monthly_cost = stats.average_monthly_cost;
        totals.total_cost = stats.accumulated_cost;
        totals
    }

    /// Folds another partial aggregation into this one.
    pub fn merge(mut self, other: GlobalStatistics) -> Self {
        self.total_daily_cost += other.total_daily_cost;
        self.total_monthly_cost += other.total_monthly_cost;
        self.active_count += other.active_count;
        self.overdue_count += other.overdue_count;
        self.paused_count += other.paused_count;
        self.one_time_purchase_total_value += other.one_time_purchase_total_value;
        self.one_time_purchase_daily_value += other.one_time_purchase_daily_value;
        self.total_subscriptions += other.total_subscriptions;
        self.total_cost += other.total_cost;
        self
    }
}

/// Lifecycle position of a subscription on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenewalState {
    Future,
    Active,
    Overdue,
    Paused,
}

pub fn renewal_state(record: &SubscriptionRecord, today: NaiveDate) -> RenewalState {
    if record.is_paused {
        RenewalState::Paused
    } else if today < record.start_date {
        RenewalState::Future
    } else if record.is_recurring() && today > record.next_renewal_date {
        RenewalState::Overdue
    } else {
        RenewalState::Active
    }
}

/// Computes the per-record statistics as of `today`.
///
/// Until the first cycle has finished, averages come from the cycle price itself; afterwards
/// they come from the accumulated cost spread over the elapsed time.
///
/// A one-time purchase is paid once: its price is amortized over the days owned (at least one)
/// and it never has a renewal due.
pub fn compute_statistics(record: &SubscriptionRecord, today: NaiveDate) -> Statistics {
    if record.one_time {
        return one_time_statistics(record, today);
    }
    let accumulation = accumulate_cost(record.start_date, &record.cycle, today, record.price);
    let days_until_renewal = days_between(today, record.next_renewal_date);
    let first_cycle_end = advance_cycles(record.start_date, &record.cycle, 1);

    let (average_monthly, average_daily) = if today < first_cycle_end {
        (
            cycle_monthly_rate(&record.cycle, record.price),
            cycle_daily_rate(&record.cycle, record.price),
        )
    } else {
        (
            average_monthly_cost(
                accumulation.cost,
                elapsed_months(record.start_date, today),
            ),
            average_daily_cost(accumulation.cost, days_between(record.start_date, today)),
        )
    };

    Statistics {
        accumulated_cost: accumulation.cost,
        accumulated_duration_label: format_elapsed_duration(record.start_date, today),
        average_monthly_cost: average_monthly,
        average_daily_cost: average_daily,
        completed_cycle_count: accumulation.cycles_completed,
        days_until_renewal,
        is_overdue: days_until_renewal < 0,
    }
}

fn one_time_statistics(record: &SubscriptionRecord, today: NaiveDate) -> Statistics {
    let days_owned = days_between(record.start_date, today).max(1);
    let months_owned = elapsed_months(record.start_date, today).max(Decimal::ONE);
    Statistics {
        accumulated_cost: record.price,
        accumulated_duration_label: format_elapsed_duration(record.start_date, today),
        average_monthly_cost: record.price / months_owned,
        average_daily_cost: record.price / Decimal::from(days_owned),
        completed_cycle_count: 0,
        days_until_renewal: 0,
        is_overdue: false,
    }
}

/// Aggregates statistics over `records`. Never fails; an empty slice yields all zeros.
pub fn aggregate_global_statistics(
    records: &[SubscriptionRecord],
    today: NaiveDate,
) -> GlobalStatistics {
    let totals = records
        .iter()
        .map(|record| GlobalStatistics::from_record(record, today))
        .fold(GlobalStatistics::default(), GlobalStatistics::merge);
    tracing::debug!(
        records = records.len(),
        active = totals.active_count,
        overdue = totals.overdue_count,
        paused = totals.paused_count,
        "aggregated subscription statistics"
    );
    totals
}
