//! Record-level operations that keep derived renewal data consistent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::billing::{
    aggregate_global_statistics, build_renewal_options, compute_statistics, renewal_state,
    CycleDefinition, GlobalStatistics, RenewalOption, RenewalState, Statistics,
    SubscriptionRecord,
};
use crate::core::Portfolio;

use super::{ServiceError, ServiceResult};

pub struct SubscriptionService;

impl SubscriptionService {
    /// Adds a recurring subscription, scheduling its first renewal relative to `today`.
    pub fn add(
        portfolio: &mut Portfolio,
        name: &str,
        price: Decimal,
        cycle: CycleDefinition,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<Uuid> {
        validate_name(name)?;
        validate_price(price)?;
        let record = SubscriptionRecord::new(name.trim(), price, cycle, start_date, today);
        tracing::info!(
            name = %record.name,
            cycle = %record.cycle,
            next_renewal = %record.next_renewal_date,
            "added subscription"
        );
        Ok(portfolio.add_record(record))
    }

    /// Adds a one-time purchase amortized from `purchased_on`.
    pub fn add_one_time(
        portfolio: &mut Portfolio,
        name: &str,
        price: Decimal,
        purchased_on: NaiveDate,
    ) -> ServiceResult<Uuid> {
        validate_name(name)?;
        validate_price(price)?;
        let record = SubscriptionRecord::one_time(name.trim(), price, purchased_on);
        tracing::info!(name = %record.name, "added one-time purchase");
        Ok(portfolio.add_record(record))
    }

    /// Replaces price, cycle and start date, then recomputes the renewal date.
    pub fn update_plan(
        portfolio: &mut Portfolio,
        id: Uuid,
        price: Decimal,
        cycle: CycleDefinition,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        validate_price(price)?;
        let record = record_mut(portfolio, id)?;
        record.price = price;
        record.cycle = cycle;
        record.start_date = start_date;
        record.reschedule(today);
        tracing::info!(%id, next_renewal = %record.next_renewal_date, "updated subscription plan");
        portfolio.touch();
        Ok(())
    }

    /// Manually renews for `count` cycles and returns the new renewal date.
    pub fn renew(
        portfolio: &mut Portfolio,
        id: Uuid,
        count: u32,
        today: NaiveDate,
    ) -> ServiceResult<NaiveDate> {
        if count == 0 {
            return Err(ServiceError::Invalid(
                "renewal count must be at least 1".into(),
            ));
        }
        let record = record_mut(portfolio, id)?;
        ensure_recurring(record)?;
        let previous = record.next_renewal_date;
        let next = record.renew(count, today);
        tracing::info!(%id, count, %previous, %next, "renewed subscription");
        portfolio.touch();
        Ok(next)
    }

    /// Toggles auto-renewal. Enabling it immediately brings a due renewal date forward.
    pub fn set_auto_renewal(
        portfolio: &mut Portfolio,
        id: Uuid,
        enabled: bool,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let record = record_mut(portfolio, id)?;
        ensure_recurring(record)?;
        record.auto_renewal = enabled;
        if enabled {
            record.refresh_auto_renewal(today);
        }
        tracing::info!(%id, enabled, "changed auto-renewal");
        portfolio.touch();
        Ok(())
    }

    pub fn pause(portfolio: &mut Portfolio, id: Uuid) -> ServiceResult<()> {
        record_mut(portfolio, id)?.pause();
        tracing::info!(%id, "paused subscription");
        portfolio.touch();
        Ok(())
    }

    pub fn resume(portfolio: &mut Portfolio, id: Uuid) -> ServiceResult<()> {
        record_mut(portfolio, id)?.resume();
        tracing::info!(%id, "resumed subscription");
        portfolio.touch();
        Ok(())
    }

    /// Rolls every due auto-renewing subscription forward. Returns how many records changed.
    pub fn refresh_auto_renewals(portfolio: &mut Portfolio, today: NaiveDate) -> usize {
        let changed = portfolio
            .records
            .iter_mut()
            .map(|record| record.refresh_auto_renewal(today))
            .filter(|changed| *changed)
            .count();
        if changed > 0 {
            tracing::info!(changed, %today, "refreshed auto-renewals");
            portfolio.touch();
        }
        changed
    }

    /// Renewal choices extending from the record's renewal base.
    pub fn renewal_options(
        portfolio: &Portfolio,
        id: Uuid,
        today: NaiveDate,
    ) -> ServiceResult<Vec<RenewalOption>> {
        let record = record(portfolio, id)?;
        ensure_recurring(record)?;
        Ok(build_renewal_options(
            record.renewal_base(today),
            &record.cycle,
            record.price,
        ))
    }

    pub fn statistics(
        portfolio: &Portfolio,
        id: Uuid,
        today: NaiveDate,
    ) -> ServiceResult<Statistics> {
        Ok(compute_statistics(record(portfolio, id)?, today))
    }

    pub fn state(portfolio: &Portfolio, id: Uuid, today: NaiveDate) -> ServiceResult<RenewalState> {
        Ok(renewal_state(record(portfolio, id)?, today))
    }

    pub fn summary(portfolio: &Portfolio, today: NaiveDate) -> GlobalStatistics {
        aggregate_global_statistics(&portfolio.records, today)
    }
}

fn record(portfolio: &Portfolio, id: Uuid) -> ServiceResult<&SubscriptionRecord> {
    portfolio.record(id).ok_or(ServiceError::NotFound(id))
}

fn record_mut(portfolio: &mut Portfolio, id: Uuid) -> ServiceResult<&mut SubscriptionRecord> {
    portfolio.record_mut(id).ok_or(ServiceError::NotFound(id))
}

fn ensure_recurring(record: &SubscriptionRecord) -> ServiceResult<()> {
    if record.one_time {
        return Err(ServiceError::Invalid(format!(
            "`{}` is a one-time purchase and does not renew",
            record.name
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::Invalid("name cannot be empty".into()));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> ServiceResult<()> {
    if price < Decimal::ZERO {
        return Err(ServiceError::Invalid(format!(
            "price must be non-negative (got {})",
            price
        )));
    }
    Ok(())
}
