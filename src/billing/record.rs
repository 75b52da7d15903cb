use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cycle::CycleDefinition;
use super::renewal::{advance_cycles, next_renewal_on_or_after};

/// A tracked subscription as stored by the record store.
///
/// `one_time` marks a non-recurring purchase: its cycle is kept for display only and it is
/// amortized over days owned instead of billed per cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub cycle: CycleDefinition,
    pub start_date: NaiveDate,
    pub next_renewal_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub auto_renewal: bool,
    #[serde(default)]
    pub one_time: bool,
}

fn default_true() -> bool {
    true
}

impl SubscriptionRecord {
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        cycle: CycleDefinition,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price: price.max(Decimal::ZERO),
            cycle,
            start_date,
            next_renewal_date: next_renewal_on_or_after(start_date, &cycle, today),
            is_active: true,
            is_paused: false,
            auto_renewal: false,
            one_time: false,
        }
    }

    /// Builds a non-recurring purchase acquired on `purchased_on`.
    pub fn one_time(name: impl Into<String>, price: Decimal, purchased_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price: price.max(Decimal::ZERO),
            cycle: CycleDefinition::monthly(),
            start_date: purchased_on,
            next_renewal_date: purchased_on,
            is_active: true,
            is_paused: false,
            auto_renewal: false,
            one_time: true,
        }
    }

    pub fn with_auto_renewal(mut self, enabled: bool) -> Self {
        self.auto_renewal = enabled;
        self
    }

    pub fn is_recurring(&self) -> bool {
        !self.one_time
    }

    /// Date a manual renewal extends from: the stored renewal date, or `today` once that has
    /// already passed.
    pub fn renewal_base(&self, today: NaiveDate) -> NaiveDate {
        self.next_renewal_date.max(today)
    }

    /// Manual renewal for `count` cycles. Returns the new renewal date.
    pub fn renew(&mut self, count: u32, today: NaiveDate) -> NaiveDate {
        let base = self.renewal_base(today);
        self.next_renewal_date = advance_cycles(base, &self.cycle, count);
        self.next_renewal_date
    }

    /// Recomputes the renewal date of an auto-renewing subscription whose stored date is due.
    ///
    /// Returns `true` when the stored date changed.
    pub fn refresh_auto_renewal(&mut self, today: NaiveDate) -> bool {
        if !self.auto_renewal || self.is_paused || self.one_time {
            return false;
        }
        if self.next_renewal_date > today {
            return false;
        }
        let next = next_renewal_on_or_after(self.start_date, &self.cycle, today);
        if next == self.next_renewal_date {
            return false;
        }
        self.next_renewal_date = next;
        true
    }

    /// Recomputes the renewal date after the start date or cycle was edited.
    pub fn reschedule(&mut self, today: NaiveDate) {
        self.next_renewal_date = if self.one_time {
            self.start_date
        } else {
            next_renewal_on_or_after(self.start_date, &self.cycle, today)
        };
    }

    pub fn pause(&mut self) {
        self.is_paused = true;
    }

    pub fn resume(&mut self) {
        self.is_paused = false;
    }
}
