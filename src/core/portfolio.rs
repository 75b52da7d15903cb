use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::billing::SubscriptionRecord;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// A named collection of tracked subscriptions, the unit the record store persists.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub id: Uuid,
    pub name: String,
    pub records: Vec<SubscriptionRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            records: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_record(&mut self, record: SubscriptionRecord) -> Uuid {
        let id = record.id;
        self.records.push(record);
        self.touch();
        id
    }

    pub fn remove_record(&mut self, id: Uuid) -> Option<SubscriptionRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        let removed = self.records.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn record(&self, id: Uuid) -> Option<&SubscriptionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn record_mut(&mut self, id: Uuid) -> Option<&mut SubscriptionRecord> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::CycleDefinition;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_record() -> SubscriptionRecord {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        SubscriptionRecord::new("Music", Decimal::new(999, 2), CycleDefinition::monthly(), day, day)
    }

    #[test]
    fn add_and_remove_records() {
        let mut portfolio = Portfolio::new("Household");
        let id = portfolio.add_record(sample_record());
        assert_eq!(portfolio.record_count(), 1);
        assert!(portfolio.record(id).is_some());

        let removed = portfolio.remove_record(id).expect("record removed");
        assert_eq!(removed.id, id);
        assert_eq!(portfolio.record_count(), 0);
        assert!(portfolio.remove_record(id).is_none());
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut portfolio = Portfolio::new("Touch");
        let before = portfolio.updated_at;
        portfolio.add_record(sample_record());
        assert!(portfolio.updated_at >= before);
    }
}
