#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use subtrack_core::{CycleDefinition, CycleKind, SubscriptionRecord};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that survives until the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn cycle(kind: CycleKind, duration: u32) -> CycleDefinition {
    CycleDefinition::new(kind, duration).expect("valid cycle")
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn subscription(
    name: &str,
    cents: i64,
    cycle: CycleDefinition,
    start: NaiveDate,
    created_on: NaiveDate,
) -> SubscriptionRecord {
    SubscriptionRecord::new(name, money(cents), cycle, start, created_on)
}
