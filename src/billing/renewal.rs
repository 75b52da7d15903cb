//! Renewal date arithmetic.

use chrono::{Datelike, NaiveDate};

use super::calendar::shift_months;
use super::cycle::CycleDefinition;

/// Cycle boundaries `anchor + k * cycle` for `k = 0, 1, 2, ...`.
///
/// Every boundary is computed from the anchor, so a clamped month end (Jan 31 -> Feb 29) does
/// not drift into later boundaries (Mar 31 stays Mar 31).
#[derive(Debug, Clone)]
pub struct CycleBoundaries {
    anchor: NaiveDate,
    months: i64,
    index: u64,
    saturated: bool,
}

impl CycleBoundaries {
    pub fn new(anchor: NaiveDate, cycle: &CycleDefinition) -> Self {
        Self::starting_at(anchor, cycle, 0)
    }

    fn starting_at(anchor: NaiveDate, cycle: &CycleDefinition, index: u64) -> Self {
        Self {
            anchor,
            months: i64::from(cycle.months()),
            index,
            saturated: false,
        }
    }

    /// Boundary `k` without walking the sequence.
    pub fn boundary(&self, k: u64) -> NaiveDate {
        let offset = i64::try_from(k)
            .ok()
            .and_then(|k| k.checked_mul(self.months))
            .unwrap_or(i64::MAX);
        shift_months(self.anchor, offset)
    }
}

impl Iterator for CycleBoundaries {
    type Item = (u64, NaiveDate);

    fn next(&mut self) -> Option<Self::Item> {
        if self.saturated {
            return None;
        }
        let index = self.index;
        let date = self.boundary(index);
        // Every later boundary is NaiveDate::MAX too; yield it once.
        self.saturated = date == NaiveDate::MAX;
        self.index += 1;
        Some((index, date))
    }
}

/// First renewal strictly after `reference`.
///
/// A subscription starting after `reference` renews first on its start date. Otherwise the
/// result is the earliest boundary `start + k * cycle` (k >= 1) with `boundary > reference`.
pub fn next_renewal_on_or_after(
    start: NaiveDate,
    cycle: &CycleDefinition,
    reference: NaiveDate,
) -> NaiveDate {
    if start > reference {
        return start;
    }
    // Boundaries before `first` fall in months strictly earlier than `reference`.
    let month_gap = month_index(reference) - month_index(start);
    let months = i64::from(cycle.months()).max(1);
    let skip = (month_gap.div_euclid(months) - 1).max(0) as u64;
    let first = skip + 1;

    let mut steps = 0u64;
    let mut cursor = start;
    for (_, boundary) in CycleBoundaries::starting_at(start, cycle, first) {
        steps += 1;
        cursor = boundary;
        if boundary > reference {
            break;
        }
    }
    tracing::debug!(
        %start,
        %reference,
        next = %cursor,
        skipped = skip,
        steps,
        "computed next renewal"
    );
    cursor
}

/// Date reached after `count` whole cycles from `from`, in a single calendar step.
pub fn advance_cycles(from: NaiveDate, cycle: &CycleDefinition, count: u32) -> NaiveDate {
    if count == 0 {
        return from;
    }
    CycleBoundaries::new(from, cycle).boundary(u64::from(count))
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::cycle::CycleKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycle(kind: CycleKind, duration: u32) -> CycleDefinition {
        CycleDefinition::new(kind, duration).unwrap()
    }

    #[test]
    fn future_start_is_its_own_first_renewal() {
        let start = date(2025, 6, 1);
        let next = next_renewal_on_or_after(start, &CycleDefinition::monthly(), date(2025, 5, 1));
        assert_eq!(next, start);
    }

    #[test]
    fn reference_on_start_moves_one_cycle_ahead() {
        let start = date(2025, 1, 10);
        let next = next_renewal_on_or_after(start, &CycleDefinition::monthly(), start);
        assert_eq!(next, date(2025, 2, 10));
    }

    #[test]
    fn reference_on_boundary_is_strictly_passed() {
        let start = date(2024, 1, 15);
        let quarterly = cycle(CycleKind::Quarterly, 1);
        let next = next_renewal_on_or_after(start, &quarterly, date(2024, 7, 15));
        assert_eq!(next, date(2024, 10, 15));
    }

    #[test]
    fn anchored_boundaries_do_not_drift_after_clamping() {
        let start = date(2024, 1, 31);
        let next = next_renewal_on_or_after(start, &CycleDefinition::monthly(), date(2024, 3, 1));
        assert_eq!(next, date(2024, 3, 31));
    }

    #[test]
    fn multi_year_cycles_follow_anniversaries() {
        let start = date(2020, 2, 29);
        let biannual = cycle(CycleKind::Yearly, 2);
        assert_eq!(
            next_renewal_on_or_after(start, &biannual, date(2023, 1, 1)),
            date(2024, 2, 29)
        );
        assert_eq!(
            next_renewal_on_or_after(start, &biannual, date(2021, 6, 1)),
            date(2022, 2, 28)
        );
    }

    #[test]
    fn result_is_minimal_boundary_after_reference() {
        let start = date(2019, 8, 30);
        for kind in CycleKind::ALL {
            for duration in 1..=3 {
                let cycle = cycle(kind, duration);
                let boundaries = CycleBoundaries::new(start, &cycle);
                let mut reference = start;
                while reference < date(2026, 1, 1) {
                    let next = next_renewal_on_or_after(start, &cycle, reference);
                    assert!(next > reference);
                    let k = boundaries
                        .clone()
                        .find(|(_, b)| *b == next)
                        .map(|(k, _)| k)
                        .expect("result is a boundary");
                    assert!(k >= 1);
                    assert!(boundaries.boundary(k - 1) <= reference);
                    reference = reference + chrono::Duration::days(17);
                }
            }
        }
    }

    #[test]
    fn advance_applies_whole_cycles_from_the_given_date() {
        let quarterly = cycle(CycleKind::Quarterly, 1);
        let from = date(2024, 6, 1);
        assert_eq!(advance_cycles(from, &quarterly, 1), date(2024, 9, 1));
        assert_eq!(advance_cycles(from, &quarterly, 4), date(2025, 6, 1));
        assert_eq!(advance_cycles(from, &quarterly, 0), from);
    }

    #[test]
    fn advance_clamps_to_last_valid_day() {
        let start = date(2024, 1, 31);
        let monthly = CycleDefinition::monthly();
        assert_eq!(advance_cycles(start, &monthly, 1), date(2024, 2, 29));
        assert_eq!(advance_cycles(start, &monthly, 13), date(2025, 2, 28));
    }

    #[test]
    fn extreme_cycles_saturate_instead_of_overflowing() {
        let widest = cycle(CycleKind::Monthly, u32::MAX);
        let from = date(2024, 1, 1);
        assert_eq!(advance_cycles(from, &widest, u32::MAX), NaiveDate::MAX);
        assert_eq!(advance_cycles(from, &widest, 1), NaiveDate::MAX);
        assert_eq!(next_renewal_on_or_after(from, &widest, from), NaiveDate::MAX);
    }

    #[test]
    fn saturated_boundaries_end_the_walk() {
        let widest = cycle(CycleKind::Yearly, u32::MAX);
        let walked: Vec<_> = CycleBoundaries::new(date(2024, 1, 1), &widest)
            .take(10)
            .collect();
        assert_eq!(
            walked,
            vec![(0, date(2024, 1, 1)), (1, NaiveDate::MAX)]
        );
    }

    #[test]
    fn boundaries_iterate_from_anchor() {
        let dates: Vec<_> = CycleBoundaries::new(date(2024, 1, 31), &CycleDefinition::monthly())
            .take(4)
            .map(|(_, d)| d)
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30)
            ]
        );
    }
}
