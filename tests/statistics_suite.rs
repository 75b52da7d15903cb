mod common;

use common::{cycle, date, money, subscription};
use rust_decimal::Decimal;
use subtrack_core::billing::{renewal_state, RenewalState};
use subtrack_core::{
    aggregate_global_statistics, compute_statistics, CycleKind, GlobalStatistics,
    SubscriptionRecord,
};

#[test]
fn empty_collection_is_all_zero() {
    let totals = aggregate_global_statistics(&[], date(2024, 1, 1));
    assert_eq!(totals, GlobalStatistics::default());
    assert_eq!(totals.total_cost, Decimal::ZERO);
    assert_eq!(totals.total_subscriptions, 0);
}

#[test]
fn singleton_totals_match_item_statistics() {
    let today = date(2024, 9, 10);
    let records = [
        subscription("Young", 1200, cycle(CycleKind::Yearly, 1), date(2024, 8, 1), today),
        subscription("Mature", 999, cycle(CycleKind::Monthly, 1), date(2022, 3, 31), today),
        subscription("Future", 2999, cycle(CycleKind::Quarterly, 1), date(2024, 12, 1), today),
    ];
    for record in records {
        let stats = compute_statistics(&record, today);
        let totals = aggregate_global_statistics(std::slice::from_ref(&record), today);
        assert_eq!(totals.total_daily_cost, stats.average_daily_cost, "{}", record.name);
        assert_eq!(totals.total_monthly_cost, stats.average_monthly_cost, "{}", record.name);
        assert_eq!(totals.total_cost, stats.accumulated_cost, "{}", record.name);
        assert_eq!(totals.total_subscriptions, 1);
        assert_eq!(totals.overdue_count, usize::from(stats.is_overdue));
    }
}

#[test]
fn tallies_are_independent_of_each_other() {
    let today = date(2024, 6, 1);
    let mut overdue_and_paused =
        subscription("Gym", 4000, cycle(CycleKind::Monthly, 1), date(2024, 1, 5), date(2024, 1, 5));
    overdue_and_paused.pause();

    let active = subscription("News", 800, cycle(CycleKind::Monthly, 1), date(2024, 5, 20), today);

    let mut inactive = active.clone();
    inactive.id = uuid::Uuid::new_v4();
    inactive.is_active = false;

    let totals = aggregate_global_statistics(&[overdue_and_paused, active, inactive], today);
    assert_eq!(totals.total_subscriptions, 3);
    assert_eq!(totals.paused_count, 1);
    assert_eq!(totals.overdue_count, 1);
    assert_eq!(totals.active_count, 1);
}

#[test]
fn one_time_purchases_use_their_own_bucket() {
    let today = date(2024, 3, 1);
    let laptop = SubscriptionRecord::one_time("Laptop", money(120000), date(2024, 1, 1));
    let fresh = SubscriptionRecord::one_time("Cable", money(1500), today);
    let streaming =
        subscription("Stream", 1000, cycle(CycleKind::Monthly, 1), date(2024, 2, 1), today);

    let stream_stats = compute_statistics(&streaming, today);
    let totals = aggregate_global_statistics(&[laptop, fresh, streaming], today);

    assert_eq!(totals.one_time_purchase_total_value, money(121500));
    assert_eq!(
        totals.one_time_purchase_daily_value,
        money(120000) / Decimal::from(60) + money(1500)
    );
    assert_eq!(totals.total_monthly_cost, stream_stats.average_monthly_cost);
    assert_eq!(
        totals.total_cost,
        money(121500) + stream_stats.accumulated_cost
    );
    assert_eq!(totals.overdue_count, 0);
}

#[test]
fn lifecycle_moves_between_states() {
    let mut record = subscription(
        "Cloud",
        2999,
        cycle(CycleKind::Quarterly, 1),
        date(2024, 3, 1),
        date(2024, 1, 1),
    );
    assert_eq!(renewal_state(&record, date(2024, 2, 1)), RenewalState::Future);
    assert_eq!(renewal_state(&record, date(2024, 3, 1)), RenewalState::Active);
    assert_eq!(renewal_state(&record, date(2024, 3, 2)), RenewalState::Overdue);

    record.renew(1, date(2024, 3, 2));
    assert_eq!(record.next_renewal_date, date(2024, 6, 2));
    assert_eq!(renewal_state(&record, date(2024, 3, 2)), RenewalState::Active);

    record.pause();
    assert_eq!(renewal_state(&record, date(2024, 9, 1)), RenewalState::Paused);
    record.resume();
    assert_eq!(renewal_state(&record, date(2024, 9, 1)), RenewalState::Overdue);

    record.auto_renewal = true;
    assert!(record.refresh_auto_renewal(date(2024, 9, 1)));
    assert_eq!(record.next_renewal_date, date(2024, 12, 1));
    assert_eq!(renewal_state(&record, date(2024, 9, 1)), RenewalState::Active);
}
