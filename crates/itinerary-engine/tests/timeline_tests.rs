//! Tests for day ordering, trip day generation and trip totals.

use chrono::NaiveDate;
use itinerary_engine::clock::hm;
use itinerary_engine::timeline::{generate_trip_days, renumber, sort_blocks, summarize};
use itinerary_engine::{Block, BlockKind, BlockStatus, Day, PlannerError};

fn block(id: &str, order_index: u32, start: Option<(u32, u32)>) -> Block {
    Block {
        id: id.to_string(),
        day_id: "day-1".to_string(),
        kind: BlockKind::Place,
        title: None,
        start_time: start.map(|(h, m)| hm(h, m)),
        end_time: None,
        duration_min: None,
        order_index,
        place_id: None,
        location: None,
        cost_estimate: None,
        status: BlockStatus::Planned,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.id.as_str()).collect()
}

#[test]
fn timed_blocks_sort_before_untimed() {
    let mut blocks = vec![
        block("note", 0, None),
        block("dinner", 1, Some((19, 0))),
        block("packing", 2, None),
        block("breakfast", 3, Some((8, 0))),
    ];

    sort_blocks(&mut blocks);

    assert_eq!(ids(&blocks), ["breakfast", "dinner", "note", "packing"]);
}

#[test]
fn untimed_blocks_follow_order_index() {
    let mut blocks = vec![block("b", 5, None), block("a", 2, None)];

    sort_blocks(&mut blocks);

    assert_eq!(ids(&blocks), ["a", "b"]);
}

#[test]
fn renumber_makes_indices_contiguous() {
    let mut blocks = vec![block("a", 3, None), block("b", 7, None), block("c", 7, None)];

    renumber(&mut blocks);

    let order: Vec<u32> = blocks.iter().map(|b| b.order_index).collect();
    assert_eq!(order, [0, 1, 2]);
}

#[test]
fn trip_days_cover_both_ends() {
    let days = generate_trip_days(date(2026, 3, 30), date(2026, 4, 2)).unwrap();

    assert_eq!(days.len(), 4);
    assert_eq!(days[0].day_index, 1);
    assert_eq!(days[0].date, date(2026, 3, 30));
    assert_eq!(days[3].day_index, 4);
    assert_eq!(days[3].date, date(2026, 4, 2));
}

#[test]
fn same_day_trip_has_one_day() {
    let days = generate_trip_days(date(2026, 7, 1), date(2026, 7, 1)).unwrap();

    assert_eq!(days.len(), 1);
}

#[test]
fn leaving_before_arriving_is_rejected() {
    let result = generate_trip_days(date(2026, 7, 5), date(2026, 7, 1));

    assert!(matches!(result, Err(PlannerError::InvalidDateRange(_))));
}

#[test]
fn totals_count_places_and_costs() {
    let mut linked = block("a", 0, None);
    linked.place_id = Some("place-1".to_string());
    linked.cost_estimate = Some(12.5);
    let mut unlinked = block("b", 1, None);
    unlinked.cost_estimate = Some(7.5);

    let days = vec![
        Day {
            id: "d1".to_string(),
            day_index: 1,
            date: None,
            blocks: vec![linked],
        },
        Day {
            id: "d2".to_string(),
            day_index: 2,
            date: None,
            blocks: vec![unlinked, block("c", 2, None)],
        },
    ];

    let totals = summarize(&days);

    assert_eq!(totals.total_places, 1);
    assert_eq!(totals.total_cost, 20.0);
}
