//! Property tests for schedule resolution.
//!
//! Schedules are generated from sorted cut points, so they never overlap and
//! carry at most one overnight block.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use timeblock_core::schedule::{
    remaining_time, resolve, resolve_active_block, resolve_next_block, ClockTime, TimeBlock,
    MINUTES_PER_DAY,
};

fn block(index: usize, start: u32, end: u32) -> TimeBlock {
    TimeBlock::new(
        format!("b{index}"),
        format!("Block {index}"),
        ClockTime::new(start / 60, start % 60),
        ClockTime::new(end / 60, end % 60),
        "work",
    )
}

fn schedule_strategy() -> impl Strategy<Value = Vec<TimeBlock>> {
    (
        proptest::collection::btree_set(0..MINUTES_PER_DAY, 2..10),
        proptest::collection::vec(any::<bool>(), 10),
        any::<bool>(),
    )
        .prop_map(|(cuts, keep, wrap)| {
            let cuts: Vec<u32> = cuts.into_iter().collect();
            let mut blocks: Vec<TimeBlock> = cuts
                .windows(2)
                .enumerate()
                .filter(|(i, _)| keep[*i])
                .map(|(i, pair)| block(i, pair[0], pair[1]))
                .collect();
            if wrap {
                blocks.push(block(99, cuts[cuts.len() - 1], cuts[0]));
            }
            if blocks.is_empty() {
                blocks.push(block(0, cuts[0], cuts[1]));
            }
            blocks
        })
}

fn instant(minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(minute / 60, minute % 60, second)
        .unwrap()
}

proptest! {
    #[test]
    fn resolved_block_contains_instant(
        blocks in schedule_strategy(),
        minute in 0..MINUTES_PER_DAY,
        second in 0u32..60,
    ) {
        let matching = blocks.iter().filter(|b| b.contains_minute(minute)).count();
        prop_assert!(matching <= 1);

        match resolve_active_block(&blocks, instant(minute, second)) {
            Some(b) => prop_assert!(b.contains_minute(minute)),
            None => prop_assert_eq!(matching, 0),
        }
    }

    #[test]
    fn next_block_visits_every_block_once(
        blocks in schedule_strategy(),
        start in 0usize..10,
    ) {
        let first = &blocks[start % blocks.len()];
        let mut seen = vec![first.id.clone()];
        let mut current = first;
        for _ in 1..blocks.len() {
            current = resolve_next_block(&blocks, Some(current)).unwrap();
            prop_assert!(!seen.contains(&current.id));
            seen.push(current.id.clone());
        }
        let wrapped = resolve_next_block(&blocks, Some(current)).unwrap();
        prop_assert_eq!(&wrapped.id, &first.id);
    }

    #[test]
    fn remaining_counts_down_by_one_second(
        blocks in schedule_strategy(),
        minute in 0..MINUTES_PER_DAY,
        second in 0u32..60,
    ) {
        let mut at = instant(minute, second);
        let Some(active) = resolve_active_block(&blocks, at).cloned() else {
            return Ok(());
        };
        let mut previous = remaining_time(&active, at);
        prop_assert!(previous.total_seconds >= 1);

        for _ in 0..900 {
            at += Duration::seconds(1);
            match resolve_active_block(&blocks, at) {
                Some(b) if b.id == active.id => {
                    let now = remaining_time(b, at);
                    prop_assert!(now.total_seconds >= 1);
                    prop_assert_eq!(now.total_seconds, previous.total_seconds - 1);
                    previous = now;
                }
                _ => {
                    // Left the block exactly when the countdown ran out.
                    prop_assert_eq!(previous.total_seconds, 1);
                    break;
                }
            }
        }
    }
}

#[test]
fn overnight_block_spans_midnight() {
    let blocks = vec![
        block(0, 9 * 60, 17 * 60),
        block(1, 23 * 60, 2 * 60),
    ];
    assert_eq!(resolve_active_block(&blocks, instant(23 * 60 + 30, 0)).unwrap().id, "b1");
    assert_eq!(resolve_active_block(&blocks, instant(60 + 30, 0)).unwrap().id, "b1");
    assert!(resolve_active_block(&blocks, instant(2 * 60, 0)).is_none());

    let late = remaining_time(&blocks[1], instant(23 * 60 + 30, 0));
    assert_eq!(late.total_seconds, (2 * 60 + 30) * 60);
    let early = remaining_time(&blocks[1], instant(60 + 30, 0));
    assert_eq!(early.total_seconds, 30 * 60);

    // End of the night wraps to the first morning block.
    assert_eq!(resolve_next_block(&blocks, Some(&blocks[1])).unwrap().id, "b0");
}

#[test]
fn single_block_schedule() {
    let blocks = vec![block(0, 9 * 60, 10 * 60)];
    let state = resolve(&blocks, instant(9 * 60 + 30, 0));
    assert_eq!(state.current_block.as_ref().unwrap().id, "b0");
    assert_eq!(state.next_block.as_ref().unwrap().id, "b0");
    assert_eq!(state.remaining.hours, 0);
    assert_eq!(state.remaining.minutes, 30);
    assert_eq!(state.remaining.seconds, 0);
    assert_eq!(state.remaining.to_string(), "30:00");
}

#[test]
fn gap_resolves_to_first_block_next() {
    let blocks = vec![block(0, 9 * 60, 10 * 60), block(1, 12 * 60, 13 * 60)];
    let state = resolve(&blocks, instant(11 * 60, 0));
    assert!(state.current_block.is_none());
    assert_eq!(state.next_block.unwrap().id, "b0");
    assert_eq!(state.remaining.total_seconds, 0);
}
