//! Well-formedness checks for a block list.
//!
//! The resolution engine never calls this; it is applied where schedules
//! enter the system (config load, CLI `schedule set`).

use std::collections::HashSet;

use super::block::{TimeBlock, MINUTES_PER_DAY};
use crate::error::ValidationError;

/// Half-open minute ranges within one day covered by a block.
fn day_ranges(block: &TimeBlock) -> Vec<(u32, u32)> {
    let start = block.start().minutes_of_day();
    let end = block.end().minutes_of_day();
    if block.is_overnight() {
        let mut ranges = vec![(start, MINUTES_PER_DAY)];
        if end > 0 {
            ranges.push((0, end));
        }
        ranges
    } else {
        vec![(start, end)]
    }
}

fn overlaps(a: &TimeBlock, b: &TimeBlock) -> bool {
    let left = day_ranges(a);
    let right = day_ranges(b);
    left.iter()
        .any(|&(s1, e1)| right.iter().any(|&(s2, e2)| s1 < e2 && s2 < e1))
}

fn check_clock_fields(block: &TimeBlock) -> Result<(), ValidationError> {
    let fields = [
        ("start_hour", block.start_hour, 23),
        ("start_minute", block.start_minute, 59),
        ("end_hour", block.end_hour, 23),
        ("end_minute", block.end_minute, 59),
    ];
    for (field, value, max) in fields {
        if value > max {
            return Err(ValidationError::InvalidClockField {
                id: block.id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Reject schedules the resolution engine has no defined behavior for.
///
/// # Errors
/// Returns the first problem found: bad clock fields, empty or duplicate
/// ids, zero-length blocks, more than one overnight block, or overlaps.
pub fn validate_schedule(blocks: &[TimeBlock]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let mut overnight: Option<&TimeBlock> = None;

    for (index, block) in blocks.iter().enumerate() {
        if block.id.trim().is_empty() {
            return Err(ValidationError::EmptyId { index });
        }
        if !seen.insert(block.id.as_str()) {
            return Err(ValidationError::DuplicateId(block.id.clone()));
        }
        check_clock_fields(block)?;
        if block.start() == block.end() {
            return Err(ValidationError::ZeroLength(block.id.clone()));
        }
        if block.is_overnight() {
            if let Some(first) = overnight {
                return Err(ValidationError::MultipleOvernight {
                    first: first.id.clone(),
                    second: block.id.clone(),
                });
            }
            overnight = Some(block);
        }
    }

    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if overlaps(a, b) {
                return Err(ValidationError::Overlap {
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::block::ClockTime;
    use crate::schedule::defaults::default_day;

    fn block(id: &str, sh: u32, sm: u32, eh: u32, em: u32) -> TimeBlock {
        TimeBlock::new(id, id, ClockTime::new(sh, sm), ClockTime::new(eh, em), "work")
    }

    #[test]
    fn default_day_is_well_formed() {
        assert_eq!(validate_schedule(&default_day()), Ok(()));
    }

    #[test]
    fn adjacent_blocks_do_not_overlap() {
        let blocks = vec![block("a", 9, 0, 10, 0), block("b", 10, 0, 11, 0)];
        assert!(validate_schedule(&blocks).is_ok());
    }

    #[test]
    fn overlap_is_rejected() {
        let blocks = vec![block("a", 9, 0, 10, 30), block("b", 10, 0, 11, 0)];
        assert_eq!(
            validate_schedule(&blocks),
            Err(ValidationError::Overlap {
                first: "a".into(),
                second: "b".into()
            })
        );
    }

    #[test]
    fn overnight_overlap_after_midnight_is_rejected() {
        let blocks = vec![block("night", 23, 0, 2, 0), block("early", 1, 0, 3, 0)];
        assert!(matches!(
            validate_schedule(&blocks),
            Err(ValidationError::Overlap { .. })
        ));
    }

    #[test]
    fn block_ending_at_midnight_is_fine() {
        let blocks = vec![block("late", 23, 0, 0, 0), block("early", 0, 0, 1, 0)];
        assert!(validate_schedule(&blocks).is_ok());
    }

    #[test]
    fn second_overnight_block_is_rejected() {
        let blocks = vec![block("n1", 22, 0, 23, 0), block("n2", 23, 30, 1, 0), block("n3", 21, 0, 0, 30)];
        assert!(matches!(
            validate_schedule(&blocks),
            Err(ValidationError::MultipleOvernight { .. })
        ));
    }

    #[test]
    fn field_and_identity_errors() {
        assert_eq!(
            validate_schedule(&[block("a", 24, 0, 10, 0)]),
            Err(ValidationError::InvalidClockField {
                id: "a".into(),
                field: "start_hour",
                value: 24
            })
        );
        assert_eq!(
            validate_schedule(&[block("a", 9, 0, 9, 0)]),
            Err(ValidationError::ZeroLength("a".into()))
        );
        assert_eq!(
            validate_schedule(&[block("a", 9, 0, 10, 0), block("a", 11, 0, 12, 0)]),
            Err(ValidationError::DuplicateId("a".into()))
        );
        assert_eq!(
            validate_schedule(&[block(" ", 9, 0, 10, 0)]),
            Err(ValidationError::EmptyId { index: 0 })
        );
    }
}
