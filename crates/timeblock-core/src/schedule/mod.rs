//! Time blocks and the pure functions that resolve them against a clock.

mod block;
mod defaults;
mod engine;
mod validate;

pub use block::{
    is_block_locked, minute_of_day, parse_clock, ClockTime, Schedule, TimeBlock, MINUTES_PER_DAY,
};
pub use defaults::default_day;
pub use engine::{
    remaining_time, resolve, resolve_active_block, resolve_next_block, CountdownUrgency,
    RemainingTime, ResolvedState,
};
pub use validate::validate_schedule;
