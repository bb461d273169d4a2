use chrono::Utc;
use timeblock_core::schedule::{parse_clock, resolve};
use timeblock_core::{Clock, Config, Event, SystemClock};

pub fn run(at: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let schedule = config.validated_schedule()?;

    let now = SystemClock.now();
    let instant = match at {
        Some(clock) => now.date().and_time(parse_clock(&clock)?),
        None => now,
    };

    let state = resolve(&schedule, instant);
    match &state.current_block {
        Some(block) => eprintln!(
            "{}: {} left ({:?})",
            block.name,
            state.remaining,
            state.remaining.urgency()
        ),
        None => eprintln!("no active block"),
    }
    let snapshot = Event::BlockSnapshot {
        state,
        at: Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
