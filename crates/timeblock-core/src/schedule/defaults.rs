use super::block::{ClockTime, TimeBlock};

const ALL_WORK: [&str; 4] = ["agency", "trading", "content", "meeting"];

/// The built-in day, used until a custom schedule is configured.
///
/// The cycle starts at wake-up and ends with sleep, so the overnight
/// session and the sleep block close the list.
pub fn default_day() -> Vec<TimeBlock> {
    vec![
        TimeBlock::new("morning-routine", "Morning Routine & Breakfast", ClockTime::new(9, 0), ClockTime::new(10, 0), "morning")
            .with_tasks(["Wake up and freshen up", "Healthy breakfast", "Review today's schedule", "Quick meditation or stretching"])
            .with_locked(["agency", "trading", "content"]),
        TimeBlock::new("agency-meeting", "Agency Meeting", ClockTime::new(10, 0), ClockTime::new(11, 0), "meeting")
            .with_tasks(["Team sync call", "Review project updates", "Assign tasks", "Address blockers"])
            .with_locked(["trading"]),
        TimeBlock::new("deep-agency-work", "Deep Agency Work", ClockTime::new(11, 0), ClockTime::new(13, 0), "agency")
            .with_tasks(["Build automation workflows", "Improve existing systems", "Complete client deliverables"])
            .with_locked(["trading"]),
        TimeBlock::new("lunch-break", "Lunch Break", ClockTime::new(13, 0), ClockTime::new(14, 0), "break")
            .with_tasks(["Have a proper meal", "Short walk if possible"])
            .with_locked(ALL_WORK),
        TimeBlock::new("trading-learning", "Trading Learning", ClockTime::new(14, 0), ClockTime::new(15, 0), "trading")
            .with_tasks(["Study trading strategy", "Backtest setups", "Take detailed notes"])
            .with_locked(["agency"]),
        TimeBlock::new("trading-practice", "Trading Practice", ClockTime::new(15, 0), ClockTime::new(16, 0), "trading")
            .with_tasks(["Execute practice trades", "Journal each trade", "Review performance"])
            .with_locked(["agency"]),
        TimeBlock::new("agency-outreach", "Agency Outreach & Content", ClockTime::new(16, 0), ClockTime::new(20, 0), "content")
            .with_tasks(["Cold outreach to prospects", "Content creation", "Follow up on leads"])
            .with_locked(["trading"]),
        TimeBlock::new("evening-break", "Break", ClockTime::new(20, 0), ClockTime::new(20, 30), "break")
            .with_tasks(["Relax and unwind", "Light stretching"])
            .with_locked(ALL_WORK),
        TimeBlock::new("instagram-reels", "Instagram Reels Creation", ClockTime::new(20, 30), ClockTime::new(21, 0), "content")
            .with_tasks(["Create new reel content", "Edit and polish videos", "Post and engage"])
            .with_locked(["trading"]),
        TimeBlock::new("dinner", "Dinner", ClockTime::new(21, 0), ClockTime::new(22, 0), "break")
            .with_tasks(["Have dinner", "Family or personal time"])
            .with_locked(ALL_WORK),
        TimeBlock::new("team-meeting", "Team Meeting", ClockTime::new(22, 0), ClockTime::new(23, 0), "meeting")
            .with_tasks(["Evening team sync", "Review day's progress", "Plan next day priorities"])
            .with_locked(["trading"]),
        TimeBlock::new("night-work", "Night Work Session", ClockTime::new(23, 0), ClockTime::new(2, 0), "agency")
            .with_tasks(["Agency work continuation", "Tech exploration", "Learning new skills"])
            .with_locked(["trading"]),
        TimeBlock::new("sleep", "Sleep Time", ClockTime::new(2, 0), ClockTime::new(9, 0), "sleep")
            .with_tasks(["Rest and recover"])
            .with_locked(["agency", "trading", "content", "meeting", "morning"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_day_covers_all_hours() {
        let total: u32 = default_day().iter().map(TimeBlock::duration_minutes).sum();
        assert_eq!(total, 24 * 60);
    }

    #[test]
    fn exactly_one_overnight_block() {
        let overnight: Vec<_> = default_day().into_iter().filter(TimeBlock::is_overnight).collect();
        assert_eq!(overnight.len(), 1);
        assert_eq!(overnight[0].id, "night-work");
    }
}
