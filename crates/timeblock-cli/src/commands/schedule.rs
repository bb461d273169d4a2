use clap::Subcommand;
use std::path::{Path, PathBuf};
use timeblock_core::schedule::{validate_schedule, Schedule};
use timeblock_core::Config;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Print the schedule in effect as JSON
    List,
    /// Check a schedule file (or the configured schedule) for overlaps and bad times
    Validate {
        /// JSON file holding a block list
        file: Option<PathBuf>,
    },
    /// Replace the configured schedule with a JSON block list
    Set {
        /// JSON file holding a block list
        file: PathBuf,
    },
    /// Go back to the built-in day
    Reset,
}

fn read_schedule(path: &Path) -> Result<Schedule, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let schedule: Schedule = serde_json::from_str(&content)?;
    Ok(schedule)
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config.schedule())?);
        }
        ScheduleAction::Validate { file } => {
            let schedule = match file {
                Some(path) => read_schedule(&path)?,
                None => Config::load()?.schedule(),
            };
            validate_schedule(&schedule)?;
            println!("ok: {} blocks", schedule.len());
        }
        ScheduleAction::Set { file } => {
            let schedule = read_schedule(&file)?;
            validate_schedule(&schedule)?;
            let mut config = Config::load()?;
            let count = schedule.len();
            config.custom_schedule = Some(schedule);
            config.save()?;
            println!("schedule set: {count} blocks");
        }
        ScheduleAction::Reset => {
            let mut config = Config::load()?;
            config.custom_schedule = None;
            config.save()?;
            println!("schedule reset to built-in day");
        }
    }
    Ok(())
}
