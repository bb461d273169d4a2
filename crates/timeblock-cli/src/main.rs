use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "timeblock", version, about = "Timeblock day planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active block, the next block and the time left
    Now {
        /// Resolve at this local time today instead of now (HH:MM[:SS])
        #[arg(long)]
        at: Option<String>,
    },
    /// Schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Follow the day, printing transitions and alerts as JSON lines
    Watch {
        /// Keep the alarm audible even when the terminal is in the background
        #[arg(long)]
        floating: bool,
        /// No bell; notifications go to the log instead of stderr
        #[arg(long)]
        quiet: bool,
    },
    /// Pomodoro timer
    Pomodoro {
        #[command(subcommand)]
        action: commands::pomodoro::PomodoroAction,
    },
    /// Alarm sound profiles
    Sound {
        #[command(subcommand)]
        action: commands::sound::SoundAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TIMEBLOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Now { at } => commands::now::run(at),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Watch { floating, quiet } => commands::watch::run(floating, quiet),
        Commands::Pomodoro { action } => commands::pomodoro::run(action),
        Commands::Sound { action } => commands::sound::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
