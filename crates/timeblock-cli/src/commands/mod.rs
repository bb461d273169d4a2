pub mod config;
pub mod now;
pub mod pomodoro;
pub mod schedule;
pub mod sound;
pub mod watch;

use timeblock_core::storage::Database;
use timeblock_core::{KeyValueStore, MemoryStore};

/// The persistent store, or a throwaway one if the database is unavailable.
pub(crate) fn open_store() -> Box<dyn KeyValueStore> {
    match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable, state will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Single-threaded runtime for the tick loops.
pub(crate) fn tick_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

pub(crate) fn print_json_line<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
    }
}
