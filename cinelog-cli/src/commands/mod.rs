//! CLI command implementations

pub mod add;
pub mod delete;
pub mod filter;
pub mod generate;
pub mod list;
pub mod logs;
pub mod menu;
pub mod random;
pub mod search;
pub mod setup;
pub mod stats;
pub mod update;
pub mod users;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cinelog_core::services::{EventLog, LogEvent};
use cinelog_core::{CinelogContext, User};

/// Open the event log; None when it cannot be opened
pub fn get_logger() -> Option<EventLog> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    match EventLog::open(&data_dir, env!("CARGO_PKG_VERSION")) {
        Ok(events) => Some(events),
        Err(e) => {
            log::debug!("event log unavailable: {:#}", e);
            None
        }
    }
}

/// Record an event; a failed write is only a debug message
pub fn log_event(logger: Option<&EventLog>, event: LogEvent) {
    if let Some(events) = logger {
        if let Err(e) = events.record(&event) {
            log::debug!("could not record {}: {:#}", event.event, e);
        }
    }
}

/// Data directory from `CINELOG_DIR`, or `~/.cinelog`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CINELOG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".cinelog"))
        .context("Could not find home directory; set CINELOG_DIR")
}

/// Open the collection in the data directory
pub fn get_context() -> Result<CinelogContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    CinelogContext::new(&data_dir).context("Failed to open movie collection")
}

/// Look up the profile named by `--user`
pub fn resolve_user(ctx: &CinelogContext, name: &str) -> Result<User> {
    Ok(ctx.user_service.require(name)?)
}
