//! Event log - a per-profile record of what the app did, kept in logs.duckdb
//!
//! Only event names, profile names, commands and error text are recorded.
//! Movie titles and ratings stay in the collection database.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::types::Value;
use duckdb::{params, params_from_iter, Connection, Row};
use serde::Serialize;

use crate::log_migrations::LOG_MIGRATIONS;
use crate::services::migration::MigrationService;

/// File name of the event log inside the data directory
pub const EVENT_LOG_FILE: &str = "logs.duckdb";

/// Current unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Something worth recording: `movie_added`, `lookup_failed`, `site_generated`...
#[derive(Debug, Clone, Default)]
pub struct LogEvent {
    pub event: String,
    pub profile: Option<String>,
    pub command: Option<String>,
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Subcommand or menu action that produced the event
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// A stored event
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: i64,
    pub recorded_at: i64,
    pub app_version: String,
    pub event: String,
    pub profile: Option<String>,
    pub command: Option<String>,
    pub error: Option<String>,
}

impl EventRecord {
    fn from_row(row: &Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recorded_at: row.get(1)?,
            app_version: row.get(2)?,
            event: row.get(3)?,
            profile: row.get(4)?,
            command: row.get(5)?,
            error: row.get(6)?,
        })
    }
}

/// Which events `recent` returns
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub limit: usize,
    pub profile: Option<String>,
    /// Only events that carry an error
    pub failures_only: bool,
}

/// How much one profile has done, and how much of it failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileActivity {
    pub profile: String,
    pub events: i64,
    pub movies_added: i64,
    pub failures: i64,
    pub last_seen: i64,
}

/// Event log stored next to the collection database
pub struct EventLog {
    conn: Mutex<Connection>,
    app_version: String,
}

impl EventLog {
    /// Open or create the event log in `data_dir` and bring its schema up to date
    pub fn open(data_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(data_dir.join(EVENT_LOG_FILE))?;
        MigrationService::with_migrations(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            app_version: app_version.into(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    pub fn record(&self, event: &LogEvent) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO events (recorded_at, app_version, event, profile, command, error)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                now_ms(),
                &self.app_version,
                &event.event,
                &event.profile,
                &event.command,
                &event.error,
            ],
        )?;
        Ok(())
    }

    /// Newest events first
    pub fn recent(&self, query: &EventQuery) -> Result<Vec<EventRecord>> {
        let mut conditions = Vec::new();
        let mut args = Vec::new();
        if let Some(profile) = &query.profile {
            conditions.push("profile = ?");
            args.push(Value::Text(profile.clone()));
        }
        if query.failures_only {
            conditions.push("error IS NOT NULL");
        }
        args.push(Value::BigInt(query.limit as i64));

        let filter = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT id, recorded_at, app_version, event, profile, command, error
             FROM events {} ORDER BY recorded_at DESC, id DESC LIMIT ?",
            filter
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(args), EventRecord::from_row)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Per-profile totals, ordered by profile name
    pub fn activity(&self) -> Result<Vec<ProfileActivity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT profile,
                    COUNT(*),
                    COUNT(*) FILTER (WHERE event = 'movie_added'),
                    COUNT(error),
                    MAX(recorded_at)
             FROM events
             WHERE profile IS NOT NULL
             GROUP BY profile
             ORDER BY profile",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ProfileActivity {
                    profile: row.get(0)?,
                    events: row.get(1)?,
                    movies_added: row.get(2)?,
                    failures: row.get(3)?,
                    last_seen: row.get(4)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete events recorded before `cutoff_ms`; returns how many went
    pub fn prune_before(&self, cutoff_ms: i64) -> Result<usize> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM events WHERE recorded_at < ?", [cutoff_ms])?;
        Ok(deleted)
    }
}
