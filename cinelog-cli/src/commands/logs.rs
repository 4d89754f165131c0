//! Logs command - what happened in each profile

use anyhow::Result;
use chrono::{Duration, Local, TimeZone};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use cinelog_core::services::event_log::EVENT_LOG_FILE;
use cinelog_core::services::{EventLog, EventQuery, EventRecord};

use super::get_data_dir;
use crate::output::{self, create_table};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the latest events
    Recent {
        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only events of this profile
        #[arg(long, short)]
        user: Option<String>,
        /// Only failed lookups and other errors
        #[arg(long)]
        failures: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Events, added movies and failures per profile
    Activity {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Prune {
        /// Keep the last N days
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

fn local_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn print_records(records: &[EventRecord]) {
    let mut table = create_table();
    table.set_header(vec!["When", "Event", "Profile", "Command", "Error"]);
    for record in records {
        table.add_row(vec![
            local_time(record.recorded_at),
            record.event.clone(),
            record.profile.clone().unwrap_or_else(|| "-".to_string()),
            record.command.clone().unwrap_or_default(),
            record.error.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
}

pub fn run(command: LogsCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let events = EventLog::open(&data_dir, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::Recent {
            limit,
            user,
            failures,
            json,
        } => {
            let records = events.recent(&EventQuery {
                limit,
                profile: user.map(|name| name.trim().to_string()),
                failures_only: failures,
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No events recorded.");
            } else {
                print_records(&records);
            }
        }
        LogsCommands::Activity { json } => {
            let activity = events.activity()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&activity)?);
                return Ok(());
            }

            if activity.is_empty() {
                println!("No profile activity yet.");
            } else {
                let mut table = create_table();
                table.set_header(vec!["Profile", "Events", "Movies added", "Failures", "Last seen"]);
                for row in &activity {
                    let failures = if row.failures > 0 {
                        row.failures.to_string().red().to_string()
                    } else {
                        "0".to_string()
                    };
                    table.add_row(vec![
                        row.profile.clone(),
                        row.events.to_string(),
                        row.movies_added.to_string(),
                        failures,
                        local_time(row.last_seen),
                    ]);
                }
                println!("{}", table);
            }
            println!(
                "{}",
                format!(
                    "{} event(s) in {}",
                    events.count()?,
                    data_dir.join(EVENT_LOG_FILE).display()
                )
                .dimmed()
            );
        }
        LogsCommands::Prune {
            older_than_days,
            yes,
        } => {
            let cutoff = chrono::Utc::now() - Duration::days(older_than_days);

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete events older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output::warning("Nothing deleted.");
                    return Ok(());
                }
            }

            let deleted = events.prune_before(cutoff.timestamp_millis())?;
            output::success(&format!("Deleted {} event(s).", deleted));
        }
    }

    Ok(())
}
