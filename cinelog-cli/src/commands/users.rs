//! Users command - list and create profiles

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use cinelog_core::services::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output::create_table;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Create a new profile
    Add {
        /// Profile name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct UserRow {
    id: i64,
    name: String,
    movies: i64,
}

pub fn run(command: Option<UsersCommands>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    match command {
        Some(UsersCommands::Add { name, json }) => {
            let user = ctx.user_service.add_user(&name)?;
            log_event(
                get_logger().as_ref(),
                LogEvent::new("user_created")
                    .with_profile(&user.name)
                    .with_command("users add"),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} {}", "Created user:".green(), user.name);
            }
        }
        None => {
            let mut rows = Vec::new();
            for user in ctx.user_service.list_users()? {
                let movies = ctx.repository.count_movies(user.id)?;
                rows.push(UserRow { id: user.id, name: user.name, movies });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            if rows.is_empty() {
                println!("{}", "No users yet. Create one with 'cinelog users add NAME'.".yellow());
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["ID", "Name", "Movies"]);
            for row in &rows {
                table.add_row(vec![row.id.to_string(), row.name.clone(), row.movies.to_string()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
