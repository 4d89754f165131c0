//! Search command - case-insensitive title search

use anyhow::Result;
use colored::Colorize;

use cinelog_core::services::collection;

use super::{get_context, resolve_user};
use crate::output::movie_line;

pub fn run(query: &str, user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let matches = collection::search(&ctx.movie_service.list_movies(user.id)?, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("{}", "No matches found.".yellow());
    } else {
        for movie in &matches {
            println!("{}", movie_line(movie));
        }
    }

    Ok(())
}
