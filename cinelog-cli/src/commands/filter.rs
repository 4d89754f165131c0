//! Filter command - movies within rating and year bounds

use anyhow::Result;
use colored::Colorize;

use cinelog_core::services::{collection, MovieFilter};

use super::{get_context, resolve_user};
use crate::output::movie_table;

pub fn run(user: &str, filter: MovieFilter, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let matches = collection::filter(&ctx.movie_service.list_movies(user.id)?, &filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("{}", "No movies match the filters.".yellow());
        return Ok(());
    }

    println!("{}", "Filtered Movies:".bold());
    println!("{}", movie_table(&matches));
    Ok(())
}
