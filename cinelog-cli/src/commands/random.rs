//! Random command - pick something to watch

use anyhow::Result;
use colored::Colorize;

use cinelog_core::services::collection;

use super::{get_context, resolve_user};
use crate::output::{self, movie_line};

pub fn run(user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let movies = ctx.movie_service.list_movies(user.id)?;
    let pick = collection::pick_random(&movies);

    if json {
        println!("{}", serde_json::to_string_pretty(&pick)?);
        return Ok(());
    }

    match pick {
        Some(movie) => println!("Your movie for tonight: {}", movie_line(movie).bold()),
        None => output::warning("No movies found."),
    }
    Ok(())
}
