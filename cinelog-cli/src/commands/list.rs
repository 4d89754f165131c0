//! List command - show a user's movies

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;

use cinelog_core::services::collection;

use super::{get_context, resolve_user};
use crate::output::{self, movie_table};

/// Ordering for `list --sort`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Alphabetical by title
    Title,
    /// Highest rating first
    Rating,
    /// Oldest first
    Year,
    /// Newest first
    YearDesc,
}

pub fn run(user: &str, sort: SortOrder, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let movies = ctx.movie_service.list_movies(user.id)?;

    let movies = match sort {
        SortOrder::Title => movies,
        SortOrder::Rating => collection::sort_by_rating(&movies),
        SortOrder::Year => collection::sort_by_year(&movies, false),
        SortOrder::YearDesc => collection::sort_by_year(&movies, true),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&movies)?);
        return Ok(());
    }

    if movies.is_empty() {
        output::warning(&format!("{}, your movie collection is empty.", user.name));
        return Ok(());
    }

    println!("{}", format!("{} movie(s) in total", movies.len()).bold());
    println!("{}", movie_table(&movies));

    Ok(())
}
