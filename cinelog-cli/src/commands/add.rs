//! Add command - add a movie, filling details from OMDb

use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cinelog_core::services::LogEvent;
use cinelog_core::{CinelogContext, LookupResult, NewMovie};

use super::{get_context, get_logger, log_event, resolve_user};
use crate::output::{self, movie_line};

/// Details given on the command line
pub struct AddArgs {
    pub title: String,
    pub user: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
    pub no_lookup: bool,
    pub json: bool,
}

/// Look a title up while showing a spinner
pub fn lookup_with_spinner(ctx: &CinelogContext, title: &str) -> LookupResult {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Looking up '{}' on {}...", title, ctx.lookup.name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = ctx.lookup.lookup(title);

    spinner.finish_and_clear();
    result
}

/// Flags win over looked-up values; every field must end up known
fn merge_details(args: &AddArgs, fetched: &LookupResult) -> Result<NewMovie> {
    let year = args.year.or(fetched.year);
    let rating = args.rating.or(fetched.rating);
    let poster = args.poster.clone().or_else(|| fetched.poster_url.clone());

    match (year, rating) {
        (Some(year), Some(rating)) => Ok(NewMovie::new(&args.title, year, rating, poster)?),
        _ => {
            let reason = fetched
                .message
                .as_deref()
                .unwrap_or("lookup returned incomplete data");
            bail!(
                "Missing year or rating for '{}' ({}). Pass --year and --rating.",
                args.title.trim(),
                reason
            )
        }
    }
}

pub fn run(args: AddArgs) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = resolve_user(&ctx, &args.user)?;

    let needs_lookup = !args.no_lookup
        && (args.year.is_none() || args.rating.is_none() || args.poster.is_none());
    let fetched = if needs_lookup {
        let result = lookup_with_spinner(&ctx, args.title.trim());
        if let Some(message) = &result.message {
            if !args.json {
                output::info(&format!("Lookup: {}", message));
            }
            log_event(
                logger.as_ref(),
                LogEvent::new("lookup_failed")
                    .with_profile(&user.name)
                    .with_command("add")
                    .with_error(message.clone()),
            );
        }
        result
    } else {
        LookupResult::default()
    };

    let movie = merge_details(&args, &fetched)?;
    let stored = ctx.movie_service.add_movie(user.id, &movie)?;
    log_event(
        logger.as_ref(),
        LogEvent::new("movie_added")
            .with_profile(&user.name)
            .with_command("add"),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
    } else {
        println!("{} {}", "Added:".green(), movie_line(&stored));
        if let Some(poster) = &stored.poster_url {
            println!("  Poster: {}", poster);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(year: Option<i32>, rating: Option<f64>) -> AddArgs {
        AddArgs {
            title: " Heat ".to_string(),
            user: "dana".to_string(),
            year,
            rating,
            poster: None,
            no_lookup: false,
            json: false,
        }
    }

    #[test]
    fn test_flags_override_lookup() {
        let fetched = LookupResult {
            year: Some(1995),
            rating: Some(8.3),
            poster_url: Some("https://img/heat.jpg".to_string()),
            message: None,
        };
        let movie = merge_details(&args(None, Some(9.0)), &fetched).unwrap();
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.year, 1995);
        assert_eq!(movie.rating, 9.0);
        assert_eq!(movie.poster_url.as_deref(), Some("https://img/heat.jpg"));
    }

    #[test]
    fn test_missing_rating_is_an_error() {
        let fetched = LookupResult::missing("Movie not found!");
        let err = merge_details(&args(Some(1995), None), &fetched).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("--rating"));
        assert!(message.contains("Movie not found!"));
    }

    #[test]
    fn test_out_of_range_flag_is_rejected() {
        let err = merge_details(&args(Some(1995), Some(12.0)), &LookupResult::default());
        assert!(err.is_err());
    }
}
