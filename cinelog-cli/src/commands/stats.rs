//! Stats command - rating statistics for a collection

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cinelog_core::services::collection;

use super::{get_context, resolve_user};

pub fn run(user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let movies = ctx.movie_service.list_movies(user.id)?;
    let stats = collection::statistics(&movies);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let Some(stats) = stats else {
        println!("{}", "No movies found.".yellow());
        return Ok(());
    };

    println!("{}", format!("{}'s Movie Statistics", user.name).bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Movies".to_string(), stats.count.to_string()]);
    table.add_row(vec!["Average rating".to_string(), format!("{:.1}", stats.average)]);
    table.add_row(vec!["Median rating".to_string(), format!("{:.1}", stats.median)]);
    table.add_row(vec![
        "Best".to_string(),
        format!("{} ({:.1})", stats.best_titles.join(", "), stats.best_rating),
    ]);
    table.add_row(vec![
        "Worst".to_string(),
        format!("{} ({:.1})", stats.worst_titles.join(", "), stats.worst_rating),
    ]);
    println!("{}", table);

    Ok(())
}
