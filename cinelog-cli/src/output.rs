//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use cinelog_core::Movie;

pub use cinelog_core::domain::format_rating;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// `Title (year): rating`
pub fn movie_line(movie: &Movie) -> String {
    format!("{} ({}): {}", movie.title, movie.year, format_rating(movie.rating))
}

/// Table of movies with title, year, rating and poster columns
pub fn movie_table(movies: &[Movie]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Title", "Year", "Rating", "Poster"]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(&movie.title),
            Cell::new(movie.year),
            Cell::new(format_rating(movie.rating)),
            Cell::new(movie.poster_url.as_deref().unwrap_or("-")),
        ]);
    }
    table
}
