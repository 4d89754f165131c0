//! Collection analysis - statistics, sorting, searching and filtering
//!
//! Pure functions over an in-memory list of movies, so the CLI can render
//! the results however it likes.

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::domain::Movie;

/// Rating statistics for a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub best_rating: f64,
    /// Every title sharing the best rating
    pub best_titles: Vec<String>,
    pub worst_rating: f64,
    /// Every title sharing the worst rating
    pub worst_titles: Vec<String>,
}

/// Optional bounds for filtering; all bounds are inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        if self.min_rating.is_some_and(|min| movie.rating < min) {
            return false;
        }
        if self.start_year.is_some_and(|start| movie.year < start) {
            return false;
        }
        if self.end_year.is_some_and(|end| movie.year > end) {
            return false;
        }
        true
    }
}

/// Mean and median of a list of ratings; `(0.0, 0.0)` when empty
pub fn average_and_median(ratings: &[f64]) -> (f64, f64) {
    if ratings.is_empty() {
        return (0.0, 0.0);
    }

    let count = ratings.len();
    let average = ratings.iter().sum::<f64>() / count as f64;

    let mut sorted = ratings.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    (average, median)
}

/// Statistics for a collection; `None` when it is empty
pub fn statistics(movies: &[Movie]) -> Option<Statistics> {
    let ratings: Vec<f64> = movies.iter().map(|m| m.rating).collect();
    let best_rating = ratings.iter().copied().reduce(f64::max)?;
    let worst_rating = ratings.iter().copied().reduce(f64::min)?;
    let (average, median) = average_and_median(&ratings);

    let titles_rated = |rating: f64| -> Vec<String> {
        movies
            .iter()
            .filter(|m| m.rating == rating)
            .map(|m| m.title.clone())
            .collect()
    };

    Some(Statistics {
        count: movies.len(),
        average,
        median,
        best_rating,
        best_titles: titles_rated(best_rating),
        worst_rating,
        worst_titles: titles_rated(worst_rating),
    })
}

/// Highest rated first; ties keep their original order
pub fn sort_by_rating(movies: &[Movie]) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted
}

/// Chronological order, newest first when `latest_first` is set
pub fn sort_by_year(movies: &[Movie], latest_first: bool) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    if latest_first {
        sorted.sort_by(|a, b| b.year.cmp(&a.year));
    } else {
        sorted.sort_by_key(|m| m.year);
    }
    sorted
}

/// Movies whose title contains `query`, ignoring case
pub fn search(movies: &[Movie], query: &str) -> Vec<Movie> {
    let needle = query.trim().to_lowercase();
    movies
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn filter(movies: &[Movie], filter: &MovieFilter) -> Vec<Movie> {
    movies.iter().filter(|m| filter.matches(m)).cloned().collect()
}

/// A uniformly random movie, or `None` for an empty collection
pub fn pick_random(movies: &[Movie]) -> Option<&Movie> {
    movies.choose(&mut rand::thread_rng())
}
