//! Movie domain model

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Earliest accepted release year
pub const MIN_YEAR: i32 = 1888;
/// Latest accepted release year
pub const MAX_YEAR: i32 = 2100;
/// Lowest rating on the 0-10 scale
pub const MIN_RATING: f64 = 0.0;
/// Highest rating on the 0-10 scale
pub const MAX_RATING: f64 = 10.0;

/// A movie stored in a user's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    /// Rating on the 0-10 scale
    pub rating: f64,
    pub poster_url: Option<String>,
    pub user_id: i64,
}

/// Validated input for inserting a movie
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: Option<String>,
}

impl NewMovie {
    /// Build a new movie, trimming the title and blank poster URLs
    pub fn new(
        title: &str,
        year: i32,
        rating: f64,
        poster_url: Option<String>,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::validation("movie title cannot be empty"));
        }
        validate_year(year)?;
        validate_rating(rating)?;

        let poster_url = poster_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            title: title.to_string(),
            year,
            rating,
            poster_url,
        })
    }
}

/// Check that a rating sits on the 0-10 scale
pub fn validate_rating(rating: f64) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::validation(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }
    Ok(())
}

/// Check that a year is a plausible release year
pub fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::validation(format!(
            "year must be between {} and {}, got {}",
            MIN_YEAR, MAX_YEAR, year
        )));
    }
    Ok(())
}

/// Ratings always show at least one decimal: `9.0`, `8.75`
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_movie_trims_fields() {
        let movie = NewMovie::new("  Inception ", 2010, 8.8, Some("  ".to_string())).unwrap();
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.poster_url, None);
    }

    #[test]
    fn test_new_movie_rejects_empty_title() {
        let err = NewMovie::new("   ", 2010, 8.8, None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.0).is_ok());
        assert!(validate_rating(10.1).is_err());
        assert!(validate_rating(-0.5).is_err());
        assert!(validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn test_year_bounds() {
        assert!(validate_year(1888).is_ok());
        assert!(validate_year(2100).is_ok());
        assert!(validate_year(1887).is_err());
        assert!(validate_year(2101).is_err());
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(9.0), "9.0");
        assert_eq!(format_rating(8.8), "8.8");
        assert_eq!(format_rating(8.75), "8.75");
    }
}
