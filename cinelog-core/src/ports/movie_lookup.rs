//! Movie metadata lookup port
//!
//! Implementations fetch release year, rating and poster for a title from an
//! external source. A lookup never fails outright: anything that goes wrong
//! comes back as a result with the missing fields left empty and a message
//! for the console.

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::NewMovie;

/// Details returned by a metadata lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupResult {
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    /// Why fields are missing (network error, unknown title, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LookupResult {
    /// All-missing result carrying the reason
    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// True when year, rating and poster are all known
    pub fn is_complete(&self) -> bool {
        self.year.is_some() && self.rating.is_some() && self.poster_url.is_some()
    }

    /// Turn a complete result into an insertable movie
    ///
    /// Returns `None` when a field is missing; values outside the accepted
    /// ranges surface as a validation error.
    pub fn into_new_movie(self, title: &str) -> Option<Result<NewMovie>> {
        match (self.year, self.rating, self.poster_url) {
            (Some(year), Some(rating), Some(poster)) => {
                Some(NewMovie::new(title, year, rating, Some(poster)))
            }
            _ => None,
        }
    }
}

/// Metadata lookup provider
pub trait MovieLookup: Send + Sync {
    /// Provider name (e.g. "omdb")
    fn name(&self) -> &str;

    /// Look up a title
    fn lookup(&self, title: &str) -> LookupResult;
}
