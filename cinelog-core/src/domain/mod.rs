//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod movie;
mod user;
pub mod result;

pub use movie::{format_rating, validate_rating, validate_year, Movie, NewMovie, MAX_RATING, MAX_YEAR, MIN_RATING, MIN_YEAR};
pub use user::User;
