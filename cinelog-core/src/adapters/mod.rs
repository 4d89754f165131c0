//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for user and movie storage
//! - OMDb HTTP client for the MovieLookup port

pub mod duckdb;
pub mod omdb;

#[cfg(test)]
pub mod omdb_mock;
