//! DuckDB repository implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::domain::{Movie, NewMovie, User};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of attempts when the database file is locked by another process
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const MOVIE_COLUMNS: &str = "id, title, year, rating, poster_url, user_id";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("could not set lock on file")
        || lower.contains("database is locked")
}

/// Translate a constraint violation into the matching domain error
fn constraint_error(err: duckdb::Error, what: &str) -> Error {
    let msg = err.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("duplicate key") || lower.contains("unique constraint") {
        Error::duplicate(what.to_string())
    } else if lower.contains("foreign key") {
        Error::not_found(format!("owner of {}", what))
    } else {
        Error::Database(msg)
    }
}

/// DuckDB repository for users and their movies
///
/// Every method runs a single auto-committed statement (plus a read-back
/// after inserts). There are no multi-statement transactions.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
}

impl DuckDbRepository {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff while another process holds the
    /// file lock, e.g. a second terminal running the menu.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Connection::open(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        log::warn!(
                            "database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(anyhow!(e));
                        continue;
                    }
                    return Err(anyhow!(e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// Open a throwaway in-memory database (used by tests)
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run any pending migrations
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        let result = self.run_migrations()?;
        if !result.applied.is_empty() {
            log::debug!("applied migrations: {:?}", result.applied);
        }
        Ok(())
    }

    // === User operations ===

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY name")?;
        let users = stmt
            .query_map([], |row| Ok(User::new(row.get(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users WHERE id = ?")?;
        let user = stmt
            .query_map(params![id], |row| {
                Ok(User::new(row.get(0)?, row.get::<_, String>(1)?))
            })?
            .next()
            .transpose()?;
        Ok(user)
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users WHERE name = ?")?;
        let user = stmt
            .query_map(params![name], |row| {
                Ok(User::new(row.get(0)?, row.get::<_, String>(1)?))
            })?
            .next()
            .transpose()?;
        Ok(user)
    }

    /// Insert a user; an existing name is a `Duplicate` error
    pub fn insert_user(&self, name: &str) -> Result<User> {
        {
            let conn = self.conn()?;
            log::debug!("INSERT INTO users (name) VALUES ({:?})", name);
            conn.execute("INSERT INTO users (name) VALUES (?)", params![name])
                .map_err(|e| constraint_error(e, &format!("user '{}'", name)))?;
        }

        self.get_user_by_name(name)?
            .ok_or_else(|| Error::database(format!("user '{}' missing after insert", name)))
    }

    // === Movie operations ===

    /// All movies owned by a user, ordered case-insensitively by title
    pub fn list_movies(&self, user_id: i64) -> Result<Vec<Movie>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE user_id = ? ORDER BY lower(title), title",
            MOVIE_COLUMNS
        ))?;
        let movies = stmt
            .query_map(params![user_id], row_to_movie)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    /// Find a user's movie by case-insensitive title
    pub fn find_movie(&self, user_id: i64, title: &str) -> Result<Option<Movie>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE lower(title) = lower(?) AND user_id = ? ORDER BY id",
            MOVIE_COLUMNS
        ))?;
        let movie = stmt
            .query_map(params![title, user_id], row_to_movie)?
            .next()
            .transpose()?;
        Ok(movie)
    }

    pub fn count_movies(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM movies WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert a movie; a title the user already has is a `Duplicate` error
    pub fn insert_movie(&self, user_id: i64, movie: &NewMovie) -> Result<Movie> {
        let conn = self.conn()?;
        log::debug!(
            "INSERT INTO movies (title, year, rating, poster_url, user_id) VALUES ({:?}, {}, {}, {:?}, {})",
            movie.title,
            movie.year,
            movie.rating,
            movie.poster_url,
            user_id
        );
        conn.execute(
            "INSERT INTO movies (title, year, rating, poster_url, user_id) VALUES (?, ?, ?, ?, ?)",
            params![movie.title, movie.year, movie.rating, movie.poster_url, user_id],
        )
        .map_err(|e| constraint_error(e, &format!("movie '{}'", movie.title)))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE title = ? AND user_id = ?",
            MOVIE_COLUMNS
        ))?;
        let stored = stmt
            .query_map(params![movie.title, user_id], row_to_movie)?
            .next()
            .transpose()?;
        stored.ok_or_else(|| Error::database(format!("movie '{}' missing after insert", movie.title)))
    }

    /// Delete by case-insensitive title; returns true if a row was removed
    pub fn delete_movie(&self, user_id: i64, title: &str) -> Result<bool> {
        let conn = self.conn()?;
        log::debug!("DELETE FROM movies WHERE lower(title) = lower({:?}) AND user_id = {}", title, user_id);
        let rows = conn.execute(
            "DELETE FROM movies WHERE lower(title) = lower(?) AND user_id = ?",
            params![title, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Set the rating by case-insensitive title; returns true if a row changed
    pub fn update_movie_rating(&self, user_id: i64, title: &str, rating: f64) -> Result<bool> {
        let conn = self.conn()?;
        log::debug!(
            "UPDATE movies SET rating = {} WHERE lower(title) = lower({:?}) AND user_id = {}",
            rating,
            title,
            user_id
        );
        let rows = conn.execute(
            "UPDATE movies SET rating = ? WHERE lower(title) = lower(?) AND user_id = ?",
            params![rating, title, user_id],
        )?;
        Ok(rows > 0)
    }
}

fn row_to_movie(row: &duckdb::Row) -> duckdb::Result<Movie> {
    Ok(Movie {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
        rating: row.get(3)?,
        poster_url: row.get(4)?,
        user_id: row.get(5)?,
    })
}
