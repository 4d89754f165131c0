//! Movie service - collection CRUD for a single owner

use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{validate_rating, Movie, NewMovie};

/// Movie service
///
/// Every operation checks that the owner exists before touching the
/// movies table, on top of the schema's foreign key.
pub struct MovieService {
    repository: Arc<DuckDbRepository>,
}

impl MovieService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    fn ensure_user(&self, user_id: i64) -> Result<()> {
        match self.repository.get_user(user_id)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("user with id {}", user_id))),
        }
    }

    /// A user's movies ordered by title; empty when there are none
    pub fn list_movies(&self, user_id: i64) -> Result<Vec<Movie>> {
        self.ensure_user(user_id)?;
        self.repository.list_movies(user_id)
    }

    /// Find one movie by case-insensitive title
    pub fn find_movie(&self, user_id: i64, title: &str) -> Result<Option<Movie>> {
        self.ensure_user(user_id)?;
        self.repository.find_movie(user_id, title.trim())
    }

    /// Add a movie; a title the user already has is a `Duplicate` error
    ///
    /// Titles differing only in case count as the same movie, matching how
    /// delete and update find them.
    pub fn add_movie(&self, user_id: i64, movie: &NewMovie) -> Result<Movie> {
        self.ensure_user(user_id)?;
        if let Some(existing) = self.repository.find_movie(user_id, &movie.title)? {
            return Err(Error::duplicate(format!("movie '{}'", existing.title)));
        }
        let stored = self.repository.insert_movie(user_id, movie)?;
        log::info!("added movie {:?} for user {}", stored.title, user_id);
        Ok(stored)
    }

    /// Delete by case-insensitive title; `NotFound` when nothing matched
    pub fn delete_movie(&self, user_id: i64, title: &str) -> Result<()> {
        self.ensure_user(user_id)?;
        if self.repository.delete_movie(user_id, title.trim())? {
            log::info!("deleted movie {:?} for user {}", title, user_id);
            Ok(())
        } else {
            Err(Error::not_found(format!("movie '{}'", title.trim())))
        }
    }

    /// Change only the rating; `NotFound` when nothing matched
    pub fn update_rating(&self, user_id: i64, title: &str, rating: f64) -> Result<()> {
        validate_rating(rating)?;
        self.ensure_user(user_id)?;
        if self.repository.update_movie_rating(user_id, title.trim(), rating)? {
            log::info!("updated rating of {:?} for user {} to {}", title, user_id, rating);
            Ok(())
        } else {
            Err(Error::not_found(format!("movie '{}'", title.trim())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<DuckDbRepository>, MovieService, i64) {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let repo = Arc::new(repo);
        let user = repo.insert_user("dana").unwrap();
        (repo.clone(), MovieService::new(repo), user.id)
    }

    #[test]
    fn test_unknown_owner_is_rejected_before_write() {
        let (_, service, _) = setup();
        let movie = NewMovie::new("Heat", 1995, 8.3, None).unwrap();

        assert!(service.add_movie(999, &movie).unwrap_err().is_not_found());
        assert!(service.list_movies(999).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_rating_validates_range() {
        let (_, service, user_id) = setup();
        service
            .add_movie(user_id, &NewMovie::new("Heat", 1995, 8.3, None).unwrap())
            .unwrap();

        let err = service.update_rating(user_id, "Heat", 11.0).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(service.find_movie(user_id, "heat").unwrap().unwrap().rating, 8.3);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (repo, service, user_id) = setup();
        assert!(service.delete_movie(user_id, "Heat").unwrap_err().is_not_found());
        assert_eq!(repo.count_movies(user_id).unwrap(), 0);
    }
}
