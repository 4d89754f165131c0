//! User service - profile management

use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::User;

/// User service for listing and creating profiles
pub struct UserService {
    repository: Arc<DuckDbRepository>,
}

impl UserService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// All profiles ordered by name
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list_users()
    }

    /// Create a profile; an existing name is a `Duplicate` error
    pub fn add_user(&self, name: &str) -> Result<User> {
        let name = User::normalize_name(name)?;
        let user = self.repository.insert_user(&name)?;
        log::info!("created user {:?} (id {})", user.name, user.id);
        Ok(user)
    }

    /// Resolve a profile by exact name
    pub fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        self.repository.get_user_by_name(name.trim())
    }

    /// Resolve a profile by name, failing with `NotFound`
    pub fn require(&self, name: &str) -> Result<User> {
        self.find_by_name(name)?
            .ok_or_else(|| Error::not_found(format!("user '{}'", name.trim())))
    }
}
