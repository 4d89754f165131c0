//! User domain model

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// A named profile that owns a movie collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Trim a candidate profile name and reject it if nothing is left
    pub fn normalize_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("user name cannot be empty"));
        }
        Ok(trimmed.to_string())
    }
}
