//! Cinelog Core - Business logic for a personal movie collection
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Movie) and validation
//! - **ports**: Trait definitions for external dependencies (MovieLookup)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, OMDb)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use adapters::omdb::OmdbProvider;
use config::Config;
use services::{MovieService, SiteService, UserService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Movie, NewMovie, User};
pub use ports::{LookupResult, MovieLookup};

/// Main context for cinelog operations
///
/// Holds the database connection, configuration, lookup provider and all
/// services. Both the interactive menu and the one-shot commands build one.
pub struct CinelogContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub user_service: UserService,
    pub movie_service: MovieService,
    pub site_service: SiteService,
    pub lookup: Box<dyn MovieLookup>,
}

impl CinelogContext {
    /// Open the collection in a data directory with the configured OMDb provider
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let lookup = Box::new(OmdbProvider::from_config(&config.lookup));
        Self::with_lookup(data_dir, config, lookup)
    }

    /// Open the collection with an explicit config and lookup provider
    pub fn with_lookup(
        data_dir: &Path,
        config: Config,
        lookup: Box<dyn MovieLookup>,
    ) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&data_dir.join("cinelog.duckdb"))?);
        repository.ensure_schema()?;

        let user_service = UserService::new(Arc::clone(&repository));
        let movie_service = MovieService::new(Arc::clone(&repository));
        let site_service = SiteService::new(Arc::clone(&repository), config.site.clone());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            config,
            repository,
            user_service,
            movie_service,
            site_service,
            lookup,
        })
    }
}
