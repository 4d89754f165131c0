//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod collection;
pub mod event_log;
pub mod migration;
mod movie;
mod site;
mod user;

pub use collection::{MovieFilter, Statistics};
pub use event_log::{EventLog, EventQuery, EventRecord, LogEvent, ProfileActivity};
pub use migration::{MigrationResult, MigrationService};
pub use movie::MovieService;
pub use site::{render_page, SiteResult, SiteService, DEFAULT_TEMPLATE};
pub use user::UserService;
