//! Event log migrations
//!
//! The event log lives in its own `logs.duckdb` file so it can be cleared or
//! exported without touching the collection database. Same layout as the
//! main migrations: `(filename, sql_content)` applied in name order.

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_events.sql", include_str!("001_events.sql")),
];
