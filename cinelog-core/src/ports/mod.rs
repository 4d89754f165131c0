//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend on
//! these traits so tests can swap in stubs for the network.

mod movie_lookup;

pub use movie_lookup::{LookupResult, MovieLookup};
