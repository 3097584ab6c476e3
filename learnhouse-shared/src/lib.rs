//! # LearnHouse Shared Library
//!
//! Domain types, persistence and business logic for the LearnHouse install
//! wizard. The API server wires these into HTTP routes.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing
//! - `config`: Settings the install service reads (install mode)
//! - `db`: Connection pool and migrations
//! - `error`: Install error taxonomy
//! - `install`: The install wizard operations
//! - `models`: Database models and their queries
//! - `store`: Storage seam with PostgreSQL and in-memory backends

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod install;
pub mod models;
pub mod store;

/// Current version of the LearnHouse shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
