/// Database models for LearnHouse
///
/// This module contains the models the install wizard creates and their
/// PostgreSQL queries.
///
/// # Models
///
/// - `install`: Installer progress records
/// - `role`: Authorization roles and their permission matrix
/// - `organization`: Organizations (tenants)
/// - `user`: User accounts
/// - `user_organization`: User-organization memberships with a role
pub mod install;
pub mod organization;
pub mod role;
pub mod user;
pub mod user_organization;
