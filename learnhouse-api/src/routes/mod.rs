/// API route handlers
///
/// - `health`: Health check endpoint
/// - `install`: Install wizard endpoints

pub mod health;
pub mod install;
