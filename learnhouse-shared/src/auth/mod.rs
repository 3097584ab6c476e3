/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing used when the first
///   administrator account is created
pub mod password;
