/// Password hashing using Argon2id
///
/// The install wizard never stores a plaintext password: the administrator
/// password is hashed here before the user row is written.
///
/// # Parameters
///
/// [`PasswordHasher::default`] uses 64 MB of memory, 3 passes and 4 lanes
/// with a 32-byte output. Tests build a cheaper hasher with
/// [`PasswordHasher::with_cost`].
///
/// # Example
///
/// ```
/// use learnhouse_shared::auth::password::PasswordHasher;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = PasswordHasher::with_cost(4096, 1, 1)?;
/// let hash = hasher.hash("super_secret_password_123")?;
///
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(hasher.verify("super_secret_password_123", &hash)?);
/// assert!(!hasher.verify("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Memory cost in KiB (64 MB)
const DEFAULT_M_COST: u32 = 65536;

/// Number of passes
const DEFAULT_T_COST: u32 = 3;

/// Degree of parallelism
const DEFAULT_P_COST: u32 = 4;

/// Hash output length in bytes
const OUTPUT_LEN: usize = 32;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Argon2 rejected the cost parameters
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Verification failed for a reason other than a wrong password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),
}

/// Argon2id hasher with fixed cost parameters
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Builds a hasher with explicit costs
    ///
    /// * `m_cost` - memory in KiB (at least `8 * p_cost`)
    /// * `t_cost` - number of passes
    /// * `p_cost` - parallel lanes
    pub fn with_cost(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(m_cost, t_cost, p_cost, Some(OUTPUT_LEN))
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password into a PHC string
    ///
    /// A fresh 16-byte salt is drawn from the OS RNG on every call, so
    /// hashing the same password twice yields different strings.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Runs [`hash`](Self::hash) on the blocking thread pool
    ///
    /// Use this from async code: the default costs take 64 MB of memory and
    /// tens of milliseconds of CPU per call.
    pub async fn hash_blocking(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashError(format!("hashing task failed: {}", e)))?
    }

    /// Verifies a plaintext password against a PHC string
    ///
    /// Returns `Ok(false)` for a wrong password and an error only when the
    /// stored hash is unusable. Parameters embedded in the hash take
    /// precedence over this hasher's own.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        if parsed.hash.is_none() {
            return Err(PasswordError::InvalidHash("missing hash output".to_string()));
        }

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        let params = Params::new(DEFAULT_M_COST, DEFAULT_T_COST, DEFAULT_P_COST, Some(OUTPUT_LEN))
            .unwrap_or_default();
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4096, 1, 1).expect("valid params")
    }

    #[test]
    fn test_default_hash_embeds_parameters() {
        let hash = PasswordHasher::default()
            .hash("test_password_123")
            .expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same_password").unwrap();
        let hash2 = hasher.hash("same_password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret").unwrap();

        assert!(hasher.verify("secret", &hash).unwrap());
        assert!(!hasher.verify("Secret", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let hash = fast_hasher().hash("secret").unwrap();
        assert!(PasswordHasher::default().verify("secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(hasher.verify("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_verify_rejects_hash_without_output() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify("password", "$argon2id$v=19$m=4096,t=1,p=1"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[tokio::test]
    async fn test_hash_blocking_produces_verifiable_hash() {
        let hasher = fast_hasher();
        let hash = hasher.hash_blocking("secret").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret", &hash).unwrap());
    }

    #[test]
    fn test_with_cost_rejects_bad_params() {
        assert!(matches!(
            PasswordHasher::with_cost(1, 1, 1),
            Err(PasswordError::InvalidParams(_))
        ));
    }
}
