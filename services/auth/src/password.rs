//! Admin credential hashing and verification
//!
//! Hashes are Argon2id PHC strings with a random per-hash salt. Hashing is CPU
//! bound, so the async helpers run it on the blocking pool.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Invalid hashing parameters: {0}")]
    Parameters(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Hashing task failed: {0}")]
    Task(String),
}

/// One-way password hashing behind a seam, so tests can trade cost for speed
pub trait CredentialVerifier: Send + Sync {
    /// Produce a salted hash of `plaintext`
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Check `plaintext` against a stored hash
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2 cost configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl Argon2Config {
    /// Create a new Argon2Config from environment variables
    ///
    /// # Environment Variables
    /// - `ARGON2_MEMORY_KIB`: Memory cost in KiB (default: 19456)
    /// - `ARGON2_ITERATIONS`: Time cost (default: 2)
    /// - `ARGON2_PARALLELISM`: Lanes (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, default: u32| {
            std::env::var(name)
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(default)
        };

        Self {
            memory_kib: read("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: read("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: read("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }
}

/// Argon2id implementation of [`CredentialVerifier`]
#[derive(Debug, Clone)]
pub struct Argon2Verifier {
    params: Params,
}

impl Argon2Verifier {
    pub fn new(config: &Argon2Config) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::Parameters(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::Hash(e.to_string()))?;

        // Cost parameters come from the stored hash, not from self.params
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }
}

/// Hash `plaintext` on the blocking pool
pub async fn hash_password(
    verifier: &Arc<dyn CredentialVerifier>,
    plaintext: &str,
) -> Result<String, PasswordError> {
    let verifier = Arc::clone(verifier);
    let plaintext = plaintext.to_string();
    tokio::task::spawn_blocking(move || verifier.hash(&plaintext))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// Verify `plaintext` against `hash` on the blocking pool
pub async fn verify_password(
    verifier: &Arc<dyn CredentialVerifier>,
    plaintext: &str,
    hash: &str,
) -> Result<bool, PasswordError> {
    let verifier = Arc::clone(verifier);
    let plaintext = plaintext.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verifier.verify(&plaintext, &hash))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}
