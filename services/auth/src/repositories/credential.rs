//! Admin credential repository

use std::sync::Arc;

use common::{cache::KeyValueStore, error::StoreResult};

/// Key holding the admin password hash
pub const PASSWORD_HASH_KEY: &str = "admin:password_hash";

/// Stores the single admin password hash
#[derive(Clone)]
pub struct CredentialRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialRepository {
    /// Create a new credential repository
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Get the stored hash, if the credential was ever set
    pub async fn password_hash(&self) -> StoreResult<Option<String>> {
        self.store.get(PASSWORD_HASH_KEY).await
    }

    /// Replace the stored hash
    pub async fn set_password_hash(&self, hash: &str) -> StoreResult<()> {
        self.store.set(PASSWORD_HASH_KEY, hash, None).await
    }
}
