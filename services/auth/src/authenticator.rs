//! Admin authentication: rate-limited login and password changes
//!
//! There is one admin credential. Its hash lives in the store; when the store
//! has none yet, the first login or password change hashes the configured
//! fallback secret (`ADMIN_PASSWORD`) and persists it, so the env var only
//! seeds the credential.

use std::sync::Arc;

use chrono::Utc;
use common::{
    cache::KeyValueStore,
    error::{StoreError, TokenError},
    token::{ADMIN_ROLE, TokenService},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    models::LoginLogEntry,
    password::{self, CredentialVerifier, PasswordError},
    rate_limiter::{RateLimitStatus, RateLimiter, RateLimiterConfig},
    repositories::{CredentialRepository, LoginLogRepository},
};

#[derive(Error, Debug)]
pub enum AuthenticatorError {
    #[error("Admin password not configured")]
    NotConfigured,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Outcome of a login attempt that reached a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { token: String },
    Rejected { attempts_remaining: u32 },
    Locked { retry_after: u64 },
}

/// Outcome of a password change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChange {
    Changed,
    WrongPassword,
}

/// Authenticator configuration
#[derive(Debug, Clone, Default)]
pub struct AuthenticatorConfig {
    /// Secret used to seed the credential when the store holds none
    pub fallback_secret: Option<String>,
}

impl AuthenticatorConfig {
    /// Create a new AuthenticatorConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ADMIN_PASSWORD`: Initial admin password (optional once a hash is stored)
    pub fn from_env() -> Self {
        let fallback_secret = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|secret| !secret.is_empty());

        Self { fallback_secret }
    }
}

/// Authenticates the admin and manages the admin credential
#[derive(Clone)]
pub struct Authenticator {
    config: AuthenticatorConfig,
    verifier: Arc<dyn CredentialVerifier>,
    credentials: CredentialRepository,
    login_log: LoginLogRepository,
    rate_limiter: RateLimiter,
    token_service: TokenService,
}

impl Authenticator {
    pub fn new(
        config: AuthenticatorConfig,
        limiter_config: RateLimiterConfig,
        store: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
        token_service: TokenService,
    ) -> Self {
        Self {
            config,
            verifier,
            credentials: CredentialRepository::new(store.clone()),
            login_log: LoginLogRepository::new(store.clone()),
            rate_limiter: RateLimiter::new(limiter_config, store),
            token_service,
        }
    }

    /// Attempt an admin login on behalf of `client_id`
    ///
    /// A locked-out client is turned away before the password is looked at.
    /// Failures count against the client; success clears its counter, mints a
    /// token and records the login.
    pub async fn login(
        &self,
        client_id: &str,
        password: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginOutcome, AuthenticatorError> {
        let failures = match self.rate_limiter.check(client_id).await? {
            RateLimitStatus::Locked { retry_after } => {
                warn!("Rejected login from locked out client {}", client_id);
                return Ok(LoginOutcome::Locked { retry_after });
            }
            RateLimitStatus::Allowed { failures } => failures,
        };

        let hash = self.password_hash().await?;
        if !password::verify_password(&self.verifier, password, &hash).await? {
            let attempts_remaining = self.rate_limiter.record_failure(client_id, failures).await?;
            info!(
                "Failed login from {} ({} attempts remaining)",
                client_id, attempts_remaining
            );
            return Ok(LoginOutcome::Rejected { attempts_remaining });
        }

        self.rate_limiter.reset(client_id).await?;
        let token = self.token_service.issue(ADMIN_ROLE)?;
        self.login_log
            .append(&LoginLogEntry {
                ip: client_id.to_string(),
                timestamp: Utc::now(),
                user_agent: user_agent.map(str::to_string),
            })
            .await?;

        info!("Admin logged in from {}", client_id);
        Ok(LoginOutcome::Authenticated { token })
    }

    /// Replace the admin password after checking the current one
    ///
    /// Tokens issued before the change stay valid until they expire.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
    ) -> Result<PasswordChange, AuthenticatorError> {
        let hash = self.password_hash().await?;
        if !password::verify_password(&self.verifier, current, &hash).await? {
            return Ok(PasswordChange::WrongPassword);
        }

        let new_hash = password::hash_password(&self.verifier, new).await?;
        self.credentials.set_password_hash(&new_hash).await?;

        info!("Admin password changed");
        Ok(PasswordChange::Changed)
    }

    /// Most recent successful logins, newest first
    pub async fn recent_logins(&self, limit: usize) -> Result<Vec<LoginLogEntry>, AuthenticatorError> {
        Ok(self.login_log.recent(limit).await?)
    }

    /// Validity window label reported alongside issued tokens
    pub fn token_expires_in(&self) -> String {
        self.token_service.expires_in_label()
    }

    /// Load the stored hash, seeding it from the fallback secret on first use
    async fn password_hash(&self) -> Result<String, AuthenticatorError> {
        if let Some(hash) = self.credentials.password_hash().await? {
            return Ok(hash);
        }

        let secret = self
            .config
            .fallback_secret
            .as_deref()
            .ok_or(AuthenticatorError::NotConfigured)?;
        let hash = password::hash_password(&self.verifier, secret).await?;
        self.credentials.set_password_hash(&hash).await?;

        info!("Seeded admin credential from ADMIN_PASSWORD");
        Ok(hash)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::password::{Argon2Config, Argon2Verifier};
    use crate::repositories::credential::PASSWORD_HASH_KEY;
    use common::{
        cache::MemoryStore,
        token::TokenConfig,
    };

    pub(crate) fn cheap_verifier() -> Arc<dyn CredentialVerifier> {
        Arc::new(
            Argon2Verifier::new(&Argon2Config {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
        )
    }

    pub(crate) fn token_service() -> TokenService {
        TokenService::new(TokenConfig {
            secret: "test-secret".to_string(),
            expiry_seconds: 604800,
        })
    }

    fn authenticator(store: &MemoryStore, fallback: Option<&str>) -> Authenticator {
        Authenticator::new(
            AuthenticatorConfig {
                fallback_secret: fallback.map(str::to_string),
            },
            RateLimiterConfig::default(),
            Arc::new(store.clone()),
            cheap_verifier(),
            token_service(),
        )
    }

    #[tokio::test]
    async fn test_login_seeds_credential_and_issues_token() {
        let store = MemoryStore::new();
        let auth = authenticator(&store, Some("correct-horse"));

        let outcome = auth.login("1.2.3.4", "correct-horse", Some("curl/8")).await.unwrap();
        let LoginOutcome::Authenticated { token } = outcome else {
            panic!("expected a token, got {:?}", outcome);
        };
        assert!(token_service().verify(&token).unwrap().is_admin());

        // The hash is stored, never the plaintext
        let stored = store.get(PASSWORD_HASH_KEY).await.unwrap().unwrap();
        assert!(stored.starts_with("$argon2id$"));

        let log = auth.recent_logins(10).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].ip, "1.2.3.4");
        assert_eq!(log[0].user_agent.as_deref(), Some("curl/8"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_misconfiguration() {
        let store = MemoryStore::new();
        let auth = authenticator(&store, None);

        let result = auth.login("1.2.3.4", "anything", None).await;
        assert!(matches!(result, Err(AuthenticatorError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_failures_lead_to_lockout_even_for_correct_password() {
        let store = MemoryStore::new();
        let auth = authenticator(&store, Some("correct-horse"));

        for expected in (0..5).rev() {
            assert_eq!(
                auth.login("1.2.3.4", "wrong", None).await.unwrap(),
                LoginOutcome::Rejected {
                    attempts_remaining: expected
                }
            );
        }

        let outcome = auth.login("1.2.3.4", "correct-horse", None).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Locked { retry_after } if retry_after > 0));

        // Another client still gets in
        let outcome = auth.login("5.6.7.8", "correct-horse", None).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated { .. }));
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let store = MemoryStore::new();
        let auth = authenticator(&store, Some("correct-horse"));

        auth.login("client", "wrong", None).await.unwrap();
        auth.login("client", "wrong", None).await.unwrap();
        auth.login("client", "correct-horse", None).await.unwrap();

        assert_eq!(
            auth.login("client", "wrong", None).await.unwrap(),
            LoginOutcome::Rejected {
                attempts_remaining: 4
            }
        );
    }

    #[tokio::test]
    async fn test_change_password() {
        let store = MemoryStore::new();
        let auth = authenticator(&store, Some("correct-horse"));

        assert_eq!(
            auth.change_password("not-it", "new-password-1").await.unwrap(),
            PasswordChange::WrongPassword
        );
        assert_eq!(
            auth.change_password("correct-horse", "new-password-1").await.unwrap(),
            PasswordChange::Changed
        );

        // The stored hash wins over the fallback secret from now on
        assert!(matches!(
            auth.login("client", "correct-horse", None).await.unwrap(),
            LoginOutcome::Rejected { .. }
        ));
        assert!(matches!(
            auth.login("client", "new-password-1", None).await.unwrap(),
            LoginOutcome::Authenticated { .. }
        ));
    }
}
