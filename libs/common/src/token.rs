//! Bearer token issuing and verification
//!
//! Tokens are HS256-signed JWTs carrying the role and issue time. Both
//! services share the signing secret: the auth service mints tokens, every
//! service verifies them without touching the store.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TokenError;

/// Role carried by every token the admin login issues
pub const ADMIN_ROLE: &str = "admin";

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Token validity window in seconds (default: 7 days)
    pub expiry_seconds: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Secret used to sign and verify tokens (required)
    /// - `JWT_EXPIRY`: Token validity in seconds (default: 604800)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| TokenError::Configuration("JWT_SECRET is not set".to_string()))?;

        if secret.trim().is_empty() {
            return Err(TokenError::Configuration(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }

        let expiry_seconds = std::env::var("JWT_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        Ok(TokenConfig {
            secret,
            expiry_seconds,
        })
    }
}

/// Claims embedded in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Role granted by the token
    pub role: String,
    /// Issued at (seconds since epoch)
    pub iat: u64,
    /// Expiration (seconds since epoch)
    pub exp: u64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: TokenConfig,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Mint a token for `role`, valid for the configured window
    pub fn issue(&self, role: &str) -> Result<String, TokenError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let claims = Claims {
            role: role.to_string(),
            iat: now,
            exp: now + self.config.expiry_seconds,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Return the claims of a well-formed, unexpired token
    pub fn verify(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }

    /// Validity window in the short form the login response reports, e.g. `7d`
    pub fn expires_in_label(&self) -> String {
        let seconds = self.config.expiry_seconds;
        match seconds {
            s if s > 0 && s % 86_400 == 0 => format!("{}d", s / 86_400),
            s if s > 0 && s % 3_600 == 0 => format!("{}h", s / 3_600),
            s if s > 0 && s % 60 == 0 => format!("{}m", s / 60),
            s => format!("{}s", s),
        }
    }
}
