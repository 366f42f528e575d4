//! Login payloads and the login audit entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request; a missing password is reported as a bad request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// Successful login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_in: String,
}

/// Password change request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// One successful admin login, as recorded in the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogEntry {
    pub ip: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}
