//! Authentication service models

pub mod login;

// Re-export for convenience
pub use login::{ChangePasswordRequest, LoginLogEntry, LoginRequest, LoginResponse};
