//! Input validation utilities

/// Minimum length of a new admin password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length of a new admin password, in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a replacement admin password
pub fn validate_new_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Require a non-empty field, reporting `message` otherwise
pub fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, String> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("12345678").is_ok());
        assert_eq!(
            validate_new_password("short").unwrap_err(),
            "Password must be at least 8 characters"
        );
        assert!(validate_new_password(&"x".repeat(129)).is_err());
        // Counted in characters, not bytes
        assert!(validate_new_password("pässwör").is_err());
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some("x"), "missing"), Ok("x"));
        assert_eq!(require(Some(""), "missing"), Err("missing".to_string()));
        assert_eq!(require(None, "missing"), Err("missing".to_string()));
    }
}
