//! Credential validator
//!
//! Checks login credentials against the single configured admin account.

use crate::error::AuthError;

const MAX_CREDENTIAL_LENGTH: usize = 256;

/// Performs basic input sanitation to check for malicious or malformed usernames/passwords.
fn is_valid_input(input: &str) -> bool {
    !input.trim().is_empty() && input.len() <= MAX_CREDENTIAL_LENGTH && !input.contains('\0')
}

/// Byte comparison whose running time does not depend on where inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Validates a username/password pair against the expected admin account.
pub fn validate_credentials(
    username: &str,
    password: &str,
    expected_username: &str,
    expected_password: &str,
) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    if !is_valid_input(username) || !is_valid_input(password) {
        return Err(AuthError::InvalidCredentials(username.to_string()));
    }

    let user_ok = constant_time_eq(username.as_bytes(), expected_username.as_bytes());
    let pass_ok = constant_time_eq(password.as_bytes(), expected_password.as_bytes());
    if user_ok && pass_ok {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_credentials() {
        assert!(validate_credentials("admin", "admin123", "admin", "admin123").is_ok());
    }

    #[test]
    fn test_rejects_wrong_credentials() {
        for (user, pass) in [("admin", "wrong"), ("root", "admin123"), ("admin", "admin1234")] {
            assert!(matches!(
                validate_credentials(user, pass, "admin", "admin123"),
                Err(AuthError::InvalidCredentials(_))
            ));
        }
    }

    #[test]
    fn test_missing_and_malformed() {
        assert!(matches!(
            validate_credentials("", "x", "admin", "admin123"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            validate_credentials("admin", "", "admin", "admin123"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            validate_credentials("adm\0in", "admin123", "admin", "admin123"),
            Err(AuthError::InvalidCredentials(_))
        ));
    }
}
