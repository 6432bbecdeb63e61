//! Password hashing and the password policy
//!
//! Uses Argon2id for password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Longest password accepted, to bound hashing cost
pub const MAX_PASSWORD_LEN: usize = 128;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Validate password strength
///
/// A password needs 8 to 128 characters with at least one uppercase letter,
/// one lowercase letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let length = password.chars().count();
    if length < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if length > MAX_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters long"
        )));
    }

    if !password.chars().any(char::is_uppercase) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !password.chars().any(char::is_lowercase) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}

/// The new password and its confirmation must be identical
pub fn ensure_passwords_match(password: &str, confirmed: &str) -> Result<(), AppError> {
    if password == confirmed {
        Ok(())
    } else {
        Err(AppError::Validation(
            "The two password fields didn't match.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "SecurePassword123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        // fresh salt every time
        assert_ne!(hash, hash_password(password).unwrap());
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("Pw1!2345").unwrap();

        assert!(verify_password("Pw1!2345", &hash).unwrap());
        assert!(!verify_password("Pw1!2346", &hash).unwrap());
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(verify_password("whatever", "not-a-hash").is_err());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("SecurePass1").is_ok());
        assert!(validate_password_strength("Pw1!2345").is_ok());

        let cases = [
            ("Short1", "8 characters"),
            ("lowercase123", "uppercase"),
            ("UPPERCASE123", "lowercase"),
            ("NoDigitsHere", "digit"),
        ];
        for (password, expected) in cases {
            match validate_password_strength(password) {
                Err(AppError::Validation(msg)) => assert!(msg.contains(expected), "{msg}"),
                other => panic!("expected validation error for {password}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_overlong_password_rejected() {
        let password = format!("Aa1{}", "x".repeat(MAX_PASSWORD_LEN));
        assert!(validate_password_strength(&password).is_err());
    }

    #[test]
    fn test_ensure_passwords_match() {
        assert!(ensure_passwords_match("Pw1!2345", "Pw1!2345").is_ok());
        let err = ensure_passwords_match("Pw1!2345", "Pw1!2346").unwrap_err();
        assert_eq!(err.to_string(), "The two password fields didn't match.");
    }
}
