//! Input schemas for user, account and session requests.

use serde::Deserialize;

use crate::errors::AppError;
use crate::store::normalize_email;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Signup input after validation. Email is normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSignup {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub fn validate_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if email.chars().count() > MAX_EMAIL_CHARS || !is_plausible_email(&email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    Ok(email)
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    if len > MAX_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

/// Display name; defaults to the local part of the email when absent or blank.
pub fn validate_name(name: Option<&str>, email: &str) -> Result<String, AppError> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    match name {
        Some(n) if n.chars().count() > MAX_NAME_CHARS => Err(AppError::Validation(format!(
            "Name must be at most {MAX_NAME_CHARS} characters"
        ))),
        Some(n) => Ok(n.to_string()),
        None => Ok(email.split('@').next().unwrap_or_default().to_string()),
    }
}

impl SignupRequest {
    pub fn validate(self) -> Result<ValidSignup, AppError> {
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;
        let name = validate_name(self.name.as_deref(), &email)?;
        Ok(ValidSignup {
            email,
            password: self.password,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
        }
    }

    #[test]
    fn test_valid_signup_normalizes_email_and_defaults_name() {
        let valid = signup(" Ada@Example.com ", "correct horse").validate().unwrap();
        assert_eq!(valid.email, "ada@example.com");
        assert_eq!(valid.name, "ada");
    }

    #[test]
    fn test_short_password_mentions_8_characters() {
        let err = signup("ada@example.com", "short").validate().unwrap_err();
        assert!(err.to_string().contains("8 characters"));
    }

    #[test]
    fn test_password_length_counts_chars_not_bytes() {
        assert!(validate_password("ééééééé").is_err());
        assert!(validate_password("éééééééé").is_ok());
    }

    #[test]
    fn test_overlong_password_rejected() {
        assert!(validate_password(&"x".repeat(129)).is_err());
        assert!(validate_password(&"x".repeat(128)).is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("ada@exa mple.com").is_err());
        assert!(validate_email("ada@@example.com").is_err());
        assert!(validate_email("ada@example..com").is_err());
    }

    #[test]
    fn test_name_limits() {
        assert_eq!(
            validate_name(Some("  Ada Lovelace "), "a@b.co").unwrap(),
            "Ada Lovelace"
        );
        assert!(validate_name(Some(&"n".repeat(101)), "a@b.co").is_err());
    }
}
