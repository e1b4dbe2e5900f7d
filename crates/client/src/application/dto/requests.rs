//! Validated request DTOs for the session service.
//!
//! Validation runs before any network or storage call; failures surface as
//! `SessionError::Validation` with the first message.

use validator::{Validate, ValidationErrors};

/// Credentials for email/password sign-in.
#[derive(Debug, Clone, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Credentials for account creation and guest conversion.
#[derive(Debug, Clone, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Display name must be at least 2 characters"))]
    pub display_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Email for a password-reset request.
#[derive(Debug, Clone, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

/// Flatten validator output to one user-facing line.
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_is_rejected() {
        let request = RegisterRequest {
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "abc".into(),
        };
        let errors = request.validate().expect_err("too short");
        assert_eq!(
            validation_message(&errors),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_bad_email_shape_is_rejected() {
        let request = RegisterRequest {
            display_name: "Ada".into(),
            email: "not-an-email".into(),
            password: "secret123".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_single_char_display_name_is_rejected() {
        let request = RegisterRequest {
            display_name: "A".into(),
            email: "ada@example.com".into(),
            password: "secret123".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_request_passes() {
        let request = RegisterRequest {
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret123".into(),
        };
        assert!(request.validate().is_ok());
    }
}
