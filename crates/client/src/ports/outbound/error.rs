//! Error types for port operations.

use thiserror::Error;

/// Authentication errors, mapped from provider codes to user-facing
/// messages.
///
/// The remote provider reports failures as string codes (optionally
/// prefixed `auth/`). [`AuthError::from_provider`] maps the known codes;
/// an unmapped code falls back to the raw provider message, and a missing
/// message falls back to [`AuthError::Unexpected`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No account found with this email")]
    UserNotFound,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("An account with this email already exists")]
    EmailInUse,
    #[error("Password is too weak")]
    WeakPassword,
    #[error("Email address is invalid")]
    InvalidEmail,
    #[error("Too many attempts - try again later")]
    TooManyRequests,
    #[error("Network error - check your connection")]
    Network,
    #[error("Sign-in window was blocked by the browser")]
    PopupBlocked,
    #[error("Sign-in was cancelled")]
    PopupCancelled,
    #[error("This sign-in method is not enabled")]
    OperationNotAllowed,
    #[error("This account has been disabled")]
    UserDisabled,
    /// Unmapped provider code - carries the raw provider message.
    #[error("{0}")]
    Provider(String),
    #[error("An unexpected error occurred - please try again")]
    Unexpected,
}

impl AuthError {
    /// Map a provider error code (with or without the `auth/` prefix) and
    /// optional raw message to a user-facing error.
    pub fn from_provider(code: &str, message: Option<&str>) -> Self {
        let code = code.strip_prefix("auth/").unwrap_or(code);
        match code {
            "user-not-found" => Self::UserNotFound,
            "wrong-password" | "invalid-credential" => Self::WrongPassword,
            "email-already-in-use" => Self::EmailInUse,
            "weak-password" => Self::WeakPassword,
            "invalid-email" => Self::InvalidEmail,
            "too-many-requests" => Self::TooManyRequests,
            "network-request-failed" => Self::Network,
            "popup-blocked" => Self::PopupBlocked,
            "popup-closed-by-user" | "cancelled-popup-request" => Self::PopupCancelled,
            "operation-not-allowed" => Self::OperationNotAllowed,
            "user-disabled" => Self::UserDisabled,
            _ => match message.map(str::trim).filter(|m| !m.is_empty()) {
                Some(raw) => Self::Provider(raw.to_string()),
                None => Self::Unexpected,
            },
        }
    }
}

/// Local durable-storage errors.
///
/// Guest hydration recovers from these internally (corrupt state is
/// cleared); explicit writes surface them to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage read failed for {key}: {message}")]
    Read { key: String, message: String },

    #[error("Storage write failed for {key}: {message}")]
    Write { key: String, message: String },

    #[error("Corrupt record under {key}: {message}")]
    Corrupt { key: String, message: String },

    #[error("No guest record present")]
    MissingRecord,
}

impl StorageError {
    pub fn read(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn write(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Write {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn corrupt(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Remote document-store errors with context for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    /// Remote call failed - includes operation name for tracing.
    #[error("Remote store error in {operation}: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a Remote error with operation context.
    pub fn remote(operation: &'static str, message: impl ToString) -> Self {
        Self::Remote {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

/// Errors surfaced by the session service to its UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Bad user input, caught before any network or storage call.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Conversion was requested without an active guest session.
    #[error("No active guest session to convert")]
    NotGuest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_variants() {
        let cases = [
            ("user-not-found", AuthError::UserNotFound),
            ("wrong-password", AuthError::WrongPassword),
            ("invalid-credential", AuthError::WrongPassword),
            ("email-already-in-use", AuthError::EmailInUse),
            ("weak-password", AuthError::WeakPassword),
            ("invalid-email", AuthError::InvalidEmail),
            ("too-many-requests", AuthError::TooManyRequests),
            ("network-request-failed", AuthError::Network),
            ("popup-blocked", AuthError::PopupBlocked),
            ("popup-closed-by-user", AuthError::PopupCancelled),
            ("operation-not-allowed", AuthError::OperationNotAllowed),
            ("user-disabled", AuthError::UserDisabled),
        ];
        for (code, expected) in cases {
            assert_eq!(AuthError::from_provider(code, None), expected, "{code}");
            // the auth/ prefix is tolerated
            let prefixed = format!("auth/{code}");
            assert_eq!(AuthError::from_provider(&prefixed, None), expected);
        }
    }

    #[test]
    fn test_unmapped_code_falls_back_to_raw_message() {
        let err = AuthError::from_provider("internal-error", Some("The server exploded"));
        assert_eq!(err, AuthError::Provider("The server exploded".to_string()));
        assert_eq!(err.to_string(), "The server exploded");
    }

    #[test]
    fn test_unmapped_code_without_message_is_generic() {
        let err = AuthError::from_provider("internal-error", None);
        assert_eq!(err, AuthError::Unexpected);
        let err = AuthError::from_provider("internal-error", Some("   "));
        assert_eq!(err, AuthError::Unexpected);
    }

    #[test]
    fn test_session_error_wraps_auth_message() {
        let err = SessionError::from(AuthError::EmailInUse);
        assert_eq!(err.to_string(), "An account with this email already exists");
    }
}
