//! # Commerce Error Types
//!
//! Error types for calls to the commerce platform.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Commerce Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Lookup         │  │  Auth           │  │  Concurrency            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotFound       │  │  InvalidCreds   │  │  VersionConflict        │ │
//! │  │  Duplicate      │  │  Unauthorized   │  │                         │ │
//! │  │                 │  │  WrongPassword  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Rules          │  │  Transport      │                              │
//! │  │                 │  │                 │                              │
//! │  │  Rule(CoreError)│  │  Transport      │                              │
//! │  │                 │  │  Internal       │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for commerce operations.
pub type CommerceResult<T> = Result<T, CommerceError>;

/// Failure of a commerce platform call.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique field already taken (email on sign-up or email change).
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Email/password pair did not match a customer.
    #[error("Customer account with the given credentials not found")]
    InvalidCredentials,

    /// Token missing, unknown or expired, or not allowed to touch the resource.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Current password given to a password change was wrong.
    #[error("The given current password does not match")]
    WrongPassword,

    /// Update was based on a stale version.
    #[error("{entity} version conflict: expected {expected}, actual {actual}")]
    VersionConflict {
        entity: String,
        expected: i64,
        actual: i64,
    },

    /// Update violates a cart or catalog rule.
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// Network-level failure talking to the platform.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unexpected platform failure.
    #[error("Internal commerce error: {0}")]
    Internal(String),
}

impl CommerceError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CommerceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        CommerceError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when the session token can no longer be used and the customer
    /// must sign in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, CommerceError::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CommerceError::not_found("Cart", "c-1").to_string(),
            "Cart not found: c-1"
        );
        let err = CommerceError::VersionConflict {
            entity: "Customer".into(),
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "Customer version conflict: expected 3, actual 4"
        );
    }

    #[test]
    fn test_rule_errors_are_transparent() {
        let err: CommerceError = CoreError::LineItemNotFound("l-1".into()).into();
        assert_eq!(err.to_string(), "Line item l-1 is not in the cart");
        assert!(!err.is_auth_error());
        assert!(CommerceError::Unauthorized("expired".into()).is_auth_error());
    }
}
