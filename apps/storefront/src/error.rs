//! # App Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Page / shell              Commands                                     │
//! │  ────────────              ────────                                     │
//! │                                                                         │
//! │  app.dispatch(Action::Login { .. })                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Form invalid? ──── ValidationErrors ───────────┐                │  │
//! │  │         │                                       │                │  │
//! │  │         ▼                                       ▼                │  │
//! │  │  Platform failed? ── CommerceError ───────── AppError ──────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  dispatch() logs the error, publishes Notice { level: Error } and      │
//! │  returns it. The operation stops; nothing is retried.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_commerce::CommerceError;
use storefront_core::{CoreError, ValidationError, ValidationErrors};
use thiserror::Error;

use crate::state::ConfigError;

/// A Store write that was refused. Nothing was stored or published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Access token must not be empty")]
    EmptyToken,

    #[error("Customer cart {cart_id} does not belong to the current customer")]
    ForeignCart { cart_id: String },

    #[error("Customer cart set while no customer is signed in")]
    NoCustomer,
}

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: prod-123"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for failed commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,

    /// Form input was rejected before any remote call
    ValidationError,

    /// Credentials wrong or session no longer valid
    AuthError,

    /// Someone else changed the entity first
    Conflict,

    CartError,

    /// Store refused a write
    StateError,

    /// The commerce platform could not be reached or failed
    CommerceError,

    ConfigError,

    /// No answer within `commerce.timeout_secs`
    Timeout,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// The action needs a signed-in customer.
    pub fn not_signed_in() -> Self {
        AppError::new(ErrorCode::AuthError, "Please sign in first")
    }

    pub fn cart(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::CartError, message)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errs: ValidationErrors) -> Self {
        AppError::validation(errs.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            CoreError::LineItemNotFound(id) => {
                AppError::cart(format!("Line item {} is not in the cart", id))
            }
            CoreError::CartTooLarge { max } => {
                AppError::cart(format!("Cart cannot have more than {} lines", max))
            }
            CoreError::QuantityTooLarge { requested, max } => AppError::validation(format!(
                "Quantity {} exceeds maximum allowed ({})",
                requested, max
            )),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

/// Converts commerce platform errors to app errors.
impl From<CommerceError> for AppError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            CommerceError::Duplicate { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' is already registered", field, value),
            ),
            CommerceError::InvalidCredentials => AppError::new(
                ErrorCode::AuthError,
                "Customer account with the given credentials not found",
            ),
            CommerceError::Unauthorized(reason) => {
                tracing::warn!(%reason, "Commerce call unauthorized");
                AppError::new(ErrorCode::AuthError, "Your session has expired, please sign in again")
            }
            CommerceError::WrongPassword => AppError::new(
                ErrorCode::ValidationError,
                "The current password is incorrect",
            ),
            CommerceError::VersionConflict { entity, .. } => AppError::new(
                ErrorCode::Conflict,
                format!("{} was changed elsewhere, please reload", entity),
            ),
            CommerceError::Rule(core) => AppError::from(core),
            CommerceError::Transport(e) => {
                tracing::error!("Commerce transport failed: {}", e);
                AppError::new(ErrorCode::CommerceError, "Something went wrong, please try again")
            }
            CommerceError::Internal(e) => {
                tracing::error!("Commerce platform error: {}", e);
                AppError::new(ErrorCode::CommerceError, "Something went wrong, please try again")
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::new(ErrorCode::StateError, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_errors_map_to_codes() {
        let err = AppError::from(CommerceError::InvalidCredentials);
        assert_eq!(err.code, ErrorCode::AuthError);

        let err = AppError::from(CommerceError::not_found("Cart", "c-1"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Cart not found: c-1");

        let err = AppError::from(CommerceError::Rule(CoreError::QuantityTooLarge {
            requested: 120,
            max: 99,
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_transport_errors_hide_details() {
        let err = AppError::from(CommerceError::Transport("connection reset".into()));
        assert_eq!(err.code, ErrorCode::CommerceError);
        assert!(!err.message.contains("reset"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::from(StoreError::EmptyToken);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "STATE_ERROR");
        assert_eq!(json["message"], "Access token must not be empty");
    }
}
