//! # storefront-core: Pure Domain Logic for the Storefront
//!
//! This crate holds the storefront's domain model and rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/storefront (Store + Router)                │   │
//! │  │    Header ──► Catalog ──► Cart ──► Login/Registration/Profile   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │   Cart    │  │  email    │  │   │
//! │  │   │ Product   │  │           │  │ LineItem  │  │  password │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO COMMERCE CALLS                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-commerce (Commerce Platform)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Address, Product, Category, AuthToken)
//! - [`cart`] - Cart and line items, with the cart rules
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Form field validators
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let line_total = price.multiply_quantity(3);
//!
//! assert_eq!(line_total.cents(), 3297);
//! assert_eq!(line_total.to_string(), "32.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction, LineItem};
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 99;

/// Minimum age, in years, for self-registration.
pub const MIN_CUSTOMER_AGE: u32 = 13;

/// Minimum password length accepted by the registration and password forms.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Countries the storefront ships to (ISO 3166-1 alpha-2).
pub const SUPPORTED_COUNTRIES: &[&str] = &["US", "CA", "GB", "DE"];
