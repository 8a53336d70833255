//! # Commerce API
//!
//! The asynchronous boundary to the commerce platform.
//!
//! ## Call Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Commerce Call Flow                                   │
//! │                                                                         │
//! │  Command (apps/storefront)                                             │
//! │       │                                                                 │
//! │       │  api.update_cart(token, cart_id, version, actions).await       │
//! │       ▼                                                                 │
//! │  dyn CommerceApi                                                       │
//! │  ├── InMemoryCommerce   (sandbox, seeded catalog)                      │
//! │  └── any remote client implementing the trait                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(domain object)  or  Err(CommerceError)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Calls have no cancellation and are never retried by the storefront.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use storefront_core::{
    AddressDraft, AddressKind, AuthToken, Cart, CartAction, Category, Customer, CustomerDraft,
    Product, ProductType,
};

use crate::error::CommerceResult;

/// Update action for the signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CustomerAction {
    /// Adds an address and tags it with the given kinds.
    #[serde(rename_all = "camelCase")]
    AddAddress {
        address: AddressDraft,
        kinds: Vec<AddressKind>,
    },

    #[serde(rename_all = "camelCase")]
    RemoveAddress { address_id: String },

    #[serde(rename_all = "camelCase")]
    SetDefaultAddress {
        address_id: String,
        kind: AddressKind,
    },

    #[serde(rename_all = "camelCase")]
    SetPersonalInfo {
        email: String,
        first_name: String,
        last_name: String,
        date_of_birth: NaiveDate,
    },
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub customer: Customer,
    pub token: AuthToken,
    /// The customer's active cart after merging the anonymous cart, if any.
    pub cart: Option<Cart>,
}

/// Operations the storefront needs from the commerce platform.
///
/// ## Usage
/// ```rust,ignore
/// let products = api.products().await?;
/// let sign_in = api.sign_in("ada@example.com", "Secret123", None).await?;
/// let cart = api.create_cart(Some(&sign_in.token), "USD").await?;
/// ```
#[async_trait]
pub trait CommerceApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    async fn categories(&self) -> CommerceResult<Vec<Category>>;

    async fn product_types(&self) -> CommerceResult<Vec<ProductType>>;

    async fn products(&self) -> CommerceResult<Vec<Product>>;

    async fn product(&self, id: &str) -> CommerceResult<Product>;

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    /// Creates a customer account. The date of birth is already validated.
    async fn sign_up(&self, draft: &CustomerDraft, date_of_birth: NaiveDate)
        -> CommerceResult<Customer>;

    /// Authenticates a customer and issues a token.
    ///
    /// When `anonymous_cart_id` names an anonymous cart, its lines are merged
    /// into the customer's active cart (or the cart is handed to the customer
    /// when they have none).
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
        anonymous_cart_id: Option<&str>,
    ) -> CommerceResult<SignIn>;

    /// The customer the token belongs to.
    async fn me(&self, token: &AuthToken) -> CommerceResult<Customer>;

    async fn update_customer(
        &self,
        token: &AuthToken,
        version: i64,
        actions: Vec<CustomerAction>,
    ) -> CommerceResult<Customer>;

    async fn change_password(
        &self,
        token: &AuthToken,
        version: i64,
        current_password: &str,
        new_password: &str,
    ) -> CommerceResult<Customer>;

    // -------------------------------------------------------------------------
    // Carts
    // -------------------------------------------------------------------------

    /// The most recent cart of the token's customer.
    async fn active_cart(&self, token: &AuthToken) -> CommerceResult<Option<Cart>>;

    /// Creates a cart: owned by the token's customer, or anonymous without one.
    async fn create_cart(&self, token: Option<&AuthToken>, currency_code: &str)
        -> CommerceResult<Cart>;

    async fn update_cart(
        &self,
        token: Option<&AuthToken>,
        cart_id: &str,
        version: i64,
        actions: Vec<CartAction>,
    ) -> CommerceResult<Cart>;
}
