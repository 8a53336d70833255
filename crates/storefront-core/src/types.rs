//! # Domain Types
//!
//! Core domain types shared by the commerce boundary and the app.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │    Product      │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, version    │   │  id, sku        │   │  id, slug       │       │
//! │  │  email          │   │  name           │   │  parent_id      │       │
//! │  │  addresses[]    │   │  price_cents    │   │  order_hint     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Address      │   │  ProductType    │   │   AuthToken     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  street, city   │   │  id, name       │   │  access_token   │       │
//! │  │  postal, country│   │  attributes[]   │   │  expires_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Versioned Entities
//! Customers and carts carry a `version`. Every update sent to the commerce
//! platform names the version it was based on; a stale version is rejected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Session User
// =============================================================================

/// Identity shown in the UI chrome (header links, greetings).
///
/// This is the Store's `user` key. It starts signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub logged_in: bool,
    pub email: Option<String>,
    pub first_name: Option<String>,
}

impl UserState {
    pub fn signed_out() -> Self {
        UserState::default()
    }

    pub fn signed_in(customer: &Customer) -> Self {
        UserState {
            logged_in: true,
            email: Some(customer.email.clone()),
            first_name: Some(customer.first_name.clone()),
        }
    }
}

// =============================================================================
// Auth Token
// =============================================================================

/// Access token issued by the commerce platform for a signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// The token is unusable at or after `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// =============================================================================
// Address
// =============================================================================

/// Which role an address plays for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Shipping,
    Billing,
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressKind::Shipping => write!(f, "shipping"),
            AddressKind::Billing => write!(f, "billing"),
        }
    }
}

/// A stored customer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub street_name: String,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
}

impl Address {
    /// Single-line rendering for address book views.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.street_name, self.postal_code, self.city, self.country
        )
    }
}

/// Address as entered in a form, before the platform assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub street_name: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered storefront customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub version: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub addresses: Vec<Address>,
    pub shipping_address_ids: Vec<String>,
    pub billing_address_ids: Vec<String>,
    pub default_shipping_address_id: Option<String>,
    pub default_billing_address_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn address(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Returns the default address of the given kind, if one is set.
    pub fn default_address(&self, kind: AddressKind) -> Option<&Address> {
        let id = match kind {
            AddressKind::Shipping => self.default_shipping_address_id.as_deref(),
            AddressKind::Billing => self.default_billing_address_id.as_deref(),
        };
        id.and_then(|id| self.address(id))
    }

    /// Addresses tagged with the given kind.
    pub fn addresses_of(&self, kind: AddressKind) -> Vec<&Address> {
        let ids = match kind {
            AddressKind::Shipping => &self.shipping_address_ids,
            AddressKind::Billing => &self.billing_address_ids,
        };
        self.addresses
            .iter()
            .filter(|a| ids.iter().any(|id| id == &a.id))
            .collect()
    }
}

/// Registration form payload.
///
/// `default_shipping` / `default_billing` index into `addresses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD` as typed into the form.
    pub date_of_birth: String,
    pub shipping_address: AddressDraft,
    /// When absent, the shipping address is used for billing too.
    pub billing_address: Option<AddressDraft>,
    pub default_shipping: bool,
    pub default_billing: bool,
}

/// Personal info edit form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product category. Categories form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<String>,
    /// Sort key among siblings.
    pub order_hint: String,
}

/// A product type groups products with the same attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: String,
    pub name: String,
    pub attributes: Vec<String>,
}

/// A purchasable product (its master variant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub product_type_id: String,
    pub category_ids: Vec<String>,
    /// Regular price in cents.
    pub price_cents: i64,
    /// Sale price in cents, when a discount applies.
    pub discounted_price_cents: Option<i64>,
    pub image_url: Option<String>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Price the customer pays: the discounted price when present.
    pub fn effective_price(&self) -> Money {
        Money::from_cents(self.discounted_price_cents.unwrap_or(self.price_cents))
    }

    pub fn is_discounted(&self) -> bool {
        matches!(self.discounted_price_cents, Some(d) if d < self.price_cents)
    }

    pub fn in_category(&self, category_id: &str) -> bool {
        self.category_ids.iter().any(|c| c == category_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
