//! # Commands
//!
//! Feature flows behind the pages. Every command validates its input with the
//! core validators, calls the commerce platform and writes the result to the
//! Store, which notifies whoever is listening.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Categories, products, product types
//! ├── account.rs  ◄─── Register, login, logout, profile edits
//! └── cart.rs     ◄─── Anonymous and customer cart changes
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App::dispatch(Action::AddToCart { product_id, quantity })              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  cart::add_to_cart(api, store, config, product_id, quantity)            │
//! │         │   validate ──► CommerceApi::update_cart ──► store.set_cart    │
//! │         ▼                                                               │
//! │  Result<Cart, AppError>                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store publishes Topic::Cart ──► Header badge, current page refresh     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never publish notices themselves; `App::dispatch` does.

pub mod account;
pub mod cart;
pub mod catalog;

use chrono::{NaiveDate, Utc};

/// Calendar date used for age checks.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
