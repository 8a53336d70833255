//! # storefront-commerce: Commerce Platform Boundary
//!
//! Everything the storefront asks of the commerce platform goes through
//! [`CommerceApi`]. The platform is authoritative for customers, carts and the
//! catalog; the storefront only holds the latest copies it received.
//!
//! ## Modules
//! - [`api`]: the `CommerceApi` trait, customer update actions, sign-in result
//! - [`memory`]: `InMemoryCommerce`, a sandbox backend enforcing platform rules
//! - [`seed`]: the sample catalog served by the sandbox
//! - [`error`]: `CommerceError`
//!
//! ## Usage
//! ```rust,ignore
//! use storefront_commerce::{CommerceApi, InMemoryCommerce};
//!
//! let api = InMemoryCommerce::seeded();
//! let categories = api.categories().await?;
//! ```

pub mod api;
pub mod error;
pub mod memory;
pub mod seed;

pub use api::{CommerceApi, CustomerAction, SignIn};
pub use error::{CommerceError, CommerceResult};
pub use memory::InMemoryCommerce;
pub use seed::{sample_catalog, Catalog};
