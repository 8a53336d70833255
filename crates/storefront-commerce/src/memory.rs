//! # In-Memory Commerce Backend
//!
//! A sandbox implementation of [`CommerceApi`] that keeps customers, tokens
//! and carts in memory.
//!
//! It enforces the same rules the real platform does:
//! - emails are unique (case-insensitive)
//! - passwords are stored as Argon2 hashes
//! - tokens expire after a TTL
//! - updates name the version they are based on; stale versions are rejected
//! - a customer's cart can only be touched with that customer's token
//!
//! ## Usage
//! ```rust,ignore
//! let api = InMemoryCommerce::seeded();
//! let products = api.products().await?;
//! ```

use std::collections::HashMap;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use storefront_core::validation::validate_quantity;
use storefront_core::{
    Address, AddressDraft, AddressKind, AuthToken, Cart, CartAction, Category, CoreError,
    Customer, CustomerDraft, Product, ProductType,
};

use crate::api::{CommerceApi, CustomerAction, SignIn};
use crate::error::{CommerceError, CommerceResult};
use crate::seed::{sample_catalog, Catalog};

/// Default lifetime of an issued access token.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

struct StoredCustomer {
    customer: Customer,
    password_hash: String,
}

struct Session {
    customer_id: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    catalog: Catalog,
    customers: HashMap<String, StoredCustomer>,
    /// lowercase email -> customer id
    emails: HashMap<String, String>,
    /// access token -> session
    sessions: HashMap<String, Session>,
    carts: HashMap<String, Cart>,
}

impl Inner {
    fn authenticate(&self, token: &AuthToken) -> CommerceResult<String> {
        let session = self
            .sessions
            .get(&token.access_token)
            .ok_or_else(|| CommerceError::Unauthorized("unknown access token".into()))?;

        if Utc::now() >= session.expires_at {
            return Err(CommerceError::Unauthorized("access token expired".into()));
        }

        Ok(session.customer_id.clone())
    }

    fn customer_mut(&mut self, id: &str) -> CommerceResult<&mut StoredCustomer> {
        self.customers
            .get_mut(id)
            .ok_or_else(|| CommerceError::not_found("Customer", id))
    }

    fn product(&self, id: &str) -> CommerceResult<&Product> {
        self.catalog
            .products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CommerceError::not_found("Product", id))
    }

    /// Most recently created cart owned by the customer.
    fn active_cart_id(&self, customer_id: &str) -> Option<String> {
        self.carts
            .values()
            .filter(|c| c.belongs_to(customer_id))
            .max_by_key(|c| c.created_at)
            .map(|c| c.id.clone())
    }

    fn issue_token(&mut self, customer_id: &str, ttl: Duration) -> AuthToken {
        let token = AuthToken {
            access_token: Uuid::new_v4().simple().to_string(),
            refresh_token: Some(Uuid::new_v4().simple().to_string()),
            expires_at: Utc::now() + ttl,
        };
        self.sessions.insert(
            token.access_token.clone(),
            Session {
                customer_id: customer_id.to_string(),
                expires_at: token.expires_at,
            },
        );
        token
    }

    /// Hands an anonymous cart to the customer at sign-in.
    fn merge_anonymous_cart(&mut self, customer_id: &str, anonymous_id: &str) {
        let Some(anonymous) = self.carts.get(anonymous_id) else {
            warn!(cart_id = %anonymous_id, "Anonymous cart not found, skipping merge");
            return;
        };
        if anonymous.customer_id.is_some() {
            warn!(cart_id = %anonymous_id, "Cart is not anonymous, skipping merge");
            return;
        }

        match self.active_cart_id(customer_id) {
            Some(active_id) => {
                let Some(anonymous) = self.carts.remove(anonymous_id) else {
                    return;
                };
                if let Some(active) = self.carts.get_mut(&active_id) {
                    active.merge_from(&anonymous);
                    active.version += 1;
                    debug!(cart_id = %active_id, lines = active.line_count(), "Merged anonymous cart");
                }
            }
            None => {
                if let Some(cart) = self.carts.get_mut(anonymous_id) {
                    cart.customer_id = Some(customer_id.to_string());
                    cart.version += 1;
                    debug!(cart_id = %anonymous_id, "Anonymous cart assigned to customer");
                }
            }
        }
    }
}

fn check_version(entity: &str, expected: i64, actual: i64) -> CommerceResult<()> {
    if expected != actual {
        return Err(CommerceError::VersionConflict {
            entity: entity.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn hash_password(password: &str) -> CommerceResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| CommerceError::Internal(format!("Failed to build salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CommerceError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn new_address(draft: &AddressDraft) -> Address {
    Address {
        id: Uuid::new_v4().to_string(),
        street_name: draft.street_name.trim().to_string(),
        city: draft.city.trim().to_string(),
        postal_code: draft.postal_code.trim().to_string(),
        country: draft.country.trim().to_uppercase(),
    }
}

fn tag_address(customer: &mut Customer, address_id: &str, kind: AddressKind) {
    let ids = match kind {
        AddressKind::Shipping => &mut customer.shipping_address_ids,
        AddressKind::Billing => &mut customer.billing_address_ids,
    };
    if !ids.iter().any(|id| id == address_id) {
        ids.push(address_id.to_string());
    }
}

/// Sandbox commerce backend.
pub struct InMemoryCommerce {
    inner: Mutex<Inner>,
    token_ttl: Duration,
}

impl InMemoryCommerce {
    /// Creates a backend serving the given catalog, with no customers.
    pub fn new(catalog: Catalog) -> Self {
        InMemoryCommerce {
            inner: Mutex::new(Inner {
                catalog,
                ..Default::default()
            }),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    /// Creates a backend serving the sample catalog.
    pub fn seeded() -> Self {
        Self::new(sample_catalog())
    }

    /// Creates a backend with an empty catalog.
    pub fn empty() -> Self {
        Self::new(Catalog::default())
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Number of stored carts. Used by tests to observe merges.
    pub async fn cart_count(&self) -> usize {
        self.inner.lock().await.carts.len()
    }

    /// Revokes every issued token.
    pub async fn revoke_tokens(&self) {
        self.inner.lock().await.sessions.clear();
    }
}

#[async_trait]
impl CommerceApi for InMemoryCommerce {
    async fn categories(&self) -> CommerceResult<Vec<Category>> {
        let inner = self.inner.lock().await;
        let mut categories = inner.catalog.categories.clone();
        categories.sort_by(|a, b| a.order_hint.cmp(&b.order_hint));
        Ok(categories)
    }

    async fn product_types(&self) -> CommerceResult<Vec<ProductType>> {
        Ok(self.inner.lock().await.catalog.product_types.clone())
    }

    async fn products(&self) -> CommerceResult<Vec<Product>> {
        Ok(self.inner.lock().await.catalog.products.clone())
    }

    async fn product(&self, id: &str) -> CommerceResult<Product> {
        self.inner.lock().await.product(id).cloned()
    }

    async fn sign_up(
        &self,
        draft: &CustomerDraft,
        date_of_birth: NaiveDate,
    ) -> CommerceResult<Customer> {
        let email = draft.email.trim().to_string();
        let key = email.to_lowercase();

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.emails.contains_key(&key) {
            return Err(CommerceError::duplicate("email", email));
        }

        let password_hash = hash_password(&draft.password)?;

        let shipping = new_address(&draft.shipping_address);
        let billing = draft.billing_address.as_ref().map(new_address);
        let billing_id = billing
            .as_ref()
            .map(|a| a.id.clone())
            .unwrap_or_else(|| shipping.id.clone());

        let mut addresses = vec![shipping.clone()];
        addresses.extend(billing);

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            version: 1,
            email,
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            date_of_birth: Some(date_of_birth),
            addresses,
            shipping_address_ids: vec![shipping.id.clone()],
            billing_address_ids: vec![billing_id.clone()],
            default_shipping_address_id: draft.default_shipping.then(|| shipping.id.clone()),
            default_billing_address_id: draft.default_billing.then_some(billing_id),
            created_at: Utc::now(),
        };

        inner.emails.insert(key, customer.id.clone());
        inner.customers.insert(
            customer.id.clone(),
            StoredCustomer {
                customer: customer.clone(),
                password_hash,
            },
        );

        info!(customer_id = %customer.id, "Customer signed up");
        Ok(customer)
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
        anonymous_cart_id: Option<&str>,
    ) -> CommerceResult<SignIn> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let customer_id = inner
            .emails
            .get(&email.trim().to_lowercase())
            .cloned()
            .ok_or(CommerceError::InvalidCredentials)?;

        let stored = inner.customer_mut(&customer_id)?;
        if !verify_password(password, &stored.password_hash) {
            return Err(CommerceError::InvalidCredentials);
        }
        let customer = stored.customer.clone();

        if let Some(anonymous_id) = anonymous_cart_id {
            inner.merge_anonymous_cart(&customer_id, anonymous_id);
        }

        let token = inner.issue_token(&customer_id, self.token_ttl);
        let cart = inner
            .active_cart_id(&customer_id)
            .and_then(|id| inner.carts.get(&id).cloned());

        info!(customer_id = %customer_id, has_cart = cart.is_some(), "Customer signed in");
        Ok(SignIn {
            customer,
            token,
            cart,
        })
    }

    async fn me(&self, token: &AuthToken) -> CommerceResult<Customer> {
        let mut guard = self.inner.lock().await;
        let customer_id = guard.authenticate(token)?;
        Ok(guard.customer_mut(&customer_id)?.customer.clone())
    }

    async fn update_customer(
        &self,
        token: &AuthToken,
        version: i64,
        actions: Vec<CustomerAction>,
    ) -> CommerceResult<Customer> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let customer_id = inner.authenticate(token)?;

        let current = inner.customer_mut(&customer_id)?.customer.clone();
        check_version("Customer", version, current.version)?;

        // Actions apply to a copy; nothing is stored unless all succeed.
        let mut updated = current.clone();
        for action in actions {
            match action {
                CustomerAction::AddAddress { address, kinds } => {
                    let address = new_address(&address);
                    for kind in kinds {
                        tag_address(&mut updated, &address.id, kind);
                    }
                    updated.addresses.push(address);
                }
                CustomerAction::RemoveAddress { address_id } => {
                    if updated.address(&address_id).is_none() {
                        return Err(CommerceError::not_found("Address", address_id));
                    }
                    updated.addresses.retain(|a| a.id != address_id);
                    updated.shipping_address_ids.retain(|id| id != &address_id);
                    updated.billing_address_ids.retain(|id| id != &address_id);
                    if updated.default_shipping_address_id.as_deref() == Some(&address_id) {
                        updated.default_shipping_address_id = None;
                    }
                    if updated.default_billing_address_id.as_deref() == Some(&address_id) {
                        updated.default_billing_address_id = None;
                    }
                }
                CustomerAction::SetDefaultAddress { address_id, kind } => {
                    if updated.address(&address_id).is_none() {
                        return Err(CommerceError::not_found("Address", address_id));
                    }
                    tag_address(&mut updated, &address_id, kind);
                    match kind {
                        AddressKind::Shipping => {
                            updated.default_shipping_address_id = Some(address_id)
                        }
                        AddressKind::Billing => updated.default_billing_address_id = Some(address_id),
                    }
                }
                CustomerAction::SetPersonalInfo {
                    email,
                    first_name,
                    last_name,
                    date_of_birth,
                } => {
                    let email = email.trim().to_string();
                    if let Some(owner) = inner.emails.get(&email.to_lowercase()) {
                        if owner != &customer_id {
                            return Err(CommerceError::duplicate("email", email));
                        }
                    }
                    updated.email = email;
                    updated.first_name = first_name.trim().to_string();
                    updated.last_name = last_name.trim().to_string();
                    updated.date_of_birth = Some(date_of_birth);
                }
            }
        }

        if updated.email.to_lowercase() != current.email.to_lowercase() {
            inner.emails.remove(&current.email.to_lowercase());
            inner
                .emails
                .insert(updated.email.to_lowercase(), customer_id.clone());
        }

        updated.version += 1;
        inner.customer_mut(&customer_id)?.customer = updated.clone();

        debug!(customer_id = %customer_id, version = updated.version, "Customer updated");
        Ok(updated)
    }

    async fn change_password(
        &self,
        token: &AuthToken,
        version: i64,
        current_password: &str,
        new_password: &str,
    ) -> CommerceResult<Customer> {
        let mut guard = self.inner.lock().await;
        let customer_id = guard.authenticate(token)?;
        let stored = guard.customer_mut(&customer_id)?;

        check_version("Customer", version, stored.customer.version)?;
        if !verify_password(current_password, &stored.password_hash) {
            return Err(CommerceError::WrongPassword);
        }

        stored.password_hash = hash_password(new_password)?;
        stored.customer.version += 1;

        info!(customer_id = %customer_id, "Password changed");
        Ok(stored.customer.clone())
    }

    async fn active_cart(&self, token: &AuthToken) -> CommerceResult<Option<Cart>> {
        let guard = self.inner.lock().await;
        let customer_id = guard.authenticate(token)?;
        Ok(guard
            .active_cart_id(&customer_id)
            .and_then(|id| guard.carts.get(&id).cloned()))
    }

    async fn create_cart(
        &self,
        token: Option<&AuthToken>,
        currency_code: &str,
    ) -> CommerceResult<Cart> {
        let mut guard = self.inner.lock().await;
        let customer_id = token.map(|t| guard.authenticate(t)).transpose()?;

        let cart = Cart::new(currency_code, customer_id);
        guard.carts.insert(cart.id.clone(), cart.clone());

        debug!(cart_id = %cart.id, anonymous = cart.customer_id.is_none(), "Cart created");
        Ok(cart)
    }

    async fn update_cart(
        &self,
        token: Option<&AuthToken>,
        cart_id: &str,
        version: i64,
        actions: Vec<CartAction>,
    ) -> CommerceResult<Cart> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let current = inner
            .carts
            .get(cart_id)
            .ok_or_else(|| CommerceError::not_found("Cart", cart_id))?;

        if let Some(owner) = &current.customer_id {
            let token = token
                .ok_or_else(|| CommerceError::Unauthorized("customer cart needs a token".into()))?;
            if &inner.authenticate(token)? != owner {
                return Err(CommerceError::Unauthorized(format!(
                    "cart {} belongs to another customer",
                    cart_id
                )));
            }
        }
        check_version("Cart", version, current.version)?;

        let mut updated = current.clone();
        for action in actions {
            match action {
                CartAction::AddLineItem {
                    product_id,
                    quantity,
                } => {
                    validate_quantity(quantity).map_err(CoreError::from)?;
                    let product = inner.product(&product_id)?;
                    updated.add_product(product, quantity)?;
                }
                CartAction::ChangeLineItemQuantity {
                    line_item_id,
                    quantity,
                } => {
                    if quantity != 0 {
                        validate_quantity(quantity).map_err(CoreError::from)?;
                    }
                    updated.change_quantity(&line_item_id, quantity)?;
                }
                CartAction::RemoveLineItem { line_item_id } => {
                    updated.remove_line(&line_item_id)?;
                }
            }
        }

        updated.version += 1;
        inner.carts.insert(updated.id.clone(), updated.clone());

        debug!(cart_id = %cart_id, version = updated.version, lines = updated.line_count(), "Cart updated");
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(email: &str) -> CustomerDraft {
        CustomerDraft {
            email: email.to_string(),
            password: "Secret123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: "1990-12-10".to_string(),
            shipping_address: AddressDraft {
                street_name: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                postal_code: "12345".to_string(),
                country: "US".to_string(),
            },
            billing_address: None,
            default_shipping: true,
            default_billing: false,
        }
    }

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 12, 10).unwrap()
    }

    async fn signed_in(api: &InMemoryCommerce) -> SignIn {
        api.sign_up(&draft("ada@example.com"), dob()).await.unwrap();
        api.sign_in("ada@example.com", "Secret123", None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_and_duplicate_email() {
        let api = InMemoryCommerce::seeded();
        let customer = api.sign_up(&draft("ada@example.com"), dob()).await.unwrap();

        assert_eq!(customer.version, 1);
        assert_eq!(customer.addresses.len(), 1);
        assert_eq!(customer.shipping_address_ids, customer.billing_address_ids);
        assert!(customer.default_address(AddressKind::Shipping).is_some());
        assert!(customer.default_address(AddressKind::Billing).is_none());

        let err = api
            .sign_up(&draft("ADA@example.com"), dob())
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_wrong_password() {
        let api = InMemoryCommerce::seeded();
        api.sign_up(&draft("ada@example.com"), dob()).await.unwrap();

        let err = api
            .sign_in("ada@example.com", "nope", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidCredentials));

        let err = api
            .sign_in("bob@example.com", "Secret123", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_token_identifies_customer() {
        let api = InMemoryCommerce::seeded();
        let session = signed_in(&api).await;

        let me = api.me(&session.token).await.unwrap();
        assert_eq!(me.id, session.customer.id);

        api.revoke_tokens().await;
        assert!(api.me(&session.token).await.unwrap_err().is_auth_error());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let api = InMemoryCommerce::seeded().with_token_ttl(Duration::seconds(-1));
        let session = signed_in(&api).await;

        assert!(api.me(&session.token).await.unwrap_err().is_auth_error());
    }

    #[tokio::test]
    async fn test_anonymous_cart_updates() {
        let api = InMemoryCommerce::seeded();
        let cart = api.create_cart(None, "USD").await.unwrap();

        let cart = api
            .update_cart(
                None,
                &cart.id,
                cart.version,
                vec![CartAction::AddLineItem {
                    product_id: "prod-mug".into(),
                    quantity: 2,
                }],
            )
            .await
            .unwrap();
        assert_eq!(cart.version, 2);
        assert_eq!(cart.total().cents(), 1800);

        let line_id = cart.line_items[0].id.clone();
        let cart = api
            .update_cart(
                None,
                &cart.id,
                cart.version,
                vec![CartAction::ChangeLineItemQuantity {
                    line_item_id: line_id,
                    quantity: 0,
                }],
            )
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_stale_cart_version_is_rejected() {
        let api = InMemoryCommerce::seeded();
        let cart = api.create_cart(None, "USD").await.unwrap();

        let err = api
            .update_cart(None, &cart.id, cart.version + 5, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::VersionConflict { .. }));
    }

    #[tokio::test]
    async fn test_failed_action_leaves_cart_untouched() {
        let api = InMemoryCommerce::seeded();
        let cart = api.create_cart(None, "USD").await.unwrap();

        let err = api
            .update_cart(
                None,
                &cart.id,
                cart.version,
                vec![
                    CartAction::AddLineItem {
                        product_id: "prod-mug".into(),
                        quantity: 1,
                    },
                    CartAction::AddLineItem {
                        product_id: "prod-missing".into(),
                        quantity: 1,
                    },
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::NotFound { .. }));

        let err = api
            .update_cart(
                None,
                &cart.id,
                cart.version,
                vec![CartAction::AddLineItem {
                    product_id: "prod-mug".into(),
                    quantity: -1,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::Rule(_)));

        // version unchanged, so the original version still applies
        let cart = api
            .update_cart(None, &cart.id, cart.version, vec![])
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_customer_cart_requires_owner_token() {
        let api = InMemoryCommerce::seeded();
        let session = signed_in(&api).await;
        let cart = api.create_cart(Some(&session.token), "USD").await.unwrap();
        assert!(cart.belongs_to(&session.customer.id));

        let err = api
            .update_cart(None, &cart.id, cart.version, vec![])
            .await
            .unwrap_err();
        assert!(err.is_auth_error());

        api.sign_up(&draft("bob@example.com"), dob()).await.unwrap();
        let bob = api
            .sign_in("bob@example.com", "Secret123", None)
            .await
            .unwrap();
        let err = api
            .update_cart(Some(&bob.token), &cart.id, cart.version, vec![])
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_sign_in_merges_anonymous_cart() {
        let api = InMemoryCommerce::seeded();
        let session = signed_in(&api).await;

        let own = api.create_cart(Some(&session.token), "USD").await.unwrap();
        api.update_cart(
            Some(&session.token),
            &own.id,
            own.version,
            vec![CartAction::AddLineItem {
                product_id: "prod-tee".into(),
                quantity: 1,
            }],
        )
        .await
        .unwrap();

        let anonymous = api.create_cart(None, "USD").await.unwrap();
        api.update_cart(
            None,
            &anonymous.id,
            anonymous.version,
            vec![
                CartAction::AddLineItem {
                    product_id: "prod-tee".into(),
                    quantity: 2,
                },
                CartAction::AddLineItem {
                    product_id: "prod-mug".into(),
                    quantity: 1,
                },
            ],
        )
        .await
        .unwrap();
        assert_eq!(api.cart_count().await, 2);

        let again = api
            .sign_in("ada@example.com", "Secret123", Some(&anonymous.id))
            .await
            .unwrap();
        let cart = again.cart.unwrap();

        assert_eq!(cart.id, own.id);
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.line_for_product("prod-tee").unwrap().quantity, 3);
        assert_eq!(api.cart_count().await, 1);
    }

    #[tokio::test]
    async fn test_sign_in_adopts_anonymous_cart() {
        let api = InMemoryCommerce::seeded();
        api.sign_up(&draft("ada@example.com"), dob()).await.unwrap();

        let anonymous = api.create_cart(None, "USD").await.unwrap();
        let session = api
            .sign_in("ada@example.com", "Secret123", Some(&anonymous.id))
            .await
            .unwrap();

        let cart = session.cart.unwrap();
        assert_eq!(cart.id, anonymous.id);
        assert!(cart.belongs_to(&session.customer.id));
    }

    #[tokio::test]
    async fn test_customer_address_actions() {
        let api = InMemoryCommerce::seeded();
        let session = signed_in(&api).await;

        let customer = api
            .update_customer(
                &session.token,
                session.customer.version,
                vec![CustomerAction::AddAddress {
                    address: AddressDraft {
                        street_name: "2 High St".into(),
                        city: "London".into(),
                        postal_code: "SW1A 1AA".into(),
                        country: "gb".into(),
                    },
                    kinds: vec![AddressKind::Billing],
                }],
            )
            .await
            .unwrap();
        assert_eq!(customer.version, 2);
        assert_eq!(customer.addresses.len(), 2);
        let new_id = customer.addresses[1].id.clone();
        assert_eq!(customer.addresses[1].country, "GB");

        let customer = api
            .update_customer(
                &session.token,
                customer.version,
                vec![CustomerAction::SetDefaultAddress {
                    address_id: new_id.clone(),
                    kind: AddressKind::Billing,
                }],
            )
            .await
            .unwrap();
        assert_eq!(customer.default_billing_address_id.as_deref(), Some(new_id.as_str()));

        let customer = api
            .update_customer(
                &session.token,
                customer.version,
                vec![CustomerAction::RemoveAddress {
                    address_id: new_id.clone(),
                }],
            )
            .await
            .unwrap();
        assert!(customer.default_billing_address_id.is_none());
        assert!(!customer.billing_address_ids.contains(&new_id));

        let err = api
            .update_customer(&session.token, 1, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::VersionConflict { .. }));
    }

    #[tokio::test]
    async fn test_personal_info_email_change() {
        let api = InMemoryCommerce::seeded();
        let session = signed_in(&api).await;
        api.sign_up(&draft("bob@example.com"), dob()).await.unwrap();

        let taken = api
            .update_customer(
                &session.token,
                1,
                vec![CustomerAction::SetPersonalInfo {
                    email: "bob@example.com".into(),
                    first_name: "Ada".into(),
                    last_name: "Byron".into(),
                    date_of_birth: dob(),
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(taken, CommerceError::Duplicate { .. }));

        let customer = api
            .update_customer(
                &session.token,
                1,
                vec![CustomerAction::SetPersonalInfo {
                    email: "ada.byron@example.com".into(),
                    first_name: "Ada".into(),
                    last_name: "Byron".into(),
                    date_of_birth: dob(),
                }],
            )
            .await
            .unwrap();
        assert_eq!(customer.last_name, "Byron");

        assert!(api
            .sign_in("ada.byron@example.com", "Secret123", None)
            .await
            .is_ok());
        assert!(api
            .sign_in("ada@example.com", "Secret123", None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_change_password() {
        let api = InMemoryCommerce::seeded();
        let session = signed_in(&api).await;

        let err = api
            .change_password(&session.token, 1, "wrong", "NewSecret1")
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::WrongPassword));

        let customer = api
            .change_password(&session.token, 1, "Secret123", "NewSecret1")
            .await
            .unwrap();
        assert_eq!(customer.version, 2);

        assert!(api
            .sign_in("ada@example.com", "NewSecret1", None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_catalog_queries() {
        let api = InMemoryCommerce::seeded();
        let categories = api.categories().await.unwrap();
        assert_eq!(categories[0].id, "cat-home");
        assert!(!api.products().await.unwrap().is_empty());
        assert_eq!(api.product("prod-mug").await.unwrap().sku, "MUG-01");
        assert!(matches!(
            api.product("nope").await,
            Err(CommerceError::NotFound { .. })
        ));
    }
}
