//! # Account Commands
//!
//! Registration, sign in/out and profile changes.
//!
//! ## Sign-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(email, password)                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  validate_login ──► sign_in(email, password, anonymous cart id)         │
//! │                            │                                            │
//! │                            ▼                                            │
//! │              platform merges the anonymous cart lines                   │
//! │              into the customer's active cart                            │
//! │                            │                                            │
//! │               no cart? ──► create_cart(token)                           │
//! │                            │                                            │
//! │                            ▼                                            │
//! │  store.batch: token, customer, customerCart, user, cart = None          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use storefront_commerce::{CommerceApi, CustomerAction};
use storefront_core::validation::{
    validate_address, validate_customer_draft, validate_login, validate_password_change,
    validate_personal_info,
};
use storefront_core::{
    AddressDraft, AddressKind, AuthToken, Cart, Customer, CustomerDraft, PersonalInfo, UserState,
};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, ErrorCode, StoreError};
use crate::state::{Store, StorefrontConfig};

use super::today;

fn already_signed_in() -> AppError {
    AppError::new(ErrorCode::StateError, "You are already signed in")
}

/// Token and customer of the signed-in session.
///
/// An expired token signs the session out.
pub(crate) fn session(store: &Store) -> Result<(AuthToken, Customer), AppError> {
    let (token, customer) = store.with_session(|s| (s.token.clone(), s.customer.clone()));

    let (token, customer) = match (token, customer) {
        (Some(token), Some(customer)) => (token, customer),
        _ => {
            error!("Account command without a signed-in session");
            return Err(AppError::not_signed_in());
        }
    };

    if token.is_expired(Utc::now()) {
        warn!(customer_id = %customer.id, "Access token expired, signing out");
        store.sign_out();
        return Err(AppError::new(
            ErrorCode::AuthError,
            "Your session has expired, please sign in again",
        ));
    }
    Ok((token, customer))
}

/// Creates an account and signs the new customer in.
pub async fn register(
    api: &dyn CommerceApi,
    store: &Store,
    config: &StorefrontConfig,
    draft: CustomerDraft,
) -> Result<Customer, AppError> {
    debug!(email = %draft.email, "register command");
    if store.user().logged_in {
        return Err(already_signed_in());
    }

    let date_of_birth = validate_customer_draft(&draft, today(), config.account_rules())?;
    let customer = api.sign_up(&draft, date_of_birth).await?;
    info!(customer_id = %customer.id, "Customer registered");

    login(api, store, config, &draft.email, &draft.password).await
}

/// Signs a customer in and takes over the anonymous cart.
pub async fn login(
    api: &dyn CommerceApi,
    store: &Store,
    config: &StorefrontConfig,
    email: &str,
    password: &str,
) -> Result<Customer, AppError> {
    debug!(%email, "login command");
    if store.user().logged_in {
        return Err(already_signed_in());
    }
    validate_login(email, password)?;

    let anonymous_cart_id = store.cart().map(|cart| cart.id);
    let signed_in = api
        .sign_in(email, password, anonymous_cart_id.as_deref())
        .await?;

    let cart = match signed_in.cart {
        Some(cart) => cart,
        None => {
            api.create_cart(Some(&signed_in.token), config.currency_code())
                .await?
        }
    };

    let customer = signed_in.customer;
    start_session(store, signed_in.token, &customer, cart)?;

    info!(customer_id = %customer.id, "Customer signed in");
    Ok(customer)
}

/// Stores a fresh session in one batch. Nothing is written when the token or
/// cart would be refused.
fn start_session(
    store: &Store,
    token: AuthToken,
    customer: &Customer,
    cart: Cart,
) -> Result<(), StoreError> {
    if token.access_token.trim().is_empty() {
        return Err(StoreError::EmptyToken);
    }
    if !cart.belongs_to(&customer.id) {
        return Err(StoreError::ForeignCart { cart_id: cart.id });
    }

    store.batch(|store| {
        store.set_token(Some(token))?;
        store.set_customer(Some(customer.clone()));
        store.set_customer_cart(Some(cart))?;
        store.set_user(UserState::signed_in(customer));
        store.set_cart(None);
        Ok(())
    })
}

/// Clears the session. Signing out while signed out is a no-op.
pub fn logout(store: &Store) {
    debug!("logout command");
    if !store.user().logged_in {
        return;
    }
    store.sign_out();
    info!("Customer signed out");
}

async fn update_customer(
    api: &dyn CommerceApi,
    store: &Store,
    action: CustomerAction,
) -> Result<Customer, AppError> {
    let (token, customer) = session(store)?;
    let updated = api
        .update_customer(&token, customer.version, vec![action])
        .await?;
    store.set_customer(Some(updated.clone()));
    Ok(updated)
}

pub async fn add_address(
    api: &dyn CommerceApi,
    store: &Store,
    address: AddressDraft,
    kinds: Vec<AddressKind>,
) -> Result<Customer, AppError> {
    debug!(country = %address.country, "add_address command");
    validate_address("address", &address)?;
    update_customer(api, store, CustomerAction::AddAddress { address, kinds }).await
}

pub async fn remove_address(
    api: &dyn CommerceApi,
    store: &Store,
    address_id: &str,
) -> Result<Customer, AppError> {
    debug!(%address_id, "remove_address command");
    update_customer(
        api,
        store,
        CustomerAction::RemoveAddress {
            address_id: address_id.to_string(),
        },
    )
    .await
}

pub async fn set_default_address(
    api: &dyn CommerceApi,
    store: &Store,
    address_id: &str,
    kind: AddressKind,
) -> Result<Customer, AppError> {
    debug!(%address_id, %kind, "set_default_address command");
    update_customer(
        api,
        store,
        CustomerAction::SetDefaultAddress {
            address_id: address_id.to_string(),
            kind,
        },
    )
    .await
}

pub async fn change_password(
    api: &dyn CommerceApi,
    store: &Store,
    config: &StorefrontConfig,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<Customer, AppError> {
    debug!("change_password command");
    validate_password_change(current, new, confirm, config.account_rules())?;

    let (token, customer) = session(store)?;
    let updated = api
        .change_password(&token, customer.version, current, new)
        .await?;
    store.set_customer(Some(updated.clone()));
    Ok(updated)
}

/// Updates name, email and date of birth. The header follows via the user key.
pub async fn update_personal_info(
    api: &dyn CommerceApi,
    store: &Store,
    config: &StorefrontConfig,
    info: PersonalInfo,
) -> Result<Customer, AppError> {
    debug!("update_personal_info command");
    let date_of_birth = validate_personal_info(&info, today(), config.account_rules())?;

    let (token, customer) = session(store)?;
    let updated = api
        .update_customer(
            &token,
            customer.version,
            vec![CustomerAction::SetPersonalInfo {
                email: info.email,
                first_name: info.first_name,
                last_name: info.last_name,
                date_of_birth,
            }],
        )
        .await?;

    store.batch(|store| {
        store.set_customer(Some(updated.clone()));
        store.set_user(UserState::signed_in(&updated));
    });
    Ok(updated)
}
