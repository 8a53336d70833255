//! # Cart Commands
//!
//! Changes to whichever cart is active: the customer cart when signed in, the
//! anonymous cart otherwise.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐  add_to_cart   ┌──────────┐  login   ┌───────────────┐   │
//! │  │ No cart  │───────────────►│ Anonymous│─────────►│ Customer cart │   │
//! │  └──────────┘ (create_cart)  │   cart   │ (merged) │               │   │
//! │                              └──────────┘          └───────────────┘   │
//! │                                   │                       │            │
//! │                          change_quantity / remove_line / clear_cart    │
//! │                                   ▼                       ▼            │
//! │                           Topic::Cart            Topic::CustomerCart    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_commerce::CommerceApi;
use storefront_core::validation::{validate_cart_size, validate_quantity};
use storefront_core::{Cart, CartAction, CoreError};
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::{Store, StorefrontConfig};

use super::account::session;

/// Returns the active cart, creating one on the platform if there is none.
pub async fn ensure_cart(
    api: &dyn CommerceApi,
    store: &Store,
    config: &StorefrontConfig,
) -> Result<Cart, AppError> {
    if let Some(cart) = store.active_cart() {
        return Ok(cart);
    }

    let cart = if store.is_signed_in() {
        let (token, _) = session(store)?;
        api.create_cart(Some(&token), config.currency_code()).await?
    } else {
        api.create_cart(None, config.currency_code()).await?
    };
    info!(cart_id = %cart.id, customer = cart.customer_id.is_some(), "Cart created");

    store.set_active_cart(cart.clone())?;
    Ok(cart)
}

fn current_cart(store: &Store) -> Result<Cart, AppError> {
    store
        .active_cart()
        .ok_or_else(|| AppError::cart("There is no cart yet"))
}

/// Sends `actions` for `cart` and stores the updated cart.
async fn apply(
    api: &dyn CommerceApi,
    store: &Store,
    cart: &Cart,
    actions: Vec<CartAction>,
) -> Result<Cart, AppError> {
    let updated = if cart.customer_id.is_some() {
        let (token, _) = session(store)?;
        api.update_cart(Some(&token), &cart.id, cart.version, actions)
            .await?
    } else {
        api.update_cart(None, &cart.id, cart.version, actions).await?
    };

    store.set_active_cart(updated.clone())?;
    Ok(updated)
}

pub async fn add_to_cart(
    api: &dyn CommerceApi,
    store: &Store,
    config: &StorefrontConfig,
    product_id: &str,
    quantity: i64,
) -> Result<Cart, AppError> {
    debug!(%product_id, quantity, "add_to_cart command");
    validate_quantity(quantity)?;

    let cart = ensure_cart(api, store, config).await?;
    if cart.line_for_product(product_id).is_none() {
        validate_cart_size(cart.line_count())?;
    }

    apply(
        api,
        store,
        &cart,
        vec![CartAction::AddLineItem {
            product_id: product_id.to_string(),
            quantity,
        }],
    )
    .await
}

/// Sets a line's quantity. Zero removes the line.
pub async fn change_quantity(
    api: &dyn CommerceApi,
    store: &Store,
    line_item_id: &str,
    quantity: i64,
) -> Result<Cart, AppError> {
    debug!(%line_item_id, quantity, "change_quantity command");
    if quantity == 0 {
        return remove_line(api, store, line_item_id).await;
    }
    validate_quantity(quantity)?;

    let cart = current_cart(store)?;
    if cart.line(line_item_id).is_none() {
        return Err(CoreError::LineItemNotFound(line_item_id.to_string()).into());
    }

    apply(
        api,
        store,
        &cart,
        vec![CartAction::ChangeLineItemQuantity {
            line_item_id: line_item_id.to_string(),
            quantity,
        }],
    )
    .await
}

pub async fn remove_line(
    api: &dyn CommerceApi,
    store: &Store,
    line_item_id: &str,
) -> Result<Cart, AppError> {
    debug!(%line_item_id, "remove_line command");

    let cart = current_cart(store)?;
    if cart.line(line_item_id).is_none() {
        return Err(CoreError::LineItemNotFound(line_item_id.to_string()).into());
    }

    apply(
        api,
        store,
        &cart,
        vec![CartAction::RemoveLineItem {
            line_item_id: line_item_id.to_string(),
        }],
    )
    .await
}

/// Removes every line. A missing or empty cart is left alone.
pub async fn clear_cart(api: &dyn CommerceApi, store: &Store) -> Result<Option<Cart>, AppError> {
    debug!("clear_cart command");

    let cart = match store.active_cart() {
        Some(cart) if !cart.is_empty() => cart,
        other => return Ok(other),
    };

    let actions = cart
        .line_items
        .iter()
        .map(|line| CartAction::RemoveLineItem {
            line_item_id: line.id.clone(),
        })
        .collect();
    apply(api, store, &cart, actions).await.map(Some)
}
