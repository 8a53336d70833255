//! # Cart
//!
//! The shopping cart and its rules.
//!
//! The commerce platform owns the authoritative cart; the storefront holds the
//! latest copy it received. The rules live here so the sandbox backend and the
//! app agree on them.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Update Actions                                  │
//! │                                                                         │
//! │  UI Action                CartAction                  Cart Change       │
//! │  ─────────                ──────────                  ───────────       │
//! │                                                                         │
//! │  "Add to cart" ─────────► AddLineItem ─────────────► line pushed or    │
//! │                                                       quantity += n     │
//! │                                                                         │
//! │  Quantity stepper ──────► ChangeLineItemQuantity ──► quantity = n      │
//! │                                                       (0 removes line)  │
//! │                                                                         │
//! │  Remove button ─────────► RemoveLineItem ──────────► line removed      │
//! │                                                                         │
//! │  Every applied action bumps `version` (done by the backend).           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// An update action sent to the commerce platform for one cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CartAction {
    #[serde(rename_all = "camelCase")]
    AddLineItem { product_id: String, quantity: i64 },

    #[serde(rename_all = "camelCase")]
    ChangeLineItemQuantity { line_item_id: String, quantity: i64 },

    #[serde(rename_all = "camelCase")]
    RemoveLineItem { line_item_id: String },
}

/// A line in the cart.
///
/// Name, SKU and price are snapshots taken when the product was added, so the
/// cart renders consistently even if the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line from a product, freezing its effective price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_cents: product.effective_price().cents(),
            quantity,
            added_at: Utc::now(),
        }
    }

    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increases quantity)
/// - Quantity is always > 0 (setting 0 removes the line)
/// - At most `MAX_CART_LINES` lines, each at most `MAX_LINE_QUANTITY`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub version: i64,
    /// Owning customer; `None` for an anonymous cart.
    pub customer_id: Option<String>,
    pub currency_code: String,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart at version 1.
    pub fn new(currency_code: impl Into<String>, customer_id: Option<String>) -> Self {
        Cart {
            id: Uuid::new_v4().to_string(),
            version: 1,
            customer_id,
            currency_code: currency_code.into(),
            line_items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product or increases the quantity of its existing line.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if let Some(line) = self
            .line_items
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.line_items.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.line_items.push(LineItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn change_quantity(&mut self, line_item_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(line_item_id);
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let line = self
            .line_items
            .iter_mut()
            .find(|l| l.id == line_item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(line_item_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by id.
    pub fn remove_line(&mut self, line_item_id: &str) -> CoreResult<()> {
        let initial_len = self.line_items.len();
        self.line_items.retain(|l| l.id != line_item_id);

        if self.line_items.len() == initial_len {
            Err(CoreError::LineItemNotFound(line_item_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Folds the lines of `other` into this cart.
    ///
    /// Used when an anonymous cart is merged into the customer's cart at
    /// sign-in. Quantities are summed and capped at `MAX_LINE_QUANTITY`; lines
    /// beyond `MAX_CART_LINES` are dropped.
    pub fn merge_from(&mut self, other: &Cart) {
        for incoming in &other.line_items {
            if let Some(line) = self
                .line_items
                .iter_mut()
                .find(|l| l.product_id == incoming.product_id)
            {
                line.quantity = (line.quantity + incoming.quantity).min(MAX_LINE_QUANTITY);
            } else if self.line_items.len() < MAX_CART_LINES {
                let mut line = incoming.clone();
                line.id = Uuid::new_v4().to_string();
                self.line_items.push(line);
            }
        }
    }

    pub fn clear(&mut self) {
        self.line_items.clear();
    }

    pub fn line(&self, line_item_id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|l| l.id == line_item_id)
    }

    pub fn line_for_product(&self, product_id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|l| l.product_id == product_id)
    }

    pub fn belongs_to(&self, customer_id: &str) -> bool {
        self.customer_id.as_deref() == Some(customer_id)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.line_items.len()
    }

    /// Sum of all line quantities (the header badge number).
    pub fn total_quantity(&self) -> i64 {
        self.line_items.iter().map(|l| l.quantity).sum()
    }

    pub fn total(&self) -> Money {
        self.line_items.iter().map(|l| l.line_total()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}
