//! # State Module
//!
//! Application state for the storefront.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │   Store                      │  │   StorefrontConfig           │    │
//! │  │                              │  │                              │    │
//! │  │  user, token, customer,      │  │  [shop] name, currency       │    │
//! │  │  customerCart, cart,         │  │  [commerce] project, url     │    │
//! │  │  categories, products, types │  │  [accounts] age, password    │    │
//! │  │                              │  │                              │    │
//! │  │  typed topics, queued events │  │  read-only after load        │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Store: cloneable handle, Mutex-guarded session and listener list    │
//! │  • StorefrontConfig: shared behind Arc, never mutated                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod store;

pub use config::{
    AccountSettings, CommerceSettings, ConfigError, ConfigResult, ShopSettings, StorefrontConfig,
    CONFIG_FILE_NAME,
};
pub use store::{Notice, NoticeLevel, Session, Store, StoreEvent, SubscriptionId, Topic};
