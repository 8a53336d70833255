//! # Storefront
//!
//! Client-side storefront: a reactive Store, a path router with a single
//! mount point, page constructors that build view trees, and the commands
//! that talk to the commerce platform.
//!
//! ## Module Organization
//! ```text
//! storefront/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── app.rs          ◄─── App: wiring, dispatch, page refresh
//! ├── state/
//! │   ├── store.rs    ◄─── Store: typed topics, queued delivery, batches
//! │   └── config.rs   ◄─── storefront.toml + STOREFRONT_* overrides
//! ├── router/
//! │   ├── mod.rs      ◄─── Router: go, click, back, forward, refresh
//! │   ├── table.rs    ◄─── Route table, path normalization
//! │   ├── mount.rs    ◄─── Element registry, mount point
//! │   └── history.rs  ◄─── History entries and cursor
//! ├── pages/          ◄─── One module per page
//! ├── components/     ◄─── Header
//! ├── commands/       ◄─── Account, cart and catalog flows
//! ├── shell.rs        ◄─── Line commands for the CLI
//! ├── view.rs         ◄─── View tree and text renderer
//! └── error.rs        ◄─── AppError, StoreError
//! ```
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shell line ──► App::dispatch(Action) ──► commands::* ──► CommerceApi   │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                     Store::set_* (publish)              │
//! │                                               │                         │
//! │                          ┌────────────────────┴──────────────┐          │
//! │                          ▼                                   ▼          │
//! │                   Header re-render                  Router::refresh     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod commands;
pub mod components;
pub mod error;
pub mod pages;
pub mod router;
pub mod shell;
pub mod state;
pub mod view;

use tracing_subscriber::EnvFilter;

pub use app::{Action, App};
pub use error::{AppError, ErrorCode, StoreError};
pub use router::{Anchor, ClickOutcome, Navigation, Router};
pub use state::{Notice, NoticeLevel, Store, StoreEvent, StorefrontConfig, Topic};
pub use view::View;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show Store deliveries and page refreshes
/// - Default: INFO, DEBUG for this crate
///
/// Logs go to stderr so the rendered pages on stdout stay readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
