//! # App
//!
//! Wires the Store, the router, the header and the commerce API together.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App                                                                    │
//! │   ├── store: Store ─────────────── shared with every page and listener  │
//! │   ├── router: Arc<Mutex<Router>> ─ owns the mount point and history     │
//! │   ├── header: Header ───────────── subscribed to user / cart topics     │
//! │   └── api: Arc<dyn CommerceApi>                                         │
//! │                                                                         │
//! │  Store event ──► page-refresh listener ──► router.refresh()             │
//! │  (user, customer, carts, catalog)           (weak handle, try_lock)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `dispatch` is where command failures stop: they are logged, turned into an
//! error notice and handed back to the caller. Nothing is retried.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use storefront_commerce::CommerceApi;
use storefront_core::{AddressDraft, AddressKind, CustomerDraft, PersonalInfo};
use tracing::{debug, error, info, trace};

use crate::commands::{account, cart, catalog};
use crate::components::Header;
use crate::error::{AppError, ErrorCode};
use crate::pages;
use crate::router::{Anchor, ClickOutcome, Navigation, RenderContext, Router};
use crate::state::{Notice, Store, StorefrontConfig, SubscriptionId, Topic};
use crate::view::{el, View};

/// Topics whose changes make the mounted page stale.
const PAGE_TOPICS: [Topic; 7] = [
    Topic::User,
    Topic::Customer,
    Topic::CustomerCart,
    Topic::Cart,
    Topic::Categories,
    Topic::Products,
    Topic::Types,
];

/// A user intent coming from a page or the shell.
#[derive(Debug, Clone)]
pub enum Action {
    LoadCatalog,
    Register(CustomerDraft),
    Login { email: String, password: String },
    Logout,
    AddAddress {
        address: AddressDraft,
        kinds: Vec<AddressKind>,
    },
    RemoveAddress { address_id: String },
    SetDefaultAddress {
        address_id: String,
        kind: AddressKind,
    },
    ChangePassword {
        current: String,
        new: String,
        confirm: String,
    },
    UpdatePersonalInfo(PersonalInfo),
    AddToCart { product_id: String, quantity: i64 },
    ChangeQuantity { line_item_id: String, quantity: i64 },
    RemoveLine { line_item_id: String },
    ClearCart,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadCatalog => "load_catalog",
            Action::Register(_) => "register",
            Action::Login { .. } => "login",
            Action::Logout => "logout",
            Action::AddAddress { .. } => "add_address",
            Action::RemoveAddress { .. } => "remove_address",
            Action::SetDefaultAddress { .. } => "set_default_address",
            Action::ChangePassword { .. } => "change_password",
            Action::UpdatePersonalInfo(_) => "update_personal_info",
            Action::AddToCart { .. } => "add_to_cart",
            Action::ChangeQuantity { .. } => "change_quantity",
            Action::RemoveLine { .. } => "remove_line",
            Action::ClearCart => "clear_cart",
        }
    }
}

/// What a successful action asks the UI to do next.
#[derive(Default)]
struct Outcome {
    notice: Option<String>,
    redirect: Option<&'static str>,
}

impl Outcome {
    fn quiet() -> Self {
        Outcome::default()
    }

    fn notice(message: impl Into<String>) -> Self {
        Outcome {
            notice: Some(message.into()),
            redirect: None,
        }
    }

    fn redirect(mut self, path: &'static str) -> Self {
        self.redirect = Some(path);
        self
    }
}

fn lock(router: &Mutex<Router>) -> MutexGuard<'_, Router> {
    router.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `action`, failing with [`ErrorCode::Timeout`] once `limit` passes.
async fn within<T>(
    limit: Duration,
    action: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    tokio::time::timeout(limit, action).await.unwrap_or_else(|_| {
        Err(AppError::new(
            ErrorCode::Timeout,
            "The shop did not answer in time, please try again",
        ))
    })
}

pub struct App {
    store: Store,
    config: Arc<StorefrontConfig>,
    api: Arc<dyn CommerceApi>,
    router: Arc<Mutex<Router>>,
    header: Header,
    page_refresh: Vec<SubscriptionId>,
}

impl App {
    /// Builds the app with every page registered. Nothing is mounted until
    /// [`App::start`].
    pub fn new(api: Arc<dyn CommerceApi>, config: Arc<StorefrontConfig>) -> Self {
        let store = Store::new();

        let mut router = Router::new(RenderContext::new(store.clone(), Arc::clone(&config)));
        pages::register_all(&mut router);
        let router = Arc::new(Mutex::new(router));

        let header = Header::mount(&store, Arc::clone(&config));

        let page_refresh = PAGE_TOPICS
            .iter()
            .map(|&topic| {
                let router: Weak<Mutex<Router>> = Arc::downgrade(&router);
                store.subscribe(topic, move |_, event| {
                    let Some(router) = router.upgrade() else {
                        return;
                    };
                    // Locked means a navigation is rendering right now and
                    // will read the new state itself.
                    let guard = router.try_lock();
                    if let Ok(mut router) = guard {
                        trace!(topic = %event.topic(), "Refreshing mounted page");
                        router.refresh();
                    };
                })
            })
            .collect();

        App {
            store,
            config,
            api,
            router,
            header,
            page_refresh,
        }
    }

    /// Mounts the page for `url`, then loads the catalog.
    ///
    /// A failed catalog load leaves the page mounted with an error notice.
    pub async fn start(&self, url: &str) -> Navigation {
        let navigation = lock(&self.router).init(url);
        info!(path = %navigation.path, shop = %self.config.shop.name, "Storefront started");

        // Already logged and published as a notice.
        let _ = self.dispatch(Action::LoadCatalog).await;
        navigation
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn navigate(&self, path: &str) -> Navigation {
        lock(&self.router).go(path, true)
    }

    pub fn click(&self, anchor: &Anchor) -> ClickOutcome {
        lock(&self.router).click(anchor)
    }

    pub fn back(&self) -> Option<Navigation> {
        lock(&self.router).back()
    }

    pub fn forward(&self) -> Option<Navigation> {
        lock(&self.router).forward()
    }

    pub fn current_path(&self) -> Option<String> {
        lock(&self.router).current_path().map(str::to_string)
    }

    /// Mounted page tag, if any.
    pub fn current_tag(&self) -> Option<String> {
        lock(&self.router)
            .current()
            .map(|element| element.tag.to_string())
    }

    /// Runs `f` with the router locked.
    pub fn with_router<R>(&self, f: impl FnOnce(&Router) -> R) -> R {
        f(&lock(&self.router))
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// The mounted page's view.
    pub fn page(&self) -> View {
        lock(&self.router)
            .current()
            .map(|element| element.view.clone())
            .unwrap_or_else(|| el("main"))
    }

    /// Header plus the mounted page.
    pub fn render(&self) -> View {
        el("body").child(self.header.view()).child(self.page())
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Runs an action.
    ///
    /// On failure the error is logged, published as an error notice and
    /// returned. On success a notice may be published and the router may
    /// move to another page.
    pub async fn dispatch(&self, action: Action) -> Result<(), AppError> {
        let name = action.name();
        debug!(action = name, "Dispatching");

        match within(self.config.request_timeout(), self.run(action)).await {
            Ok(outcome) => {
                if let Some(message) = outcome.notice {
                    self.store.notify(Notice::success(message));
                }
                if let Some(path) = outcome.redirect {
                    self.navigate(path);
                }
                Ok(())
            }
            Err(err) => {
                error!(action = name, code = ?err.code, "{}", err.message);
                self.store.notify(Notice::error(err.message.clone()));
                Err(err)
            }
        }
    }

    async fn run(&self, action: Action) -> Result<Outcome, AppError> {
        let api = self.api.as_ref();
        let store = &self.store;
        let config = self.config.as_ref();

        let outcome = match action {
            Action::LoadCatalog => {
                catalog::load_catalog(api, store).await?;
                Outcome::quiet()
            }
            Action::Register(draft) => {
                let customer = account::register(api, store, config, draft).await?;
                Outcome::notice(format!("Welcome, {}! Your account is ready.", customer.first_name))
                    .redirect("/")
            }
            Action::Login { email, password } => {
                let customer = account::login(api, store, config, &email, &password).await?;
                Outcome::notice(format!("Signed in as {}", customer.email)).redirect("/")
            }
            Action::Logout => {
                account::logout(store);
                Outcome::notice("Signed out").redirect("/")
            }
            Action::AddAddress { address, kinds } => {
                account::add_address(api, store, address, kinds).await?;
                Outcome::notice("Address added")
            }
            Action::RemoveAddress { address_id } => {
                account::remove_address(api, store, &address_id).await?;
                Outcome::notice("Address removed")
            }
            Action::SetDefaultAddress { address_id, kind } => {
                account::set_default_address(api, store, &address_id, kind).await?;
                Outcome::notice(format!("Default {} address updated", kind))
            }
            Action::ChangePassword {
                current,
                new,
                confirm,
            } => {
                account::change_password(api, store, config, &current, &new, &confirm).await?;
                Outcome::notice("Password changed")
            }
            Action::UpdatePersonalInfo(info) => {
                account::update_personal_info(api, store, config, info).await?;
                Outcome::notice("Personal info saved")
            }
            Action::AddToCart {
                product_id,
                quantity,
            } => {
                cart::add_to_cart(api, store, config, &product_id, quantity).await?;
                Outcome::notice("Added to cart")
            }
            Action::ChangeQuantity {
                line_item_id,
                quantity,
            } => {
                cart::change_quantity(api, store, &line_item_id, quantity).await?;
                Outcome::quiet()
            }
            Action::RemoveLine { line_item_id } => {
                cart::remove_line(api, store, &line_item_id).await?;
                Outcome::notice("Removed from cart")
            }
            Action::ClearCart => {
                cart::clear_cart(api, store).await?;
                Outcome::quiet()
            }
        };
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for id in self.page_refresh.drain(..) {
            self.store.unsubscribe(id);
        }
        self.header.detach(&self.store);
    }
}
