//! # Store
//!
//! Process-wide session state with typed change notification.
//!
//! The Store is the only write path for state shared between components:
//! the signed-in user, the auth token, the customer and their cart, the
//! anonymous cart, and the catalog. Every successful write publishes exactly
//! one [`StoreEvent`] on the matching [`Topic`]. Reads never publish.
//!
//! ## Delivery
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Queued Event Delivery                                │
//! │                                                                         │
//! │  store.set_user(..)                                                     │
//! │       │                                                                 │
//! │       ├──► write session (lock released before delivery)               │
//! │       │                                                                 │
//! │       └──► queue.push_back(StoreEvent::User)                           │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  drain()   (one pass at a time)                                  │  │
//! │  │    pop event ──► listeners of event.topic() in subscribe order   │  │
//! │  │         ▲                         │                              │  │
//! │  │         │      listener writes    │                              │  │
//! │  │         └──── store.set_cart(..) ─┘  (queued, not recursive)     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  store.batch(|s| ..) holds delivery until the outermost batch ends.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let store = Store::new();
//! let id = store.subscribe(Topic::User, |store, event| {
//!     if let StoreEvent::User(user) = event {
//!         println!("logged in: {}", user.logged_in);
//!     }
//! });
//! store.set_user(UserState::signed_out());
//! store.unsubscribe(id);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use storefront_core::{AuthToken, Cart, Category, Customer, Product, ProductType, UserState};
use tracing::{debug, trace};

use crate::error::StoreError;

// =============================================================================
// Topics and Events
// =============================================================================

/// The closed set of things a component can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    User,
    Token,
    Customer,
    CustomerCart,
    Categories,
    Products,
    Types,
    Cart,
    Notice,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::User,
        Topic::Token,
        Topic::Customer,
        Topic::CustomerCart,
        Topic::Categories,
        Topic::Products,
        Topic::Types,
        Topic::Cart,
        Topic::Notice,
    ];

    /// Key name of the topic.
    pub fn name(&self) -> &'static str {
        match self {
            Topic::User => "user",
            Topic::Token => "token",
            Topic::Customer => "customer",
            Topic::CustomerCart => "customerCart",
            Topic::Categories => "categories",
            Topic::Products => "products",
            Topic::Types => "types",
            Topic::Cart => "cart",
            Topic::Notice => "notice",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the user. Rendering it is up to the subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A change notification carrying the newly stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    User(UserState),
    Token(Option<AuthToken>),
    Customer(Option<Customer>),
    CustomerCart(Option<Cart>),
    Categories(Vec<Category>),
    Products(Vec<Product>),
    Types(Vec<ProductType>),
    Cart(Option<Cart>),
    Notice(Notice),
}

impl StoreEvent {
    pub fn topic(&self) -> Topic {
        match self {
            StoreEvent::User(_) => Topic::User,
            StoreEvent::Token(_) => Topic::Token,
            StoreEvent::Customer(_) => Topic::Customer,
            StoreEvent::CustomerCart(_) => Topic::CustomerCart,
            StoreEvent::Categories(_) => Topic::Categories,
            StoreEvent::Products(_) => Topic::Products,
            StoreEvent::Types(_) => Topic::Types,
            StoreEvent::Cart(_) => Topic::Cart,
            StoreEvent::Notice(_) => Topic::Notice,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Everything the Store holds. Keys are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: UserState,
    pub token: Option<AuthToken>,
    pub customer: Option<Customer>,
    /// Cart of the signed-in customer.
    pub customer_cart: Option<Cart>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub types: Vec<ProductType>,
    /// Anonymous cart, used while signed out.
    pub cart: Option<Cart>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.user.logged_in && self.customer.is_some()
    }

    /// Cart the UI should show: the customer cart when signed in, the
    /// anonymous cart otherwise.
    pub fn active_cart(&self) -> Option<&Cart> {
        if self.is_signed_in() {
            self.customer_cart.as_ref()
        } else {
            self.cart.as_ref()
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Store, &StoreEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    listener: Listener,
}

struct Shared {
    session: Mutex<Session>,
    queue: Mutex<VecDeque<StoreEvent>>,
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
    dispatching: AtomicBool,
    batch_depth: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets a flag when dropped, so a panicking listener does not wedge the Store.
struct FlagGuard<'a>(&'a AtomicBool);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct BatchGuard<'a>(&'a AtomicUsize);

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle to the Store. Clones refer to the same state.
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("session", &*lock(&self.shared.session))
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Creates a Store holding `{ user: { logged_in: false } }` and nothing else.
    pub fn new() -> Self {
        Self::from_session(Session::default())
    }

    pub fn from_session(session: Session) -> Self {
        Store {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                queue: Mutex::new(VecDeque::new()),
                subscriptions: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                dispatching: AtomicBool::new(false),
                batch_depth: AtomicUsize::new(0),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Registers a listener for one topic.
    ///
    /// Listeners run in subscription order. A listener may write to the Store;
    /// the resulting events are delivered after the current one.
    pub fn subscribe<F>(&self, topic: Topic, listener: F) -> SubscriptionId
    where
        F: Fn(&Store, &StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.shared.subscriptions).push(Subscription {
            id,
            topic,
            listener: Arc::new(listener),
        });
        trace!(%topic, ?id, "Listener subscribed");
        id
    }

    /// Removes a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = lock(&self.shared.subscriptions);
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        lock(&self.shared.subscriptions)
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Runs `f` with borrowed access to the session.
    ///
    /// Do not write to the Store from inside `f`.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&lock(&self.shared.session))
    }

    pub fn snapshot(&self) -> Session {
        self.with_session(Session::clone)
    }

    pub fn user(&self) -> UserState {
        self.with_session(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.with_session(|s| s.token.clone())
    }

    pub fn customer(&self) -> Option<Customer> {
        self.with_session(|s| s.customer.clone())
    }

    pub fn customer_cart(&self) -> Option<Cart> {
        self.with_session(|s| s.customer_cart.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.with_session(|s| s.categories.clone())
    }

    pub fn products(&self) -> Vec<Product> {
        self.with_session(|s| s.products.clone())
    }

    pub fn types(&self) -> Vec<ProductType> {
        self.with_session(|s| s.types.clone())
    }

    pub fn cart(&self) -> Option<Cart> {
        self.with_session(|s| s.cart.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.with_session(Session::is_signed_in)
    }

    pub fn active_cart(&self) -> Option<Cart> {
        self.with_session(|s| s.active_cart().cloned())
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    pub fn set_user(&self, user: UserState) {
        let event = StoreEvent::User(user.clone());
        self.assign(move |s| s.user = user, event);
    }

    /// Stores the auth token. A present token must carry an access token.
    pub fn set_token(&self, token: Option<AuthToken>) -> Result<(), StoreError> {
        if matches!(&token, Some(t) if t.access_token.trim().is_empty()) {
            return Err(StoreError::EmptyToken);
        }
        let event = StoreEvent::Token(token.clone());
        self.assign(move |s| s.token = token, event);
        Ok(())
    }

    pub fn set_customer(&self, customer: Option<Customer>) {
        let event = StoreEvent::Customer(customer.clone());
        self.assign(move |s| s.customer = customer, event);
    }

    /// Stores the customer's cart. A present cart must belong to the current
    /// customer.
    pub fn set_customer_cart(&self, cart: Option<Cart>) -> Result<(), StoreError> {
        if let Some(cart) = &cart {
            self.with_session(|s| match &s.customer {
                Some(customer) if cart.belongs_to(&customer.id) => Ok(()),
                Some(_) => Err(StoreError::ForeignCart {
                    cart_id: cart.id.clone(),
                }),
                None => Err(StoreError::NoCustomer),
            })?;
        }
        let event = StoreEvent::CustomerCart(cart.clone());
        self.assign(move |s| s.customer_cart = cart, event);
        Ok(())
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        let event = StoreEvent::Categories(categories.clone());
        self.assign(move |s| s.categories = categories, event);
    }

    pub fn set_products(&self, products: Vec<Product>) {
        let event = StoreEvent::Products(products.clone());
        self.assign(move |s| s.products = products, event);
    }

    pub fn set_types(&self, types: Vec<ProductType>) {
        let event = StoreEvent::Types(types.clone());
        self.assign(move |s| s.types = types, event);
    }

    /// Stores the anonymous cart.
    pub fn set_cart(&self, cart: Option<Cart>) {
        let event = StoreEvent::Cart(cart.clone());
        self.assign(move |s| s.cart = cart, event);
    }

    /// Stores `cart` under whichever key is active for the current session.
    pub fn set_active_cart(&self, cart: Cart) -> Result<(), StoreError> {
        if self.is_signed_in() {
            self.set_customer_cart(Some(cart))
        } else {
            self.set_cart(Some(cart));
            Ok(())
        }
    }

    /// Publishes a notice. Notices are not stored.
    pub fn notify(&self, notice: Notice) {
        self.publish(StoreEvent::Notice(notice));
    }

    /// Resets user, token, customer and customer cart. Listeners see the
    /// four events after the reset is complete.
    pub fn sign_out(&self) {
        self.batch(|store| {
            store.set_user(UserState::signed_out());
            store.assign(|s| s.token = None, StoreEvent::Token(None));
            store.set_customer(None);
            store.assign(|s| s.customer_cart = None, StoreEvent::CustomerCart(None));
        });
        debug!("Session signed out");
    }

    /// Defers delivery of every event published inside `f` until the
    /// outermost batch ends, then delivers them in publication order.
    pub fn batch<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        self.shared.batch_depth.fetch_add(1, Ordering::SeqCst);
        let result = {
            let _guard = BatchGuard(&self.shared.batch_depth);
            f(self)
        };
        self.drain();
        result
    }

    // -------------------------------------------------------------------------
    // Delivery
    // -------------------------------------------------------------------------

    fn assign(&self, write: impl FnOnce(&mut Session), event: StoreEvent) {
        write(&mut lock(&self.shared.session));
        self.publish(event);
    }

    fn publish(&self, event: StoreEvent) {
        trace!(topic = %event.topic(), "Store event queued");
        lock(&self.shared.queue).push_back(event);
        self.drain();
    }

    fn drain(&self) {
        loop {
            if self.shared.batch_depth.load(Ordering::SeqCst) > 0 {
                return;
            }
            // A pass is already running further up the stack: it will pick
            // up whatever we queued.
            if self.shared.dispatching.swap(true, Ordering::SeqCst) {
                return;
            }

            {
                let _guard = FlagGuard(&self.shared.dispatching);
                while let Some(event) = self.next_event() {
                    self.deliver(&event);
                }
            }

            // Events queued between the last pop and the flag reset.
            if lock(&self.shared.queue).is_empty() {
                return;
            }
        }
    }

    fn next_event(&self) -> Option<StoreEvent> {
        if self.shared.batch_depth.load(Ordering::SeqCst) > 0 {
            return None;
        }
        lock(&self.shared.queue).pop_front()
    }

    fn deliver(&self, event: &StoreEvent) {
        let topic = event.topic();
        let listeners: Vec<Listener> = lock(&self.shared.subscriptions)
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| Arc::clone(&s.listener))
            .collect();

        trace!(%topic, listeners = listeners.len(), "Delivering store event");
        for listener in listeners {
            listener(self, event);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
