//! Site header: navigation, identity links and the cart badge.
//!
//! The header is mounted once and never replaced by navigation. It keeps its
//! own view and rebuilds it whenever the user or a cart changes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::state::{Session, Store, StorefrontConfig, SubscriptionId, Topic};
use crate::view::{el, View};

/// Topics that change what the header shows.
const WATCHED: [Topic; 3] = [Topic::User, Topic::Cart, Topic::CustomerCart];

struct HeaderState {
    view: Mutex<View>,
    renders: AtomicUsize,
}

impl HeaderState {
    fn rebuild(&self, store: &Store, config: &StorefrontConfig) {
        let view = store.with_session(|session| render(session, config));
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = view;
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}

/// A mounted header.
pub struct Header {
    state: Arc<HeaderState>,
    subscriptions: Vec<SubscriptionId>,
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("renders", &self.render_count())
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

impl Header {
    /// Renders the header and subscribes it to the Store.
    pub fn mount(store: &Store, config: Arc<StorefrontConfig>) -> Self {
        let state = Arc::new(HeaderState {
            view: Mutex::new(View::Text(String::new())),
            renders: AtomicUsize::new(0),
        });
        state.rebuild(store, &config);

        let subscriptions = WATCHED
            .iter()
            .map(|&topic| {
                let state = Arc::clone(&state);
                let config = Arc::clone(&config);
                store.subscribe(topic, move |store, event| {
                    trace!(topic = %event.topic(), "Header re-rendering");
                    state.rebuild(store, &config);
                })
            })
            .collect();

        Header {
            state,
            subscriptions,
        }
    }

    pub fn view(&self) -> View {
        self.state
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times the view was built, including the initial render.
    pub fn render_count(&self) -> usize {
        self.state.renders.load(Ordering::SeqCst)
    }

    /// Detaches from the Store. The last view stays readable.
    pub fn unmount(mut self, store: &Store) {
        self.detach(store);
    }

    pub(crate) fn detach(&mut self, store: &Store) {
        for id in self.subscriptions.drain(..) {
            store.unsubscribe(id);
        }
    }
}

pub fn render(session: &Session, config: &StorefrontConfig) -> View {
    let nav = el("nav")
        .child(el("a").attr("href", "/catalog").text("Catalog"))
        .child(el("a").attr("href", "/about").text("About"));

    let account = if session.user.logged_in {
        let name = session
            .user
            .first_name
            .as_deref()
            .or(session.user.email.as_deref())
            .unwrap_or("there");
        el("div")
            .attr("class", "account")
            .child(el("span").text(format!("Hi, {}", name)))
            .child(el("a").attr("href", "/profile").text("Profile"))
            .child(
                el("button")
                    .attr("data-action", "logout")
                    .text("Log out"),
            )
    } else {
        el("div")
            .attr("class", "account")
            .child(el("a").attr("href", "/login").text("Sign in"))
            .child(el("a").attr("href", "/registration").text("Register"))
    };

    let items = session
        .active_cart()
        .map(|cart| cart.total_quantity())
        .unwrap_or(0);

    el("header")
        .child(
            el("a")
                .attr("href", "/")
                .attr("class", "brand")
                .text(config.shop.name.as_str()),
        )
        .child(nav)
        .child(account)
        .child(
            el("a").attr("href", "/cart").text("Cart").child(
                el("span")
                    .attr("class", "cart-badge")
                    .text(items.to_string()),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::sample_catalog;
    use storefront_core::{Cart, UserState};

    fn badge(header: &Header) -> String {
        header
            .view()
            .find_by_attr("class", "cart-badge")
            .map(View::text_content)
            .unwrap_or_default()
    }

    #[test]
    fn test_initial_render_is_signed_out() {
        let store = Store::new();
        let header = Header::mount(&store, Arc::new(StorefrontConfig::default()));

        assert_eq!(header.render_count(), 1);
        assert!(header.view().find_by_attr("href", "/login").is_some());
        assert_eq!(badge(&header), "0");
    }

    #[test]
    fn test_rerenders_on_user_and_cart_only() {
        let store = Store::new();
        let header = Header::mount(&store, Arc::new(StorefrontConfig::default()));

        store.set_products(sample_catalog().products);
        assert_eq!(header.render_count(), 1);

        let mut cart = Cart::new("USD", None);
        let mug = store.with_session(|s| s.product("prod-mug").cloned()).unwrap();
        cart.add_product(&mug, 3).unwrap();
        store.set_cart(Some(cart));
        assert_eq!(header.render_count(), 2);
        assert_eq!(badge(&header), "3");

        store.set_user(UserState {
            logged_in: true,
            email: Some("ada@example.com".into()),
            first_name: Some("Ada".into()),
        });
        assert_eq!(header.render_count(), 3);
        assert!(header.view().text_content().contains("Hi, Ada"));
        assert!(header.view().find_by_attr("data-action", "logout").is_some());
    }

    #[test]
    fn test_unmount_stops_updates() {
        let store = Store::new();
        let header = Header::mount(&store, Arc::new(StorefrontConfig::default()));
        assert_eq!(store.listener_count(Topic::User), 1);

        header.unmount(&store);
        assert_eq!(store.listener_count(Topic::User), 0);
        assert_eq!(store.listener_count(Topic::Cart), 0);
    }
}
