//! Router and Store behavior as seen from outside the crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use storefront::pages;
use storefront::router::{Anchor, ClickOutcome, RenderContext, Router, NOT_FOUND_TAG};
use storefront::state::{Store, StorefrontConfig, Topic};
use storefront::view::el;
use storefront_core::UserState;

fn router() -> Router {
    let ctx = RenderContext::new(Store::new(), Arc::new(StorefrontConfig::default()));
    let mut router = Router::new(ctx);
    pages::register_all(&mut router);
    router
}

const ROUTES: [(&str, &str); 7] = [
    ("/", "main-page"),
    ("/login", "login-page"),
    ("/registration", "registration-page"),
    ("/catalog", "catalog-page"),
    ("/cart", "cart-page"),
    ("/profile", "profile-page"),
    ("/about", "about-page"),
];

#[test]
fn every_registered_path_mounts_its_page() {
    let mut router = router();
    let mut previous: Option<String> = None;

    for (i, (path, tag)) in ROUTES.iter().enumerate() {
        let navigation = router.go(path, true);

        assert!(navigation.found, "{} should resolve", path);
        assert_eq!(navigation.tag.as_str(), *tag);
        assert_eq!(router.mount_point().attached(), 1);
        assert_eq!(router.mount_point().mount_count(), i + 1);

        let mounted = router.current().unwrap();
        assert_eq!(mounted.tag.as_str(), *tag);
        assert_eq!(mounted.view.attr_value("data-page"), Some(*tag));
        if let Some(previous) = &previous {
            assert_ne!(mounted.tag.as_str(), previous);
        }
        previous = Some(mounted.tag.to_string());
    }
}

#[test]
fn unregistered_paths_mount_the_not_found_page() {
    let mut router = router();
    router.go("/", true);

    for path in ["/nope", "/catalog/shoes", "/CART", "//double"] {
        let navigation = router.go(path, true);
        assert!(!navigation.found);
        assert_eq!(navigation.tag.as_str(), NOT_FOUND_TAG);
        assert_eq!(router.mount_point().attached(), 1);
    }
}

#[test]
fn back_and_forward_replay_routes() {
    let mut router = router();
    router.init("/");
    router.go("/catalog", true);
    router.go("/cart", true);

    let back = router.back().unwrap();
    assert_eq!(back.path, "/catalog");
    assert_eq!(router.current().unwrap().tag.as_str(), "catalog-page");

    let forward = router.forward().unwrap();
    assert_eq!(forward.path, "/cart");
    assert!(router.forward().is_none());

    router.back();
    router.back();
    assert_eq!(router.current_path(), Some("/"));
    assert!(router.back().is_none());
}

#[test]
fn duplicate_route_registration_keeps_the_last_one() {
    let mut router = router();
    router.define("promo-page", |_| el("main").attr("data-page", "promo-page"));

    let replaced = router.register_route("/about", "promo-page");
    assert_eq!(replaced.map(|t| t.to_string()).as_deref(), Some("about-page"));

    let navigation = router.go("/about", false);
    assert_eq!(navigation.tag.as_str(), "promo-page");
}

#[test]
fn same_page_click_resolves_again() {
    let mut router = router();
    router.init("/catalog");

    let first = router.mount_point().mount_count();
    let outcome = router.click(&Anchor::new("/catalog#top"));
    assert!(matches!(outcome, ClickOutcome::Intercepted(ref n) if n.path == "/catalog"));
    assert_eq!(router.mount_point().mount_count(), first + 1);
    assert_eq!(router.history().len(), 2);
}

#[test]
fn identity_listener_sees_one_event_per_assignment() {
    let store = Store::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    store.subscribe(Topic::User, move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.set_user(UserState::signed_out());
    store.set_user(UserState::signed_out());
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // Keys nobody listens for stay quiet.
    store.set_products(Vec::new());
    store.set_categories(Vec::new());
    store.set_cart(None);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
