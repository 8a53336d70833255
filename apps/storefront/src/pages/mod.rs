//! # Pages
//!
//! One module per page. Each registers its route and its element constructor
//! with the router at startup.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Path             Tag                  Reads from Store                 │
//! │  ────             ───                  ────────────────                 │
//! │  /                main-page            user, products                  │
//! │  /login           login-page           user                            │
//! │  /registration    registration-page    user                            │
//! │  /catalog         catalog-page         categories, products, types     │
//! │  /cart            cart-page            cart / customerCart             │
//! │  /profile         profile-page         customer                        │
//! │  /about           about-page           -                               │
//! │  (anything else)  not-found-page       -                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod about;
pub mod cart;
pub mod catalog;
pub mod home;
pub mod login;
pub mod not_found;
pub mod profile;
pub mod registration;

use crate::router::Router;
use crate::view::{el, View};

/// Registers every page with the router.
pub fn register_all(router: &mut Router) {
    home::register(router);
    login::register(router);
    registration::register(router);
    catalog::register(router);
    cart::register(router);
    profile::register(router);
    about::register(router);
    not_found::register(router);
}

/// Page root with its heading.
pub(crate) fn page(tag: &str, title: &str) -> View {
    el("main")
        .attr("data-page", tag)
        .child(el("h1").text(title))
}

pub(crate) fn link(href: &str, label: &str) -> View {
    el("a").attr("href", href).text(label)
}

/// A labelled form input.
pub(crate) fn input(name: &str, label: &str, kind: &str) -> View {
    el("label")
        .text(label)
        .child(el("input").attr("name", name).attr("type", kind))
}
