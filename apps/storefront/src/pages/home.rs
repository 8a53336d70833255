//! Main page: greeting, entry links and the current deals.

use crate::router::{RenderContext, Router};
use crate::view::{el, View};

use super::{link, page};

pub const PATH: &str = "/";
pub const TAG: &str = "main-page";

/// How many discounted products the deals strip shows.
const DEALS_SHOWN: usize = 3;

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

pub fn render(ctx: &RenderContext) -> View {
    let config = &ctx.config;
    ctx.store.with_session(|session| {
        let greeting = match (&session.user.first_name, session.user.logged_in) {
            (Some(name), true) => format!("Welcome back, {}!", name),
            _ => format!("Welcome to {}", config.shop.name),
        };

        let mut nav = el("nav")
            .attr("class", "entry-links")
            .child(link("/catalog", "Browse the catalog"))
            .child(link("/cart", "View cart"));
        if !session.user.logged_in {
            nav = nav
                .child(link("/login", "Sign in"))
                .child(link("/registration", "Create an account"));
        }

        let deals: Vec<View> = session
            .products
            .iter()
            .filter(|p| p.is_discounted())
            .take(DEALS_SHOWN)
            .map(|p| {
                el("li")
                    .attr("data-product-id", p.id.as_str())
                    .text(format!(
                        "{} {} (-{}%)",
                        p.name,
                        config.format_currency(p.effective_price().cents()),
                        p.price().percent_off(p.effective_price())
                    ))
            })
            .collect();

        let mut view = page(TAG, &greeting).child(nav);
        if !deals.is_empty() {
            view = view.child(
                el("section")
                    .attr("class", "deals")
                    .child(el("h2").text("Deals"))
                    .child(el("ul").children(deals)),
            );
        }
        view
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{ctx, customer};
    use crate::state::Store;
    use storefront_commerce::sample_catalog;
    use storefront_core::UserState;

    #[test]
    fn test_signed_out_home_offers_sign_in() {
        let store = Store::new();
        let view = render(&ctx(&store, "/"));

        assert!(view.text_content().contains("Welcome to Storefront"));
        assert!(view.find_by_attr("href", "/login").is_some());
        assert!(view.find_by_attr("class", "deals").is_none());
    }

    #[test]
    fn test_signed_in_home_greets_customer_and_lists_deals() {
        let store = Store::new();
        store.set_user(UserState::signed_in(&customer()));
        store.set_products(sample_catalog().products);

        let view = render(&ctx(&store, "/"));
        assert!(view.text_content().contains("Welcome back, Ada!"));
        assert!(view.find_by_attr("href", "/login").is_none());

        let deals = view.find_by_attr("class", "deals").unwrap();
        assert!(deals.text_content().contains("Ceramic Mug $9.00 (-25%)"));
    }
}
