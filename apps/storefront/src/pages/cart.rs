//! Cart page. Shows the customer cart when signed in, the anonymous cart
//! otherwise.

use crate::router::{RenderContext, Router};
use crate::view::{el, View};

use super::{link, page};

pub const PATH: &str = "/cart";
pub const TAG: &str = "cart-page";

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

pub fn render(ctx: &RenderContext) -> View {
    let config = &ctx.config;
    let cart = ctx.store.active_cart();

    let cart = match cart {
        Some(cart) if !cart.is_empty() => cart,
        _ => {
            return page(TAG, "Your cart")
                .child(el("p").attr("class", "empty").text("Your cart is empty."))
                .child(link("/catalog", "Continue shopping"));
        }
    };

    let rows = cart.line_items.iter().map(|line| {
        el("tr")
            .attr("data-line-id", line.id.as_str())
            .child(el("td").text(line.name.as_str()))
            .child(el("td").attr("class", "qty").text(line.quantity.to_string()))
            .child(el("td").text(config.format_currency(line.unit_price_cents)))
            .child(
                el("td")
                    .attr("class", "line-total")
                    .text(config.format_currency(line.line_total().cents())),
            )
            .child(
                el("td").child(
                    el("button")
                        .attr("data-action", "remove-line")
                        .attr("data-line-id", line.id.as_str())
                        .text("Remove"),
                ),
            )
    });

    page(TAG, "Your cart")
        .child(
            el("table")
                .attr("class", "cart-lines")
                .child(
                    el("tr")
                        .child(el("th").text("Product"))
                        .child(el("th").text("Qty"))
                        .child(el("th").text("Price"))
                        .child(el("th").text("Total"))
                        .child(el("th")),
                )
                .children(rows),
        )
        .child(
            el("p")
                .attr("class", "cart-total")
                .text(format!("Total: {}", config.format_currency(cart.total().cents()))),
        )
        .child(link("/catalog", "Continue shopping"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{ctx, customer};
    use crate::state::Store;
    use storefront_commerce::sample_catalog;
    use storefront_core::{Cart, UserState};

    fn cart_with(product_ids: &[(&str, i64)], customer_id: Option<String>) -> Cart {
        let catalog = sample_catalog();
        let mut cart = Cart::new("USD", customer_id);
        for (id, qty) in product_ids {
            let product = catalog.products.iter().find(|p| p.id == *id).unwrap();
            cart.add_product(product, *qty).unwrap();
        }
        cart
    }

    #[test]
    fn test_empty_cart_links_to_catalog() {
        let store = Store::new();
        let view = render(&ctx(&store, PATH));

        assert!(view.text_content().contains("Your cart is empty"));
        assert!(view.find_by_attr("href", "/catalog").is_some());
    }

    #[test]
    fn test_anonymous_cart_lines_and_total() {
        let store = Store::new();
        store.set_cart(Some(cart_with(&[("prod-mug", 2), ("prod-notebook", 1)], None)));

        let view = render(&ctx(&store, PATH));
        assert_eq!(view.find_all("tr").len(), 3);
        assert_eq!(
            view.find_by_attr("class", "cart-total").unwrap().text_content(),
            "Total: $26.50"
        );
    }

    #[test]
    fn test_signed_in_shows_customer_cart() {
        let store = Store::new();
        let customer = customer();
        store.set_customer(Some(customer.clone()));
        store.set_user(UserState::signed_in(&customer));
        store
            .set_customer_cart(Some(cart_with(&[("prod-kettle", 1)], Some(customer.id))))
            .unwrap();
        store.set_cart(Some(cart_with(&[("prod-mug", 5)], None)));

        let view = render(&ctx(&store, PATH));
        let text = view.text_content();
        assert!(text.contains("Steel Kettle"));
        assert!(!text.contains("Ceramic Mug"));
    }
}
