//! Catalog page: category tree and product list.

use storefront_core::{Category, Product};

use crate::router::{RenderContext, Router};
use crate::state::StorefrontConfig;
use crate::view::{el, View};

use super::page;

pub const PATH: &str = "/catalog";
pub const TAG: &str = "catalog-page";

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

fn category_tree(categories: &[Category], parent: Option<&str>) -> Option<View> {
    let mut level: Vec<&Category> = categories
        .iter()
        .filter(|c| c.parent_id.as_deref() == parent)
        .collect();
    if level.is_empty() {
        return None;
    }
    level.sort_by(|a, b| a.order_hint.cmp(&b.order_hint));

    let items = level.into_iter().map(|category| {
        let item = el("li")
            .attr("data-category-id", category.id.as_str())
            .text(category.name.as_str());
        match category_tree(categories, Some(&category.id)) {
            Some(children) => item.child(children),
            None => item,
        }
    });
    Some(el("ul").children(items))
}

fn product_card(product: &Product, type_name: Option<&str>, config: &StorefrontConfig) -> View {
    let mut price = el("p").attr("class", "price");
    if product.is_discounted() {
        price = price
            .child(el("del").text(config.format_currency(product.price_cents)))
            .child(el("strong").text(config.format_currency(product.effective_price().cents())));
    } else {
        price = price.text(config.format_currency(product.price_cents));
    }

    let mut card = el("article")
        .attr("class", "product")
        .attr("data-product-id", product.id.as_str())
        .child(el("h3").text(product.name.as_str()))
        .child(el("small").text(format!("SKU {}", product.sku)));
    if let Some(type_name) = type_name {
        card = card.child(el("small").attr("class", "product-type").text(type_name));
    }
    card.child(price).child(
        el("button")
            .attr("data-action", "add-to-cart")
            .attr("data-product-id", product.id.as_str())
            .text("Add to cart"),
    )
}

pub fn render(ctx: &RenderContext) -> View {
    let config = &ctx.config;
    ctx.store.with_session(|session| {
        let view = page(TAG, "Catalog");

        if session.products.is_empty() {
            return view.child(el("p").attr("class", "empty").text("No products to show yet."));
        }

        let mut view = view;
        if let Some(tree) = category_tree(&session.categories, None) {
            view = view.child(el("nav").attr("class", "categories").child(tree));
        }

        let cards = session.products.iter().map(|product| {
            let type_name = session
                .types
                .iter()
                .find(|t| t.id == product.product_type_id)
                .map(|t| t.name.as_str());
            product_card(product, type_name, config)
        });
        view.child(el("section").attr("class", "products").children(cards))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::ctx;
    use crate::state::Store;
    use storefront_commerce::sample_catalog;

    #[test]
    fn test_empty_catalog() {
        let store = Store::new();
        let view = render(&ctx(&store, PATH));
        assert!(view.find_by_attr("class", "empty").is_some());
    }

    #[test]
    fn test_lists_products_and_nested_categories() {
        let store = Store::new();
        let catalog = sample_catalog();
        store.set_categories(catalog.categories);
        store.set_products(catalog.products.clone());
        store.set_types(catalog.product_types);

        let view = render(&ctx(&store, PATH));
        assert_eq!(view.find_all("article").len(), catalog.products.len());

        let home = view.find_by_attr("data-category-id", "cat-home").unwrap();
        assert!(home.find_by_attr("data-category-id", "cat-kitchen").is_some());

        let mug = view.find_by_attr("data-product-id", "prod-mug").unwrap();
        assert_eq!(mug.find("del").unwrap().text_content(), "$12.00");
        assert_eq!(mug.find("strong").unwrap().text_content(), "$9.00");
        assert_eq!(
            mug.find_by_attr("class", "product-type").unwrap().text_content(),
            "Goods"
        );
    }
}
