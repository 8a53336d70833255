//! # Sample Catalog
//!
//! A small, fixed catalog for the sandbox backend.
//!
//! ## Contents
//! - Home › Kitchen (mugs, kettles)
//! - Apparel › T-Shirts (tees, hoodies)
//! - Books (programming books, notebooks)
//!
//! Ids are stable (`prod-mug`, `cat-kitchen`, ...) so tests and the CLI shell
//! can refer to products directly. Some products carry a sale price.

use storefront_core::{Category, Product, ProductType};

/// Everything the catalog page loads at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub product_types: Vec<ProductType>,
    pub products: Vec<Product>,
}

/// (id, name, slug, parent, order hint)
const CATEGORIES: &[(&str, &str, &str, Option<&str>, &str)] = &[
    ("cat-home", "Home", "home", None, "0.1"),
    ("cat-kitchen", "Kitchen", "kitchen", Some("cat-home"), "0.11"),
    ("cat-apparel", "Apparel", "apparel", None, "0.2"),
    ("cat-tshirts", "T-Shirts", "t-shirts", Some("cat-apparel"), "0.21"),
    ("cat-books", "Books", "books", None, "0.3"),
];

/// (id, name, attributes)
const PRODUCT_TYPES: &[(&str, &str, &[&str])] = &[
    ("type-goods", "Goods", &["color", "material"]),
    ("type-clothing", "Clothing", &["color", "size"]),
    ("type-book", "Book", &["author", "pages"]),
];

/// (id, sku, name, type, categories, price cents, sale price cents)
#[allow(clippy::type_complexity)]
const PRODUCTS: &[(&str, &str, &str, &str, &[&str], i64, Option<i64>)] = &[
    (
        "prod-mug",
        "MUG-01",
        "Ceramic Mug",
        "type-goods",
        &["cat-home", "cat-kitchen"],
        1200,
        Some(900),
    ),
    (
        "prod-kettle",
        "KTL-01",
        "Steel Kettle",
        "type-goods",
        &["cat-home", "cat-kitchen"],
        3499,
        None,
    ),
    (
        "prod-tee",
        "TEE-01",
        "Cotton T-Shirt",
        "type-clothing",
        &["cat-apparel", "cat-tshirts"],
        1999,
        None,
    ),
    (
        "prod-hoodie",
        "HOD-01",
        "Zip Hoodie",
        "type-clothing",
        &["cat-apparel"],
        4999,
        Some(3999),
    ),
    (
        "prod-rust-book",
        "BK-RUST",
        "The Rust Programming Language",
        "type-book",
        &["cat-books"],
        3900,
        None,
    ),
    (
        "prod-notebook",
        "NB-DOT",
        "Dotted Notebook",
        "type-book",
        &["cat-books"],
        850,
        None,
    ),
];

/// Builds the sample catalog.
pub fn sample_catalog() -> Catalog {
    let categories = CATEGORIES
        .iter()
        .map(|(id, name, slug, parent, hint)| Category {
            id: id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            parent_id: parent.map(str::to_string),
            order_hint: hint.to_string(),
        })
        .collect();

    let product_types = PRODUCT_TYPES
        .iter()
        .map(|(id, name, attributes)| ProductType {
            id: id.to_string(),
            name: name.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        })
        .collect();

    let products = PRODUCTS
        .iter()
        .map(|(id, sku, name, type_id, cats, price, sale)| Product {
            id: id.to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            slug: slugify(name),
            description: Some(format!("{} from the sample catalog.", name)),
            product_type_id: type_id.to_string(),
            category_ids: cats.iter().map(|c| c.to_string()).collect(),
            price_cents: *price,
            discounted_price_cents: *sale,
            image_url: Some(format!("/images/{}.jpg", sku.to_lowercase())),
        })
        .collect();

    Catalog {
        categories,
        product_types,
        products,
    }
}

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_catalog_is_consistent() {
        let catalog = sample_catalog();
        let category_ids: HashSet<_> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
        let type_ids: HashSet<_> = catalog.product_types.iter().map(|t| t.id.as_str()).collect();

        for product in &catalog.products {
            assert!(type_ids.contains(product.product_type_id.as_str()));
            for category in &product.category_ids {
                assert!(category_ids.contains(category.as_str()), "{}", category);
            }
        }
        for category in &catalog.categories {
            if let Some(parent) = &category.parent_id {
                assert!(category_ids.contains(parent.as_str()));
            }
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cotton T-Shirt"), "cotton-t-shirt");
        assert_eq!(
            slugify("The Rust Programming Language"),
            "the-rust-programming-language"
        );
    }
}
