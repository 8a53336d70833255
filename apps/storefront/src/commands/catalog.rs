//! # Catalog Commands

use storefront_commerce::CommerceApi;
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::Store;

/// Fetches categories, products and product types and stores all three.
///
/// The three requests run concurrently. If any fails nothing is stored.
pub async fn load_catalog(api: &dyn CommerceApi, store: &Store) -> Result<(), AppError> {
    debug!("load_catalog command");

    let (categories, products, types) =
        tokio::try_join!(api.categories(), api.products(), api.product_types())?;

    info!(
        categories = categories.len(),
        products = products.len(),
        types = types.len(),
        "Catalog loaded"
    );

    store.batch(|store| {
        store.set_categories(categories);
        store.set_products(products);
        store.set_types(types);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use storefront_commerce::InMemoryCommerce;

    use crate::state::Topic;

    #[tokio::test]
    async fn test_load_catalog_fills_store() {
        let api = InMemoryCommerce::seeded();
        let store = Store::new();

        load_catalog(&api, &store).await.unwrap();

        assert_eq!(store.products().len(), 6);
        assert_eq!(store.categories().len(), 5);
        assert_eq!(store.types().len(), 3);
    }

    #[tokio::test]
    async fn test_products_listener_sees_categories_already_stored() {
        let api = InMemoryCommerce::seeded();
        let store = Store::new();
        let seen = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&seen);
        store.subscribe(Topic::Products, move |store, _| {
            *sink.lock().unwrap() = Some(store.categories().len());
        });

        load_catalog(&api, &store).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_empty_backend_loads_nothing() {
        let api = InMemoryCommerce::empty();
        let store = Store::new();

        load_catalog(&api, &store).await.unwrap();
        assert!(store.products().is_empty());
    }
}
