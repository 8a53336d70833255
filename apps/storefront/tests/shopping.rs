//! End-to-end shopping flows against the in-memory commerce backend.

use std::sync::{Arc, Mutex};

use storefront::{Action, App, ErrorCode, NoticeLevel, StoreEvent, StorefrontConfig, Topic};
use storefront_commerce::InMemoryCommerce;
use storefront_core::{AddressDraft, AddressKind, CustomerDraft};

fn draft() -> CustomerDraft {
    CustomerDraft {
        email: "grace@example.com".into(),
        password: "Compiler1".into(),
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        date_of_birth: "1985-12-09".into(),
        shipping_address: AddressDraft {
            street_name: "1 Navy Way".into(),
            city: "Arlington".into(),
            postal_code: "22202".into(),
            country: "US".into(),
        },
        billing_address: None,
        default_shipping: true,
        default_billing: true,
    }
}

async fn started(path: &str) -> (App, Arc<InMemoryCommerce>) {
    let api = Arc::new(InMemoryCommerce::seeded());
    let app = App::new(api.clone(), Arc::new(StorefrontConfig::default()));
    app.start(path).await;
    (app, api)
}

fn badge(app: &App) -> String {
    app.render()
        .find_by_attr("class", "cart-badge")
        .map(|v| v.text_content())
        .unwrap_or_default()
}

#[tokio::test]
async fn anonymous_cart_follows_the_customer_after_sign_in() {
    let (app, api) = started("/").await;
    app.dispatch(Action::Register(draft())).await.unwrap();
    app.dispatch(Action::Logout).await.unwrap();

    app.dispatch(Action::AddToCart {
        product_id: "prod-hoodie".into(),
        quantity: 1,
    })
    .await
    .unwrap();
    assert_eq!(badge(&app), "1");

    app.dispatch(Action::Login {
        email: "grace@example.com".into(),
        password: "Compiler1".into(),
    })
    .await
    .unwrap();

    assert_eq!(app.current_path().as_deref(), Some("/"));
    assert!(app.page().text_content().contains("Welcome back, Grace!"));
    assert_eq!(badge(&app), "1");

    let cart = app.store().customer_cart().unwrap();
    assert!(cart.line_for_product("prod-hoodie").is_some());
    // the customer cart created at registration absorbed the anonymous one
    assert_eq!(api.cart_count().await, 1);
}

#[tokio::test]
async fn cart_page_tracks_quantity_changes() {
    let (app, _) = started("/cart").await;
    assert!(app.page().text_content().contains("Your cart is empty"));

    app.dispatch(Action::AddToCart {
        product_id: "prod-mug".into(),
        quantity: 2,
    })
    .await
    .unwrap();
    let line_id = app.store().cart().unwrap().line_items[0].id.clone();

    app.dispatch(Action::ChangeQuantity {
        line_item_id: line_id.clone(),
        quantity: 5,
    })
    .await
    .unwrap();
    let page = app.page();
    let row = page.find_by_attr("data-line-id", &line_id).unwrap();
    assert_eq!(row.find_by_attr("class", "qty").unwrap().text_content(), "5");
    assert_eq!(badge(&app), "5");

    app.dispatch(Action::ChangeQuantity {
        line_item_id: line_id,
        quantity: 0,
    })
    .await
    .unwrap();
    assert!(app.page().text_content().contains("Your cart is empty"));
    assert_eq!(badge(&app), "0");
}

#[tokio::test]
async fn profile_edits_show_on_the_profile_page() {
    let (app, _) = started("/").await;
    app.dispatch(Action::Register(draft())).await.unwrap();
    app.navigate("/profile");

    app.dispatch(Action::AddAddress {
        address: AddressDraft {
            street_name: "10 Queen St".into(),
            city: "Toronto".into(),
            postal_code: "M5H 2N2".into(),
            country: "CA".into(),
        },
        kinds: vec![AddressKind::Billing],
    })
    .await
    .unwrap();

    let text = app.page().text_content();
    assert!(text.contains("10 Queen St"));
    assert!(text.contains("1 Navy Way"));
}

#[tokio::test]
async fn failures_become_error_notices() {
    let (app, _) = started("/profile").await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    app.store().subscribe(Topic::Notice, move |_, event| {
        if let StoreEvent::Notice(notice) = event {
            sink.lock().unwrap().push(notice.clone());
        }
    });

    let err = app
        .dispatch(Action::RemoveAddress {
            address_id: "missing".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthError);

    let err = app
        .dispatch(Action::AddToCart {
            product_id: "prod-mug".into(),
            quantity: 500,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|n| n.level == NoticeLevel::Error));
    assert_eq!(app.current_path().as_deref(), Some("/profile"));
}
