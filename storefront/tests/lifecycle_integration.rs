//! Integration tests for a full storefront session running in a Store
//!
//! These drive the reducers through the runtime, so timers, cancellation and
//! action broadcasting behave as they do in the binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use storefront::{
    CartAction, CheckoutDetails, CheckoutField, FieldError, Money, NOTIFICATION_TIMER,
    NotificationAction, NotificationKind, OrderId, OrderStatus, PaymentField, PaymentFields,
    Product, ProductId, Screen, StorefrontAction, StorefrontConfig, StorefrontEnvironment,
    StorefrontReducer, StorefrontState,
};
use storefront_runtime::Store;
use storefront_testing::{SequentialIdGenerator, test_clock};

type TestStore = Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

fn store() -> TestStore {
    let env = StorefrontEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new("ORDER")),
        StorefrontConfig::default(),
    );
    Store::new(StorefrontState::new(), StorefrontReducer::new(), env)
}

fn macbook() -> Product {
    Product::new(ProductId::new(1), "MacBook Pro", Money::from_units(1701))
}

fn case() -> Product {
    Product::new(ProductId::new(2), "Phone Case", Money::from_units(45))
}

fn add(product: Product) -> StorefrontAction {
    StorefrontAction::Cart(CartAction::AddToCart(product))
}

fn valid_details() -> CheckoutDetails {
    CheckoutDetails::new("Ada Lovelace", "ada@example.com")
}

fn valid_card() -> PaymentFields {
    PaymentFields::new("4242 4242 4242 4242", "12/27", "123")
}

async fn place_order(store: &TestStore, products: &[Product]) -> OrderId {
    for product in products {
        store.send(add(product.clone())).await.unwrap();
    }
    store.send(StorefrontAction::NavigateToCheckout).await.unwrap();
    store
        .send(StorefrontAction::SubmitCheckout(valid_details()))
        .await
        .unwrap();
    store
        .send(StorefrontAction::SubmitPayment(valid_card()))
        .await
        .unwrap();

    match store.state(|s| s.screen.clone()).await {
        Screen::Confirmed { order_id } => order_id,
        other => panic!("expected confirmation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_end_to_end_purchase() {
    let store = store();

    // Add to an empty cart
    store.send(add(macbook())).await.unwrap();
    let (items, badge, subtotal) = store
        .state(|s| (s.cart.len(), s.cart_badge(), s.subtotal()))
        .await;
    assert_eq!((items, badge), (1, 1));
    assert_eq!(subtotal, Money::from_units(1701));
    let note = store.state(|s| s.notification.current().cloned()).await.unwrap();
    assert_eq!(note.kind, NotificationKind::Success);
    assert!(note.message.contains("MacBook Pro"));

    // Checkout with a blank name is rejected
    store.send(StorefrontAction::NavigateToCheckout).await.unwrap();
    store
        .send(StorefrontAction::SubmitCheckout(CheckoutDetails::new(
            "",
            "ada@example.com",
        )))
        .await
        .unwrap();
    match store.state(|s| s.screen.clone()).await {
        Screen::Checkout { errors } => {
            assert_eq!(errors.get(CheckoutField::FullName), Some(FieldError::Required));
        },
        other => panic!("expected checkout, got {other:?}"),
    }

    // Valid details move on to payment
    store
        .send(StorefrontAction::SubmitCheckout(valid_details()))
        .await
        .unwrap();
    assert!(matches!(
        store.state(|s| s.screen.clone()).await,
        Screen::Payment { .. }
    ));

    // Payment without a card number is rejected
    store
        .send(StorefrontAction::SubmitPayment(PaymentFields::new(
            "", "12/27", "123",
        )))
        .await
        .unwrap();
    let (screen, orders) = store.state(|s| (s.screen.clone(), s.orders.len())).await;
    match screen {
        Screen::Payment { errors, .. } => {
            assert_eq!(errors.get(PaymentField::CardNumber), Some(FieldError::Required));
        },
        other => panic!("expected payment, got {other:?}"),
    }
    assert_eq!(orders, 0);

    // Complete payment
    let mut rx = store.subscribe_actions();
    let mut handle = store
        .send(StorefrontAction::SubmitPayment(valid_card()))
        .await
        .unwrap();
    handle.wait().await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.orders.len(), 1);
    let order = state.orders.latest().unwrap();
    assert_eq!(order.total, Money::from_units(1701));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(state.cart.is_empty());
    assert_eq!(
        state.screen,
        Screen::Confirmed {
            order_id: order.id.clone()
        }
    );

    // Observers learn about the order
    assert!(matches!(
        rx.recv().await.unwrap(),
        StorefrontAction::SubmitPayment(_)
    ));
    assert_eq!(
        rx.recv().await.unwrap(),
        StorefrontAction::OrderPlaced {
            order_id: order.id.clone(),
            total: Money::from_units(1701),
        }
    );

    // Back to browsing with an empty cart
    store.send(StorefrontAction::ViewOrders).await.unwrap();
    assert_eq!(store.state(|s| s.screen.clone()).await, Screen::Browsing);
    assert_eq!(store.state(StorefrontState::cart_badge).await, 0);
}

#[tokio::test]
async fn test_orders_are_listed_newest_first() {
    let store = store();

    let first = place_order(&store, &[macbook()]).await;
    store.send(StorefrontAction::ViewOrders).await.unwrap();
    let second = place_order(&store, &[case(), case()]).await;

    let ids = store
        .state(|s| s.orders.orders().map(|o| o.id.clone()).collect::<Vec<_>>())
        .await;
    assert_eq!(ids, vec![second, first]);

    let totals = store
        .state(|s| s.orders.orders().map(|o| o.total).collect::<Vec<_>>())
        .await;
    assert_eq!(totals, vec![Money::from_units(90), Money::from_units(1701)]);
}

#[tokio::test]
async fn test_placed_order_is_unaffected_by_later_cart_changes() {
    let store = store();
    let order_id = place_order(&store, &[macbook(), case(), case()]).await;
    let placed = store
        .state(|s| s.orders.get(&order_id).cloned())
        .await
        .unwrap();
    assert_eq!(placed.total, Money::from_units(1791));

    store.send(add(macbook())).await.unwrap();
    store.send(add(macbook())).await.unwrap();
    store
        .send(StorefrontAction::Cart(CartAction::UpdateQuantity {
            product_id: ProductId::new(1),
            quantity: 9,
        }))
        .await
        .unwrap();
    store
        .send(StorefrontAction::Cart(CartAction::ClearCart))
        .await
        .unwrap();

    let after = store
        .state(|s| s.orders.get(&order_id).cloned())
        .await
        .unwrap();
    assert_eq!(after, placed);
    assert_eq!(after.item_count(), 3);
}

#[tokio::test]
async fn test_empty_cart_checkout_only_offers_the_way_back() {
    let store = store();

    store.send(StorefrontAction::NavigateToCheckout).await.unwrap();
    assert_eq!(store.state(|s| s.screen.clone()).await, Screen::CheckoutEmpty);

    // No form on this screen
    store
        .send(StorefrontAction::SubmitCheckout(valid_details()))
        .await
        .unwrap();
    assert_eq!(store.state(|s| s.screen.clone()).await, Screen::CheckoutEmpty);

    store.send(StorefrontAction::StartShopping).await.unwrap();
    assert_eq!(store.state(|s| s.screen.clone()).await, Screen::Browsing);
}

#[tokio::test]
async fn test_removing_last_item_on_checkout_shows_empty_state() {
    let store = store();
    store.send(add(macbook())).await.unwrap();
    store.send(StorefrontAction::NavigateToCheckout).await.unwrap();

    store
        .send(StorefrontAction::Cart(CartAction::RemoveFromCart(ProductId::new(1))))
        .await
        .unwrap();

    let (empty, screen) = store.state(|s| (s.cart.is_empty(), s.screen.clone())).await;
    assert!(empty);
    assert_eq!(screen, Screen::CheckoutEmpty);

    // The form is gone until the customer shops again
    store
        .send(StorefrontAction::SubmitCheckout(valid_details()))
        .await
        .unwrap();
    assert_eq!(store.state(|s| s.screen.clone()).await, Screen::CheckoutEmpty);
}

#[tokio::test(start_paused = true)]
async fn test_notification_expires_after_ttl() {
    let store = store();
    store.send(add(macbook())).await.unwrap();
    assert!(store.is_running(NOTIFICATION_TIMER));

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert!(store.state(|s| s.notification.current().is_some()).await);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(store.state(|s| s.notification.current().is_none()).await);
    assert!(!store.is_running(NOTIFICATION_TIMER));
}

#[tokio::test(start_paused = true)]
async fn test_newer_notification_is_not_cleared_by_older_timer() {
    let store = store();
    let mut rx = store.subscribe_actions();

    store.send(add(macbook())).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    store.send(add(case())).await.unwrap();

    // The first timer would have fired at t=3s
    tokio::time::sleep(Duration::from_secs(2)).await;
    let message = store
        .state(|s| s.notification.current().map(|n| n.message.clone()))
        .await;
    assert_eq!(message.as_deref(), Some("Phone Case added to cart!"));

    // The second fires at t=5s
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(store.state(|s| s.notification.current().is_none()).await);

    // Exactly one expiry was ever applied
    let mut expiries = 0;
    while let Ok(action) = rx.try_recv() {
        if matches!(action, StorefrontAction::Notification(_)) {
            expiries += 1;
        }
    }
    assert_eq!(expiries, 1);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_stops_the_timer() {
    let store = store();
    store.send(add(macbook())).await.unwrap();
    store
        .send(StorefrontAction::Notification(NotificationAction::Dismiss))
        .await
        .unwrap();

    assert!(!store.is_running(NOTIFICATION_TIMER));
    assert!(store.state(|s| s.notification.current().is_none()).await);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_pending_expiry() {
    let store = store();
    store.send(add(macbook())).await.unwrap();

    assert_eq!(store.shutdown(), 1);
    assert!(store.send(add(case())).await.is_err());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(store.state(|s| s.notification.current().is_some()).await);
}
