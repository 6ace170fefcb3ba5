//! Storefront demo binary
//!
//! Walks one customer from an empty cart to a confirmed order.

use storefront::{
    CartAction, CheckoutDetails, PaymentFields, Screen, StorefrontAction, StorefrontConfig,
    StorefrontEnvironment, StorefrontReducer, StorefrontState, catalog, types::ProductId,
};
use storefront_runtime::{Store, metrics::MetricsRecorder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type StorefrontStore =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,storefront_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let recorder = MetricsRecorder::install()?;
    let config = StorefrontConfig::from_env()?;
    let currency = config.currency_symbol.clone();

    println!("=== Storefront Session ===\n");

    let store = Store::new(
        StorefrontState::new(),
        StorefrontReducer::new(),
        StorefrontEnvironment::production(config),
    );

    // Views re-render on every applied action
    let mut actions = store.subscribe_actions();
    tokio::spawn(async move {
        while let Ok(action) = actions.recv().await {
            tracing::debug!(?action, "View refresh");
        }
    });

    let macbook = catalog::find(ProductId::new(1))
        .ok_or_else(|| anyhow::anyhow!("demo catalog has no product 1"))?;

    println!(">>> Add {} to cart", macbook.title);
    store
        .send(StorefrontAction::Cart(CartAction::AddToCart(macbook)))
        .await?;
    print_cart(&store, &currency).await;
    if let Some(note) = store.state(|s| s.notification.current().cloned()).await {
        println!("Notification: {}", note.message);
    }

    println!("\n>>> Go to checkout");
    store.send(StorefrontAction::NavigateToCheckout).await?;
    print_screen(&store).await;

    println!("\n>>> Submit checkout without a name");
    store
        .send(StorefrontAction::SubmitCheckout(CheckoutDetails::new(
            "",
            "ada@example.com",
        )))
        .await?;
    print_screen(&store).await;

    println!("\n>>> Submit checkout with valid details");
    store
        .send(StorefrontAction::SubmitCheckout(
            CheckoutDetails::new("Ada Lovelace", "ada@example.com").with_address("Istanbul"),
        ))
        .await?;
    print_screen(&store).await;

    println!("\n>>> Submit payment without a card number");
    store
        .send(StorefrontAction::SubmitPayment(PaymentFields::new(
            "", "12/27", "123",
        )))
        .await?;
    print_screen(&store).await;

    println!("\n>>> Submit payment");
    let mut handle = store
        .send(StorefrontAction::SubmitPayment(PaymentFields::new(
            "4242 4242 4242 4242",
            "12/27",
            "123",
        )))
        .await?;
    handle.wait().await;
    print_screen(&store).await;
    print_cart(&store, &currency).await;

    println!("\n>>> View orders");
    store.send(StorefrontAction::ViewOrders).await?;
    let orders = store
        .state(|s| {
            s.orders
                .orders()
                .map(|o| format!("{} {} {}", o.id, o.total.display_with(&currency), o.status))
                .collect::<Vec<_>>()
        })
        .await;
    for line in orders {
        println!("Order {line}");
    }

    let aborted = store.shutdown();
    println!("\nSession closed ({aborted} timer(s) aborted)");

    if let Some(rendered) = recorder.render() {
        println!("\n=== Metrics ===\n{rendered}");
    }

    Ok(())
}

async fn print_cart(store: &StorefrontStore, currency: &str) {
    let (badge, subtotal) = store.state(|s| (s.cart_badge(), s.subtotal())).await;
    println!("Cart: {badge} item(s), subtotal {}", subtotal.display_with(currency));
}

async fn print_screen(store: &StorefrontStore) {
    let screen = store.state(|s| s.screen.clone()).await;
    match screen {
        Screen::Checkout { errors } if !errors.is_empty() => {
            for (field, error) in errors.iter() {
                println!("Checkout: {field:?}: {error}");
            }
        },
        Screen::Payment { errors, .. } if !errors.is_empty() => {
            for (field, error) in errors.iter() {
                println!("Payment: {field:?}: {error}");
            }
        },
        Screen::Confirmed { order_id } => println!("Order confirmed: {order_id}"),
        other => println!("Screen: {}", other.name()),
    }
}
