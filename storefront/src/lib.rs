//! Storefront session logic.
//!
//! A customer browses products, fills a cart, submits shipping details and
//! payment, and ends up with a confirmed order in their history. This crate
//! models that session as reducers run by a [`storefront_runtime::Store`]:
//!
//! - [`cart`]: one line per product, derived totals
//! - [`notification`]: a single auto-expiring message
//! - [`checkout`] and [`payment`]: form validation
//! - [`orders`]: append-only order history
//! - [`lifecycle`]: the screen state machine tying them together
//!
//! # Quick Start
//!
//! ```no_run
//! use storefront::{
//!     catalog, CartAction, StorefrontAction, StorefrontConfig, StorefrontEnvironment,
//!     StorefrontReducer, StorefrontState,
//! };
//! use storefront_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = StorefrontEnvironment::production(StorefrontConfig::default());
//! let store = Store::new(StorefrontState::new(), StorefrontReducer::new(), env);
//!
//! let product = catalog::demo_catalog().remove(0);
//! store
//!     .send(StorefrontAction::Cart(CartAction::AddToCart(product)))
//!     .await?;
//!
//! let badge = store.state(StorefrontState::cart_badge).await;
//! println!("Cart: {badge}");
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod environment;
pub mod lifecycle;
pub mod notification;
pub mod orders;
pub mod payment;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use cart::{CartAction, CartLineItem, CartReducer, CartState};
pub use checkout::{CheckoutDetails, CheckoutField};
pub use config::{ConfigError, StorefrontConfig};
pub use environment::StorefrontEnvironment;
pub use lifecycle::{Screen, StorefrontAction, StorefrontReducer, StorefrontState};
pub use notification::{
    NOTIFICATION_TIMER, Notification, NotificationAction, NotificationKind, NotificationReducer,
    NotificationState,
};
pub use orders::{Order, OrderHistory, OrderId, OrderStatus};
pub use payment::{PaymentField, PaymentFields};
pub use types::{Money, Product, ProductId};
pub use validation::{FieldError, FieldErrors};
