//! The storefront session: cart, notifications, forms and orders composed
//! into one state machine.
//!
//! ```text
//! Browsing ──navigate──▶ Checkout ──valid details──▶ Payment ──valid payment──▶ Confirmed
//!    ▲          │ (empty cart)                                                      │
//!    │          ▼                                                                   │
//!    └──── CheckoutEmpty ◀── start shopping                 view orders ────────────┘
//! ```
//!
//! Cart actions are accepted on every screen. Anything else that does not
//! apply to the current screen is absorbed.

use crate::cart::{CartAction, CartLineItem, CartReducer, CartState};
use crate::checkout::{CheckoutDetails, CheckoutField};
use crate::environment::StorefrontEnvironment;
use crate::notification::{NotificationAction, NotificationReducer, NotificationState};
use crate::orders::{Order, OrderHistory, OrderId, OrderStatus};
use crate::payment::{PaymentField, PaymentFields};
use crate::types::Money;
use crate::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use storefront_core::{
    SmallVec, async_effect,
    composition::{ScopedReducer, scope_reducer},
    effect::Effect,
    reducer::Reducer,
};

/// What the customer is looking at
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Product list
    #[default]
    Browsing,
    /// Checkout with nothing in the cart; only a way back
    CheckoutEmpty,
    /// Checkout form
    Checkout {
        /// Errors from the last submission
        errors: FieldErrors<CheckoutField>,
    },
    /// Payment form
    Payment {
        /// Details handed over by checkout
        details: CheckoutDetails,
        /// Cart as it was at hand-over, for the summary
        cart: Vec<CartLineItem>,
        /// Errors from the last submission
        errors: FieldErrors<PaymentField>,
    },
    /// Order placed
    Confirmed {
        /// Identifier to show
        order_id: OrderId,
    },
}

impl Screen {
    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::CheckoutEmpty => "checkout_empty",
            Self::Checkout { .. } => "checkout",
            Self::Payment { .. } => "payment",
            Self::Confirmed { .. } => "confirmed",
        }
    }
}

/// Session state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontState {
    /// Cart Store
    pub cart: CartState,
    /// Notification Channel
    pub notification: NotificationState,
    /// Order Store
    pub orders: OrderHistory,
    /// Current screen
    pub screen: Screen,
}

impl StorefrontState {
    /// Empty cart, no orders, browsing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count shown on the cart badge
    #[must_use]
    pub fn cart_badge(&self) -> u64 {
        self.cart.total_items()
    }

    /// Cart subtotal
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// Whether navigating to checkout shows the form
    #[must_use]
    pub fn is_checkout_available(&self) -> bool {
        !self.cart.is_empty()
    }
}

/// Everything that can happen in a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorefrontAction {
    /// Cart mutation
    Cart(CartAction),
    /// Notification input
    Notification(NotificationAction),
    /// Open checkout
    NavigateToCheckout,
    /// Leave checkout for the product list
    StartShopping,
    /// Submit the checkout form
    SubmitCheckout(CheckoutDetails),
    /// Submit the payment form
    SubmitPayment(PaymentFields),
    /// Leave the confirmation for the product list
    ViewOrders,
    /// An order was placed; no state change
    OrderPlaced {
        /// New order
        order_id: OrderId,
        /// Its total
        total: Money,
    },
}

type CartScope = ScopedReducer<StorefrontState, StorefrontAction, StorefrontEnvironment, CartReducer>;
type NotificationScope =
    ScopedReducer<StorefrontState, StorefrontAction, StorefrontEnvironment, NotificationReducer>;

/// Root reducer for a storefront session
pub struct StorefrontReducer {
    cart: CartScope,
    notification: NotificationScope,
}

impl StorefrontReducer {
    /// Creates a new `StorefrontReducer`
    #[must_use]
    pub fn new() -> Self {
        Self {
            cart: scope_reducer(
                CartReducer::new(),
                |state: &mut StorefrontState| &mut state.cart,
                |action: StorefrontAction| match action {
                    StorefrontAction::Cart(action) => Some(action),
                    _ => None,
                },
                StorefrontAction::Cart,
                |_: &StorefrontEnvironment| &(),
            ),
            notification: scope_reducer(
                NotificationReducer::new(),
                |state: &mut StorefrontState| &mut state.notification,
                |action: StorefrontAction| match action {
                    StorefrontAction::Notification(action) => Some(action),
                    _ => None,
                },
                StorefrontAction::Notification,
                |env: &StorefrontEnvironment| &env.config,
            ),
        }
    }

    fn on_cart(
        &self,
        state: &mut StorefrontState,
        action: CartAction,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        let added = match &action {
            CartAction::AddToCart(product) => Some(format!("{} added to cart!", product.title)),
            _ => None,
        };

        let mut effects = self.cart.reduce_child(state, action, env);
        if state.cart.is_empty() && matches!(state.screen, Screen::Checkout { .. }) {
            tracing::debug!("Cart emptied during checkout");
            state.screen = Screen::CheckoutEmpty;
        }
        if let Some(message) = added {
            effects.extend(self.notification.reduce_child(
                state,
                NotificationAction::success(message),
                env,
            ));
        }
        effects
    }

    fn submit_checkout(state: &mut StorefrontState, details: CheckoutDetails) {
        if !matches!(state.screen, Screen::Checkout { .. }) {
            tracing::debug!(screen = state.screen.name(), "Ignoring checkout submission");
            return;
        }

        if state.cart.is_empty() {
            state.screen = Screen::CheckoutEmpty;
            return;
        }

        let details = details.normalized();
        let errors = details.validate();
        if errors.is_empty() {
            state.screen = Screen::Payment {
                details,
                cart: state.cart.snapshot(),
                errors: FieldErrors::new(),
            };
        } else {
            metrics::counter!("storefront_validation_failures_total", "form" => "checkout")
                .increment(1);
            tracing::debug!(rejected = errors.len(), "Checkout details rejected");
            state.screen = Screen::Checkout { errors };
        }
    }

    fn submit_payment(
        &self,
        state: &mut StorefrontState,
        fields: PaymentFields,
        env: &StorefrontEnvironment,
    ) -> SmallVec<[Effect<StorefrontAction>; 4]> {
        let Screen::Payment { details, .. } = &state.screen else {
            tracing::debug!(screen = state.screen.name(), "Ignoring payment submission");
            return SmallVec::new();
        };
        let customer = details.clone();

        let errors = fields.validate();
        if !errors.is_empty() {
            metrics::counter!("storefront_validation_failures_total", "form" => "payment")
                .increment(1);
            tracing::debug!(rejected = errors.len(), "Payment rejected");
            if let Screen::Payment { errors: shown, .. } = &mut state.screen {
                *shown = errors;
            }
            return SmallVec::new();
        }

        if state.cart.is_empty() {
            state.screen = Screen::CheckoutEmpty;
            return self
                .notification
                .reduce_child(state, NotificationAction::error("Your cart is empty"), env);
        }

        // Validation passed: everything below is one commit
        let order = Order {
            id: next_order_id(&state.orders, env),
            items: state.cart.snapshot(),
            total: state.cart.subtotal(),
            status: OrderStatus::Pending,
            created_at: env.clock.now(),
            customer,
            country: fields.country.trim().to_string(),
        };
        let order_id = order.id.clone();
        let total = order.total;

        state.orders.add_order(order);
        let mut effects = self.cart.reduce_child(state, CartAction::ClearCart, env);
        state.screen = Screen::Confirmed {
            order_id: order_id.clone(),
        };

        metrics::counter!("storefront_orders_placed_total").increment(1);
        tracing::info!(%order_id, %total, "Order placed");

        effects.push(async_effect! {
            Some(StorefrontAction::OrderPlaced { order_id, total })
        });
        effects
    }
}

impl Default for StorefrontReducer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw ids until one is not already in the history.
///
/// After `id_retry_limit` repeats the last draw is suffixed with a counter.
fn next_order_id(orders: &OrderHistory, env: &StorefrontEnvironment) -> OrderId {
    let mut candidate = OrderId::new(env.ids.next_id());
    for _ in 0..env.config.id_retry_limit {
        if !orders.contains(&candidate) {
            return candidate;
        }
        tracing::warn!(%candidate, "Generated order id already used, drawing again");
        candidate = OrderId::new(env.ids.next_id());
    }

    let base = candidate;
    let mut suffix = 1_u32;
    let mut candidate = base.clone();
    while orders.contains(&candidate) {
        suffix += 1;
        candidate = OrderId::new(format!("{base}-{suffix}"));
    }
    candidate
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            StorefrontAction::Cart(action) => self.on_cart(state, action, env),

            action @ StorefrontAction::Notification(_) => {
                self.notification.reduce(state, action, env)
            },

            StorefrontAction::NavigateToCheckout => {
                state.screen = if state.is_checkout_available() {
                    Screen::Checkout {
                        errors: FieldErrors::new(),
                    }
                } else {
                    Screen::CheckoutEmpty
                };
                SmallVec::new()
            },

            StorefrontAction::StartShopping => {
                if matches!(state.screen, Screen::CheckoutEmpty | Screen::Checkout { .. }) {
                    state.screen = Screen::Browsing;
                } else {
                    tracing::debug!(screen = state.screen.name(), "Ignoring start shopping");
                }
                SmallVec::new()
            },

            StorefrontAction::SubmitCheckout(details) => {
                Self::submit_checkout(state, details);
                SmallVec::new()
            },

            StorefrontAction::SubmitPayment(fields) => self.submit_payment(state, fields, env),

            StorefrontAction::ViewOrders => {
                if matches!(state.screen, Screen::Confirmed { .. }) {
                    state.screen = Screen::Browsing;
                } else {
                    tracing::debug!(screen = state.screen.name(), "Ignoring view orders");
                }
                SmallVec::new()
            },

            StorefrontAction::OrderPlaced { .. } => SmallVec::new(),
        }
    }
}
