//! Order Store: confirmed orders, newest first.

use crate::cart::CartLineItem;
use crate::checkout::CheckoutDetails;
use crate::types::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Opaque order identifier shown to the customer
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new `OrderId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfilment status
///
/// Orders are created `Pending`; later states are set by whatever fulfils
/// them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting fulfilment
    #[default]
    Pending,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Will not be fulfilled
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        })
    }
}

/// A confirmed purchase
///
/// Owns its line items outright, so later cart changes cannot reach it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier
    pub id: OrderId,
    /// Cart contents at confirmation
    pub items: Vec<CartLineItem>,
    /// Subtotal at confirmation
    pub total: Money,
    /// Fulfilment status
    pub status: OrderStatus,
    /// Confirmation time
    pub created_at: DateTime<Utc>,
    /// Shipping and contact details
    pub customer: CheckoutDetails,
    /// Billing country
    pub country: String,
}

impl Order {
    /// Total units across all line items
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Append-only order history, most recent first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistory {
    orders: VecDeque<Order>,
}

impl OrderHistory {
    /// Creates an empty history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Prepend an order
    pub fn add_order(&mut self, order: Order) {
        self.orders.push_front(order);
    }

    /// Orders, newest first
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Most recent order
    #[must_use]
    pub fn latest(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Order by id
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Whether an order with this id exists
    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.get(id).is_some()
    }

    /// Number of orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order has been placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductId};
    use storefront_core::environment::Clock;
    use storefront_testing::test_clock;

    fn order(id: &str, quantity: u32) -> Order {
        Order {
            id: OrderId::new(id),
            items: vec![CartLineItem {
                product: Product::new(ProductId::new(1), "MacBook Pro", Money::from_units(1701)),
                quantity,
            }],
            total: Money::from_units(1701) * quantity,
            status: OrderStatus::Pending,
            created_at: test_clock().now(),
            customer: CheckoutDetails::new("Ada", "ada@example.com"),
            country: "Türkiye".to_string(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = OrderHistory::new();
        history.add_order(order("O1", 1));
        history.add_order(order("O2", 1));

        let ids: Vec<&str> = history.orders().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["O2", "O1"]);
        assert_eq!(history.latest().unwrap().id.as_str(), "O2");
    }

    #[test]
    fn test_lookup() {
        let mut history = OrderHistory::new();
        history.add_order(order("O1", 3));

        assert!(history.contains(&OrderId::new("O1")));
        assert!(!history.contains(&OrderId::new("O9")));
        assert_eq!(history.get(&OrderId::new("O1")).unwrap().item_count(), 3);
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
    }
}
