//! Cart Store.
//!
//! Holds one line item per product, in the order products were first added.
//! Totals are derived on every read. The reducer never fails: unknown ids and
//! quantities below one are absorbed as no-ops.

use crate::types::{Money, Product, ProductId};
use serde::{Deserialize, Serialize};
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer};

/// One product with a quantity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product snapshot taken when first added
    pub product: Product,
    /// Always at least 1
    pub quantity: u32,
}

impl CartLineItem {
    /// Price × quantity
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// Line items in first-added order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartLineItem>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Independent copy of the line items
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.items.clone()
    }

    /// Sum of quantities
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Whether the cart has no line items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Line item for a product, if present
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    /// Quantity held for a product (0 when absent)
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.line(id).map_or(0, |item| item.quantity)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.product.id == id)
    }
}

/// Cart mutations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartAction {
    /// Add one unit, merging with an existing line
    AddToCart(Product),
    /// Drop the line for a product
    RemoveFromCart(ProductId),
    /// Set a line's quantity exactly; below 1 is ignored
    UpdateQuantity {
        /// Line to change
        product_id: ProductId,
        /// New quantity
        quantity: u32,
    },
    /// Add one unit to an existing line
    IncrementQuantity(ProductId),
    /// Remove one unit from an existing line, never below 1
    DecrementQuantity(ProductId),
    /// Empty the cart
    ClearCart,
}

/// Reducer for the Cart Store
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn set_quantity(state: &mut CartState, product_id: ProductId, quantity: u32) {
        if quantity < 1 {
            tracing::debug!(%product_id, "Ignoring quantity below 1");
            return;
        }

        match state.line_mut(product_id) {
            Some(line) => line.quantity = quantity,
            None => {
                tracing::debug!(%product_id, "Ignoring quantity update for product not in cart");
            },
        }
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::AddToCart(product) => {
                metrics::counter!("storefront_cart_items_added_total").increment(1);

                if let Some(line) = state.line_mut(product.id) {
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    state.items.push(CartLineItem {
                        product,
                        quantity: 1,
                    });
                }
            },
            CartAction::RemoveFromCart(product_id) => {
                state.items.retain(|item| item.product.id != product_id);
            },
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => Self::set_quantity(state, product_id, quantity),
            CartAction::IncrementQuantity(product_id) => {
                let next = state.quantity_of(product_id).saturating_add(1);
                Self::set_quantity(state, product_id, next);
            },
            CartAction::DecrementQuantity(product_id) => {
                let next = state.quantity_of(product_id).saturating_sub(1);
                Self::set_quantity(state, product_id, next);
            },
            CartAction::ClearCart => state.items.clear(),
        }

        SmallVec::new()
    }
}
