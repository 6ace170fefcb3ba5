//! A small fixed catalog for the demo binary and tests.
//!
//! Real sessions receive products from the catalog service.

use crate::types::{Money, Product, ProductId};

/// Products in display order
#[must_use]
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new(ProductId::new(1), "MacBook Pro", Money::from_units(1701))
            .with_category("laptops")
            .with_image("https://cdn.dummyjson.com/product-images/6/thumbnail.png"),
        Product::new(ProductId::new(2), "iPhone 9", Money::from_units(549))
            .with_category("smartphones")
            .with_image("https://cdn.dummyjson.com/product-images/1/thumbnail.jpg"),
        Product::new(ProductId::new(3), "Phone Case", Money::from_units(45))
            .with_category("accessories"),
        Product::new(ProductId::new(4), "Samsung Universe 9", Money::from_units(1249))
            .with_category("smartphones"),
    ]
}

/// Look up a demo product
#[must_use]
pub fn find(id: ProductId) -> Option<Product> {
    demo_catalog().into_iter().find(|product| product.id == id)
}
