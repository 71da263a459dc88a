//! In-memory collections for products and orders.
//!
//! Both stores are plain insertion-ordered `Vec`s living for the process
//! lifetime; callers provide whatever locking the surrounding runtime
//! needs. Validation of incoming field values happens here, so the wire
//! layer stays a thin translation of `StoreError` into status codes.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::id::IdGenerator;
use crate::order::{Order, OrderId};
use crate::product::{Product, ProductId};

/// Failure modes shared by both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The id does not resolve to a record.
    #[error("not found")]
    NotFound,
    /// A required field was absent, empty, or failed the positivity check.
    #[error("invalid input")]
    InvalidInput,
}

// ─── ProductStore ────────────────────────────────────────────────────────────

/// Ordered collection of catalog products.
pub struct ProductStore {
    items: Vec<Product>,
    ids: Arc<dyn IdGenerator>,
}

impl ProductStore {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            items: Vec::new(),
            ids,
        }
    }

    /// All products in insertion order.
    pub fn list(&self) -> &[Product] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Result<&Product, StoreError> {
        self.items
            .iter()
            .find(|p| p.id.0 == id)
            .ok_or(StoreError::NotFound)
    }

    /// Validates and appends a new product.
    ///
    /// `name` must be present and non-empty; `price` must be present and
    /// strictly positive.
    pub fn create(
        &mut self,
        name: Option<String>,
        price: Option<f64>,
    ) -> Result<Product, StoreError> {
        let name = name
            .filter(|n| !n.is_empty())
            .ok_or(StoreError::InvalidInput)?;
        let price = price.filter(|p| *p > 0.0).ok_or(StoreError::InvalidInput)?;

        let product = Product {
            id: ProductId(self.ids.generate()),
            name,
            price,
        };
        self.items.push(product.clone());
        Ok(product)
    }

    /// Applies the supplied fields to an existing product.
    ///
    /// Field semantics match the wire contract: an empty `name` and a zero
    /// `price` are ignored, and a negative `price` is accepted as-is — the
    /// create-time positivity check is deliberately not repeated here.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<String>,
        price: Option<f64>,
    ) -> Result<Product, StoreError> {
        let product = self
            .items
            .iter_mut()
            .find(|p| p.id.0 == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = name {
            if !name.is_empty() {
                product.name = name;
            }
        }
        if let Some(price) = price {
            if price != 0.0 {
                product.price = price;
            }
        }
        Ok(product.clone())
    }

    /// Removes the product if present. Deleting an unknown id is a no-op;
    /// callers are not told whether anything was removed.
    pub fn delete(&mut self, id: &str) {
        self.items.retain(|p| p.id.0 != id);
    }
}

// ─── OrderStore ──────────────────────────────────────────────────────────────

/// Ordered collection of placed orders.
pub struct OrderStore {
    items: Vec<Order>,
    ids: Arc<dyn IdGenerator>,
}

impl OrderStore {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            items: Vec::new(),
            ids,
        }
    }

    /// All orders in insertion order.
    pub fn list(&self) -> &[Order] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Result<&Order, StoreError> {
        self.items
            .iter()
            .find(|o| o.id.0 == id)
            .ok_or(StoreError::NotFound)
    }

    /// Places an order for `quantity` units of `product`.
    ///
    /// The caller resolves the product (this store never touches the
    /// catalog) and hands it in by value; the order keeps that snapshot,
    /// so later catalog edits cannot change `product` or `total`.
    pub fn create(&mut self, product: Product, quantity: Option<i64>) -> Result<Order, StoreError> {
        let quantity = match quantity {
            Some(q) if q > 0 => q as u64,
            _ => return Err(StoreError::InvalidInput),
        };

        let order = Order {
            id: OrderId(self.ids.generate()),
            total: product.price * quantity as f64,
            product,
            quantity,
            created_at: Utc::now(),
        };
        self.items.push(order.clone());
        Ok(order)
    }

    /// Removes the order if present; no-op for unknown ids.
    pub fn delete(&mut self, id: &str) {
        self.items.retain(|o| o.id.0 != id);
    }
}
