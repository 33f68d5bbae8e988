//! # Catalogue Store
//!
//! In-memory product store: CRUD plus the low-stock query.
//!
//! ## Key Operations
//! - `add` assigns monotonically increasing ids
//! - `update` applies partial edits (and can switch stock tracking on/off)
//! - `apply_stock_delta` moves stock by a signed amount (sale −, refund +)
//! - `low_stock` returns tracked products running low
//!
//! The store has no side effects beyond its own map; atomicity with the
//! transaction log is the engine's job.

use std::collections::BTreeMap;

use tracing::debug;

use tillpoint_core::{NewProduct, Product, ProductUpdate};

/// In-memory product catalogue.
///
/// `BTreeMap` keeps listings in id order, which is also insertion order
/// since ids are assigned monotonically.
#[derive(Debug)]
pub struct CatalogueStore {
    products: BTreeMap<u64, Product>,
    next_id: u64,
}

/// Ids start at 1.
impl Default for CatalogueStore {
    fn default() -> Self {
        CatalogueStore::new()
    }
}

impl CatalogueStore {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        CatalogueStore {
            products: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Adds a product, assigning the next id.
    pub fn add(&mut self, new: NewProduct) -> Product {
        let id = self.next_id;
        self.next_id += 1;

        let product = Product {
            id,
            name: new.name,
            price: new.price,
            stock: new.stock,
        };

        debug!(id, name = %product.name, "Adding product");
        self.products.insert(id, product.clone());
        product
    }

    /// Applies a partial update. Returns the updated product, or `None` if
    /// the id is unknown.
    pub fn update(&mut self, id: u64, update: ProductUpdate) -> Option<Product> {
        let product = self.products.get_mut(&id)?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }

        debug!(id, "Updated product");
        Some(product.clone())
    }

    /// Removes a product. Returns whether anything was removed.
    ///
    /// Committed transactions keep their frozen snapshots, so history
    /// survives the delete.
    pub fn delete(&mut self, id: u64) -> bool {
        let removed = self.products.remove(&id).is_some();
        if removed {
            debug!(id, "Deleted product");
        }
        removed
    }

    /// Looks up a product by id.
    pub fn find_by_id(&self, id: u64) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Lists all products in id order.
    pub fn list(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Returns tracked products with `0 < stock <= threshold`.
    ///
    /// Untracked products never qualify; neither do products already at or
    /// below zero (those show up as oversells, not low stock).
    pub fn low_stock(&self, threshold: i64) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| matches!(p.stock, Some(s) if s > 0 && s <= threshold))
            .cloned()
            .collect()
    }

    /// Moves a tracked product's stock by `delta` (negative for sales,
    /// positive for refunds). Untracked products are left untouched.
    ///
    /// Returns the new stock level for tracked products.
    pub fn apply_stock_delta(&mut self, id: u64, delta: i64) -> Option<i64> {
        let product = self.products.get_mut(&id)?;
        let stock = product.stock.as_mut()?;
        *stock += delta;
        debug!(id, delta, stock = *stock, "Applied stock delta");
        Some(*stock)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
