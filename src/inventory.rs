//! Product and inventory input for a forecast run.
//!
//! Built once per interaction and never mutated; the total product quantity
//! is the inventory delta applied on every forecast step.

use serde::{Deserialize, Serialize};

use crate::config::MAX_PRODUCTS;
use crate::error::{ForecastError, Result};

// ---------------------------------------------------------------------------
// ProductEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    name: String,
    price: f64,
    quantity: u64,
}

impl ProductEntry {
    /// Validate and create an entry. The name must be non-empty and the
    /// price a finite, non-negative number.
    pub fn new(name: impl Into<String>, price: f64, quantity: u64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ForecastError::InvalidArgument(
                "product name must not be empty".to_string(),
            ));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(ForecastError::InvalidArgument(format!(
                "price of '{}' must be a non-negative number, got {}",
                name, price
            )));
        }
        Ok(Self {
            name,
            price,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn total_value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

// ---------------------------------------------------------------------------
// InventoryInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryInput {
    max_capacity: f64,
    products: Vec<ProductEntry>,
}

impl InventoryInput {
    /// Between one and [`MAX_PRODUCTS`] products against a non-negative
    /// capacity.
    pub fn new(max_capacity: f64, products: Vec<ProductEntry>) -> Result<Self> {
        if products.is_empty() || products.len() > MAX_PRODUCTS {
            return Err(ForecastError::InvalidArgument(format!(
                "expected 1 to {} products, got {}",
                MAX_PRODUCTS,
                products.len()
            )));
        }
        if !max_capacity.is_finite() || max_capacity < 0.0 {
            return Err(ForecastError::InvalidArgument(format!(
                "capacity must be a non-negative number, got {}",
                max_capacity
            )));
        }
        Ok(Self {
            max_capacity,
            products,
        })
    }

    pub fn max_capacity(&self) -> f64 {
        self.max_capacity
    }

    pub fn products(&self) -> &[ProductEntry] {
        &self.products
    }

    /// Sum of all product quantities; the forecaster's inventory delta.
    pub fn total_quantity(&self) -> u64 {
        self.products.iter().map(ProductEntry::quantity).sum()
    }

    pub fn total_value(&self) -> f64 {
        self.products.iter().map(ProductEntry::total_value).sum()
    }

    /// Total product value as a percentage of capacity; 0 when capacity is 0.
    pub fn capacity_usage_pct(&self) -> f64 {
        if self.max_capacity == 0.0 {
            0.0
        } else {
            self.total_value() / self.max_capacity * 100.0
        }
    }
}

// ---------------------------------------------------------------------------
// ForecastRequest
// ---------------------------------------------------------------------------

/// Everything one forecast run needs from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub horizon: usize,
    pub inventory_delta: f64,
}

impl ForecastRequest {
    pub fn new(horizon: usize, inventory_delta: f64) -> Self {
        Self {
            horizon,
            inventory_delta,
        }
    }

    /// Use the total product quantity of `inventory` as the delta.
    pub fn from_inventory(horizon: usize, inventory: &InventoryInput) -> Self {
        Self::new(horizon, inventory.total_quantity() as f64)
    }
}
