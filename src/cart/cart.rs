//! Shopping cart accumulator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item::CartLine;
use crate::{
    api::models::Product,
    errors::{DashboardError, DashboardResult},
};

/// Shopping cart: insertion-ordered lines plus a running total.
///
/// Validation failures reject the request without mutating the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: u64,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Cart-wide total (sum of line totals).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Parses a quantity form input; empty or non-numeric input is
    /// rejected before the cart is touched.
    pub fn parse_quantity(input: &str) -> DashboardResult<u32> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DashboardError::InvalidQuantity);
        }
        trimmed.parse::<u32>().map_err(|_| DashboardError::InvalidQuantity)
    }

    /// Adds a product to the cart.
    ///
    /// Merges by product ID: an existing line's quantity grows by the new
    /// amount, its total is recomputed, and its delivery date is
    /// overwritten to the latest value. Rejects without mutation when the
    /// quantity is zero, the merged quantity exceeds the product's
    /// current inventory ceiling, or no delivery date is chosen.
    pub fn add(
        &mut self, product: &Product, order_count: u32, delivery_date: Option<NaiveDate>,
        device_ref: Option<String>, remark: impl Into<String>,
    ) -> DashboardResult<()> {
        if order_count == 0 {
            return Err(DashboardError::InvalidQuantity);
        }
        let delivery_date = delivery_date.ok_or(DashboardError::DeliveryDateRequired)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let merged = line.order_count.saturating_add(order_count);
            if merged > product.po_balance {
                return Err(DashboardError::InsufficientInventory {
                    product_id: product.id.clone(),
                    available:  product.po_balance,
                    requested:  merged,
                });
            }
            line.inventory_ceiling = product.po_balance;
            line.delivery_date = delivery_date;
            line.set_quantity(merged);
        } else {
            if order_count > product.po_balance {
                return Err(DashboardError::InsufficientInventory {
                    product_id: product.id.clone(),
                    available:  product.po_balance,
                    requested:  order_count,
                });
            }
            self.lines.push(CartLine::from_product(
                product,
                order_count,
                delivery_date,
                device_ref,
                remark,
            ));
        }

        self.resum_total();
        Ok(())
    }

    /// Removes a line by index, returning it.
    pub fn remove(&mut self, index: usize) -> DashboardResult<CartLine> {
        if index >= self.lines.len() {
            return Err(DashboardError::LineNotFound(index));
        }
        let line = self.lines.remove(index);
        self.resum_total();
        Ok(line)
    }

    /// Edits a line's quantity, re-validated against its inventory
    /// ceiling. The cart total is adjusted by delta; equivalent to a full
    /// resummation.
    pub fn edit_quantity(&mut self, index: usize, order_count: u32) -> DashboardResult<()> {
        if order_count == 0 {
            return Err(DashboardError::InvalidQuantity);
        }
        let line = self
            .lines
            .get_mut(index)
            .ok_or(DashboardError::LineNotFound(index))?;
        if order_count > line.inventory_ceiling {
            return Err(DashboardError::InsufficientInventory {
                product_id: line.product_id.clone(),
                available:  line.inventory_ceiling,
                requested:  order_count,
            });
        }

        let old_total = line.line_total;
        line.set_quantity(order_count);
        self.total = self.total - old_total + line.line_total;
        Ok(())
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = 0;
    }

    fn resum_total(&mut self) {
        self.total = self.lines.iter().map(|l| l.line_total).sum();
    }
}
