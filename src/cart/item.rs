//! Cart line type definition

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::models::Product;

/// Line in the shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID.
    pub product_id:         String,
    /// Product name (cached for display).
    pub product_name:       String,
    /// Product SKU (cached).
    pub sku_number:         String,
    /// Ordered quantity.
    pub order_count:        u32,
    /// Unit price at time of adding, in minor units.
    pub unit_price:         u64,
    /// Line total. Invariant: `line_total == unit_price * order_count`.
    pub line_total:         u64,
    /// Inventory ceiling (PO balance) at time of adding.
    pub inventory_ceiling:  u32,
    /// Related device, if ordering for one.
    pub device_ref:         Option<String>,
    /// Quantity above which manager approval is required.
    pub approval_threshold: u32,
    /// Requested delivery date; overwritten to the latest value on merge.
    pub delivery_date:      NaiveDate,
    /// Free-form remark.
    pub remark:             String,
}

impl CartLine {
    /// Creates a cart line from a product.
    #[must_use]
    pub fn from_product(
        product: &Product, order_count: u32, delivery_date: NaiveDate,
        device_ref: Option<String>, remark: impl Into<String>,
    ) -> Self {
        let mut line = Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            sku_number: product.sku_number.clone(),
            order_count,
            unit_price: product.sale_price,
            line_total: 0,
            inventory_ceiling: product.po_balance,
            device_ref,
            approval_threshold: product.approval_threshold,
            delivery_date,
            remark: remark.into(),
        };
        line.recompute_total();
        line
    }

    /// Restores the line-total invariant after a quantity change.
    pub fn recompute_total(&mut self) {
        self.line_total = self.unit_price * u64::from(self.order_count);
    }

    /// Updates quantity and the line total.
    pub fn set_quantity(&mut self, order_count: u32) {
        self.order_count = order_count;
        self.recompute_total();
    }

    /// Whether this line needs manager approval at order creation.
    #[must_use]
    pub fn needs_manager_approval(&self) -> bool {
        self.approval_threshold < self.order_count
    }
}
