//! Order submission
//!
//! Best-effort fan-out with partial-failure reporting: cart lines become
//! independent server calls, issued strictly sequentially. One line's
//! failure does not abort the rest; there is no rollback of
//! already-created orders, no idempotency key, and no retry.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use super::status::{ManagerApproval, OrderStatus};
use crate::{
    api::ApiClient,
    cart::{CartLine, CartStore},
    errors::{DashboardError, DashboardResult},
};

/// Order creation payload, one per cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Product display name.
    pub product:          String,
    /// Product ID.
    pub product_id:       String,
    /// Unit sale price in minor units.
    pub sale_price:       u64,
    /// Ordered quantity.
    pub order_count:      u32,
    /// Related device, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id:        Option<String>,
    /// Line total in minor units.
    pub total_price:      u64,
    /// Always `new_request` at creation.
    pub order_status:     OrderStatus,
    /// Pending when quantity exceeds the approval threshold, Default
    /// otherwise.
    pub manager_approval: ManagerApproval,
    /// Requested delivery date.
    pub delivery_date:    NaiveDate,
    /// Free-form remark.
    pub remark:           String,
}

impl OrderDraft {
    /// Builds the creation payload for one cart line.
    #[must_use]
    pub fn from_cart_line(line: &CartLine) -> Self {
        Self {
            product:          line.product_name.clone(),
            product_id:       line.product_id.clone(),
            sale_price:       line.unit_price,
            order_count:      line.order_count,
            device_id:        line.device_ref.clone(),
            total_price:      line.line_total,
            order_status:     OrderStatus::NewRequest,
            manager_approval: ManagerApproval::initial(line.approval_threshold, line.order_count),
            delivery_date:    line.delivery_date,
            remark:           line.remark.clone(),
        }
    }
}

/// Combined outcome of a cart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSummary {
    /// Lines attempted.
    pub attempted:       usize,
    /// Orders the server accepted.
    pub placed:          usize,
    /// Lines that failed.
    pub failed:          usize,
    /// Product names of the failed lines.
    pub failed_products: Vec<String>,
    /// Whether the cart and its persisted blob were cleared.
    pub cart_cleared:    bool,
}

impl SubmitSummary {
    /// One-line count summary, e.g. `"2/3 orders placed successfully"`.
    #[must_use]
    pub fn report(&self) -> String {
        format!("{}/{} orders placed successfully", self.placed, self.attempted)
    }

    /// Server-side inventory was decremented; the product list should be
    /// refetched.
    #[must_use]
    pub fn needs_inventory_refresh(&self) -> bool {
        self.placed > 0
    }
}

/// Submits every cart line as an independent order.
///
/// Rejects up front, with no network call, when the cart is empty or any
/// line's delivery date is in the past relative to local today. On at
/// least one success the cart and its persisted blob are cleared.
pub async fn submit_orders(
    client: &ApiClient, store: &mut CartStore,
) -> DashboardResult<SubmitSummary> {
    submit_orders_from(client, store, Local::now().date_naive()).await
}

/// [`submit_orders`] with an explicit "today", for deterministic tests.
pub async fn submit_orders_from(
    client: &ApiClient, store: &mut CartStore, today: NaiveDate,
) -> DashboardResult<SubmitSummary> {
    let cart = store.cart();
    if cart.is_empty() {
        return Err(DashboardError::CartEmpty);
    }
    for line in cart.lines() {
        if line.delivery_date < today {
            return Err(DashboardError::DeliveryDateInPast(line.delivery_date));
        }
    }

    let drafts: Vec<(String, OrderDraft)> = cart
        .lines()
        .iter()
        .map(|line| (line.product_name.clone(), OrderDraft::from_cart_line(line)))
        .collect();

    let mut summary = SubmitSummary {
        attempted:       drafts.len(),
        placed:          0,
        failed:          0,
        failed_products: Vec::new(),
        cart_cleared:    false,
    };

    // Each call starts only after the previous one resolved.
    for (product_name, draft) in &drafts {
        match client.create_order(draft).await {
            Ok(()) => summary.placed += 1,
            Err(err) => {
                warn!(product = %product_name, %err, "order placement failed");
                summary.failed += 1;
                summary.failed_products.push(product_name.clone());
            },
        }
    }

    if summary.placed > 0 {
        store.clear()?;
        summary.cart_cleared = true;
    }

    info!(
        placed = summary.placed,
        failed = summary.failed,
        "order submission finished"
    );
    Ok(summary)
}
