//! Per-status order counts
//!
//! The Home and Summary pages count orders per status bucket. Alias
//! normalization happens at decode time, so both historical in-progress
//! tags land in one bucket here.

use super::status::OrderStatus;
use crate::api::models::OrderRecord;

/// Per-status counts over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSummary {
    /// New requests.
    pub new_request: usize,
    /// Confirmed orders.
    pub confirmed:   usize,
    /// In-progress orders (both historical tags).
    pub in_progress: usize,
    /// Delivered orders.
    pub delivered:   usize,
    /// Rejected/cancelled orders.
    pub rejected:    usize,
}

impl OrderSummary {
    /// Counts orders per status bucket.
    #[must_use]
    pub fn count(orders: &[OrderRecord]) -> Self {
        let mut summary = Self::default();
        for order in orders {
            match order.order_status {
                OrderStatus::NewRequest => summary.new_request += 1,
                OrderStatus::Confirmed => summary.confirmed += 1,
                OrderStatus::InProgress => summary.in_progress += 1,
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Rejected => summary.rejected += 1,
            }
        }
        summary
    }

    /// Total number of orders counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.new_request + self.confirmed + self.in_progress + self.delivered + self.rejected
    }
}

/// Filters orders by status bucket.
#[must_use]
pub fn filter_by_status(orders: &[OrderRecord], status: OrderStatus) -> Vec<&OrderRecord> {
    orders.iter().filter(|o| o.order_status == status).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::test_order;

    #[test]
    fn test_both_in_progress_tags_count_as_one_bucket() {
        let raw = serde_json::json!({ "orders": [
            order_json("o1", "order_processing"),
            order_json("o2", "order_in_progress"),
            order_json("o3", "new_request"),
            order_json("o4", "order_cancel"),
        ]});
        #[derive(serde::Deserialize)]
        struct Payload {
            orders: Vec<OrderRecord>,
        }
        let payload: Payload = serde_json::from_value(raw).expect("decode");

        let summary = OrderSummary::count(&payload.orders);
        assert_eq!(summary.in_progress, 2);
        assert_eq!(summary.new_request, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.total(), 4);

        let in_progress = filter_by_status(&payload.orders, OrderStatus::InProgress);
        assert_eq!(in_progress.len(), 2);
    }

    #[test]
    fn test_counts_over_constructed_orders() {
        let orders = vec![
            test_order("o1", OrderStatus::Delivered),
            test_order("o2", OrderStatus::Delivered),
            test_order("o3", OrderStatus::NewRequest),
        ];
        let summary = OrderSummary::count(&orders);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.new_request, 1);
        assert_eq!(summary.total(), 3);
    }

    fn order_json(id: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "_id": id,
            "product": "Product A",
            "salePrice": 10,
            "orderCount": 2,
            "totalPrice": 20,
            "orderStatus": status,
            "deliveryDate": "2099-01-15"
        })
    }
}
