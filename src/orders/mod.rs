//! Order workflow
//!
//! Status normalization and role-gated actions, the submission fan-out,
//! and per-status counting for the summary pages.

mod status;
mod submit;
mod summary;

pub use status::{ManagerApproval, OrderAction, OrderStatus};
pub use submit::{submit_orders, submit_orders_from, OrderDraft, SubmitSummary};
pub use summary::{filter_by_status, OrderSummary};

#[cfg(test)]
pub(crate) fn test_order(id: &str, status: OrderStatus) -> crate::api::models::OrderRecord {
    crate::api::models::OrderRecord {
        id:               id.to_string(),
        product:          "Product A".to_string(),
        product_id:       Some("A".to_string()),
        sale_price:       10,
        order_count:      2,
        device_id:        None,
        total_price:      20,
        order_status:     status,
        manager_approval: ManagerApproval::Default,
        delivery_date:    "2099-01-15".parse().expect("date"),
        remark:           String::new(),
        user_id:          Some("u1".to_string()),
        company_id:       Some("c1".to_string()),
    }
}
