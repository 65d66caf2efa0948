//! Shopping cart
//!
//! Merge-by-product accumulator with a running total, persisted to a
//! versioned local blob after every mutation.

mod cart;
mod item;
mod storage;

pub use cart::Cart;
pub use item::CartLine;
pub use storage::CartStore;

#[cfg(test)]
pub(crate) fn test_product(id: &str, sale_price: u64, po_balance: u32) -> crate::api::models::Product {
    crate::api::models::Product {
        id:                 id.to_string(),
        name:               format!("Product {}", id),
        sku_number:         format!("SKU-{}", id),
        sale_price,
        po_balance,
        approval_threshold: 5,
        category_id:        None,
        company_id:         None,
        image:              None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::errors::DashboardError;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().expect("date"))
    }

    #[test]
    fn test_add_same_product_merges_quantities() {
        let mut cart = Cart::new();
        let product = test_product("A", 10, 100);

        cart.add(&product, 2, date("2099-01-15"), None, "").expect("first add");
        cart.add(&product, 3, date("2099-02-01"), None, "").expect("second add");

        assert_eq!(cart.len(), 1);
        let line = &cart.lines()[0];
        assert_eq!(line.order_count, 5);
        assert_eq!(line.line_total, 50);
        assert_eq!(cart.total(), 50);
    }

    #[test]
    fn test_merge_overwrites_delivery_date_to_latest() {
        let mut cart = Cart::new();
        let product = test_product("A", 10, 100);

        cart.add(&product, 2, date("2099-01-15"), None, "").expect("first add");
        cart.add(&product, 1, date("2099-03-01"), None, "").expect("second add");

        assert_eq!(
            cart.lines()[0].delivery_date,
            "2099-03-01".parse::<NaiveDate>().expect("date")
        );
    }

    #[test]
    fn test_add_over_ceiling_rejected_cart_unchanged() {
        let mut cart = Cart::new();
        let product = test_product("A", 10, 4);
        cart.add(&product, 3, date("2099-01-15"), None, "").expect("add");

        let err = cart.add(&product, 2, date("2099-01-15"), None, "").unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InsufficientInventory { available: 4, requested: 5, .. }
        ));
        assert_eq!(cart.lines()[0].order_count, 3);
        assert_eq!(cart.total(), 30);
    }

    #[test]
    fn test_add_zero_quantity_rejected() {
        let mut cart = Cart::new();
        let err = cart
            .add(&test_product("A", 10, 100), 0, date("2099-01-15"), None, "")
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_without_delivery_date_rejected() {
        let mut cart = Cart::new();
        let err = cart.add(&test_product("A", 10, 100), 2, None, None, "").unwrap_err();
        assert!(matches!(err, DashboardError::DeliveryDateRequired));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_reduces_total_by_line_total() {
        let mut cart = Cart::new();
        cart.add(&test_product("A", 10, 100), 2, date("2099-01-15"), None, "").expect("a");
        cart.add(&test_product("B", 7, 100), 3, date("2099-01-15"), None, "").expect("b");
        assert_eq!(cart.total(), 41);

        let removed = cart.remove(1).expect("remove");
        assert_eq!(removed.line_total, 21);
        assert_eq!(cart.total(), 20);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut cart = Cart::new();
        assert!(matches!(cart.remove(0), Err(DashboardError::LineNotFound(0))));
    }

    #[test]
    fn test_edit_quantity_delta_matches_resummation() {
        let mut cart = Cart::new();
        cart.add(&test_product("A", 10, 100), 2, date("2099-01-15"), None, "").expect("a");
        cart.add(&test_product("B", 7, 100), 3, date("2099-01-15"), None, "").expect("b");

        cart.edit_quantity(0, 6).expect("edit");

        let resummed: u64 = cart.lines().iter().map(|l| l.line_total).sum();
        assert_eq!(cart.total(), resummed);
        assert_eq!(cart.total(), 81);
        assert_eq!(cart.lines()[0].line_total, 60);
    }

    #[test]
    fn test_edit_quantity_revalidates_ceiling() {
        let mut cart = Cart::new();
        cart.add(&test_product("A", 10, 4), 2, date("2099-01-15"), None, "").expect("add");

        let err = cart.edit_quantity(0, 9).unwrap_err();
        assert!(matches!(err, DashboardError::InsufficientInventory { .. }));
        assert_eq!(cart.lines()[0].order_count, 2);
        assert_eq!(cart.total(), 20);
    }

    #[test]
    fn test_line_total_invariant_holds_after_mutations() {
        let mut cart = Cart::new();
        let product = test_product("A", 13, 100);
        cart.add(&product, 2, date("2099-01-15"), None, "").expect("add");
        cart.add(&product, 4, date("2099-01-15"), None, "").expect("merge");
        cart.edit_quantity(0, 3).expect("edit");

        for line in cart.lines() {
            assert_eq!(line.line_total, line.unit_price * u64::from(line.order_count));
        }
    }

    #[test]
    fn test_parse_quantity_rejects_empty_and_non_numeric() {
        assert!(matches!(Cart::parse_quantity(""), Err(DashboardError::InvalidQuantity)));
        assert!(matches!(Cart::parse_quantity("  "), Err(DashboardError::InvalidQuantity)));
        assert!(matches!(Cart::parse_quantity("abc"), Err(DashboardError::InvalidQuantity)));
        assert_eq!(Cart::parse_quantity(" 7 ").expect("parse"), 7);
    }

    #[test]
    fn test_approval_flag_follows_threshold() {
        let mut cart = Cart::new();
        // threshold is 5 in the test product
        cart.add(&test_product("A", 10, 100), 5, date("2099-01-15"), None, "").expect("add");
        assert!(!cart.lines()[0].needs_manager_approval());

        cart.edit_quantity(0, 6).expect("edit");
        assert!(cart.lines()[0].needs_manager_approval());
    }
}
