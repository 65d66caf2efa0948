//! Durable cart persistence
//!
//! The cart and its total are written to a versioned JSON blob as a side
//! effect of every successful mutation and rehydrated on load. Rejected
//! mutations leave both the cart and the blob untouched.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{cart::Cart, item::CartLine};
use crate::{
    api::models::Product,
    errors::{DashboardError, DashboardResult},
};

/// Schema version of the persisted cart blob.
const CART_SCHEMA_VERSION: u32 = 1;

/// File name of the persisted cart blob.
const CART_FILE: &str = "cart.json";

#[derive(Debug, Serialize, Deserialize)]
struct CartFile {
    /// Schema version tag.
    version: u32,
    /// The cart, lines plus total.
    cart:    Cart,
}

/// Cart with write-through persistence.
///
/// Single-writer, last-write-wins; concurrent writers race exactly like
/// two browser tabs sharing local storage.
#[derive(Debug)]
pub struct CartStore {
    path: PathBuf,
    cart: Cart,
}

impl CartStore {
    /// Opens the store under `dir`, rehydrating a persisted cart.
    ///
    /// A missing file yields an empty cart. Legacy blobs without a
    /// version tag (a bare `{ lines, total }` object) are migrated.
    pub fn open(dir: &Path) -> DashboardResult<Self> {
        let path = dir.join(CART_FILE);
        let cart = match fs::read_to_string(&path) {
            Ok(raw) => migrate(serde_json::from_str(&raw)?)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Cart::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, cart })
    }

    /// Read access to the cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds a product; persists on success.
    pub fn add(
        &mut self, product: &Product, order_count: u32, delivery_date: Option<NaiveDate>,
        device_ref: Option<String>, remark: impl Into<String>,
    ) -> DashboardResult<()> {
        self.cart.add(product, order_count, delivery_date, device_ref, remark)?;
        self.save()
    }

    /// Removes a line; persists on success.
    pub fn remove(&mut self, index: usize) -> DashboardResult<CartLine> {
        let line = self.cart.remove(index)?;
        self.save()?;
        Ok(line)
    }

    /// Edits a line quantity; persists on success.
    pub fn edit_quantity(&mut self, index: usize, order_count: u32) -> DashboardResult<()> {
        self.cart.edit_quantity(index, order_count)?;
        self.save()
    }

    /// Clears the cart and removes the persisted blob.
    pub fn clear(&mut self) -> DashboardResult<()> {
        self.cart.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn save(&self) -> DashboardResult<()> {
        let file = CartFile { version: CART_SCHEMA_VERSION, cart: self.cart.clone() };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// Migrates a persisted blob to the current schema.
fn migrate(value: serde_json::Value) -> DashboardResult<Cart> {
    let version = value.get("version").and_then(serde_json::Value::as_u64).unwrap_or(0) as u32;
    match version {
        // Legacy shape: the bare cart object.
        0 => Ok(serde_json::from_value(value)?),
        CART_SCHEMA_VERSION => {
            let file: CartFile = serde_json::from_value(value)?;
            Ok(file.cart)
        },
        newer => Err(DashboardError::UnsupportedSchemaVersion(newer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::test_product;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().expect("date"))
    }

    #[test]
    fn test_cart_survives_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let mut store = CartStore::open(dir.path()).expect("open");
            store
                .add(&test_product("A", 10, 100), 2, date("2099-01-15"), None, "")
                .expect("add");
        }

        let store = CartStore::open(dir.path()).expect("reopen");
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().total(), 20);
    }

    #[test]
    fn test_rejected_add_leaves_blob_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = CartStore::open(dir.path()).expect("open");
        store
            .add(&test_product("A", 10, 100), 2, date("2099-01-15"), None, "")
            .expect("add");

        let err = store
            .add(&test_product("A", 10, 3), 5, date("2099-01-15"), None, "")
            .unwrap_err();
        assert!(matches!(err, DashboardError::InsufficientInventory { .. }));

        let store = CartStore::open(dir.path()).expect("reopen");
        assert_eq!(store.cart().lines()[0].order_count, 2);
        assert_eq!(store.cart().total(), 20);
    }

    #[test]
    fn test_clear_removes_blob() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = CartStore::open(dir.path()).expect("open");
        store
            .add(&test_product("A", 10, 100), 2, date("2099-01-15"), None, "")
            .expect("add");
        store.clear().expect("clear");

        assert!(!dir.path().join("cart.json").exists());
        let store = CartStore::open(dir.path()).expect("reopen");
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_legacy_blob_migrates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let legacy = serde_json::json!({
            "lines": [{
                "productId": "A",
                "productName": "Product A",
                "skuNumber": "SKU-A",
                "orderCount": 2,
                "unitPrice": 10,
                "lineTotal": 20,
                "inventoryCeiling": 100,
                "deviceRef": null,
                "approvalThreshold": 5,
                "deliveryDate": "2099-01-15",
                "remark": ""
            }],
            "total": 20
        });
        fs::write(dir.path().join(CART_FILE), legacy.to_string()).expect("write");

        let store = CartStore::open(dir.path()).expect("open");
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().total(), 20);
    }

    #[test]
    fn test_newer_schema_version_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blob = serde_json::json!({ "version": 42, "cart": { "lines": [], "total": 0 } });
        fs::write(dir.path().join(CART_FILE), blob.to_string()).expect("write");

        assert!(matches!(
            CartStore::open(dir.path()),
            Err(DashboardError::UnsupportedSchemaVersion(42))
        ));
    }
}
