//! Error types for the dashboard core

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::UserRole;

/// Dashboard-wide errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network-level failure before any response was read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with `status: false`.
    #[error("server rejected request: {0}")]
    Api(String),
    /// Response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// Order status tag not in the known set.
    #[error("unknown order status tag: {0}")]
    UnknownStatus(String),
    /// Quantity is zero or unparsable.
    #[error("invalid quantity")]
    InvalidQuantity,
    /// Requested quantity exceeds the product's inventory ceiling.
    #[error("insufficient inventory for {product_id}: available {available}, requested {requested}")]
    InsufficientInventory {
        /// Product ID.
        product_id: String,
        /// Available quantity (PO balance).
        available:  u32,
        /// Requested quantity.
        requested:  u32,
    },
    /// Delivery date missing from an add-to-cart request.
    #[error("delivery date is required")]
    DeliveryDateRequired,
    /// Delivery date lies before local today.
    #[error("delivery date {0} is in the past")]
    DeliveryDateInPast(NaiveDate),
    /// Cart has no lines.
    #[error("cart is empty")]
    CartEmpty,
    /// Cart line index out of range.
    #[error("cart line {0} not found")]
    LineNotFound(usize),
    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    /// Invalid phone number.
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    /// No stored session matches the lookup.
    #[error("no session found")]
    SessionNotFound,
    /// Persisted blob carries a schema version newer than this build.
    #[error("unsupported storage schema version: {0}")]
    UnsupportedSchemaVersion(u32),
    /// Role lacks the capability for the attempted action.
    #[error("role {role} is not allowed to {action}")]
    PermissionDenied {
        /// Acting role.
        role:   UserRole,
        /// Attempted action.
        action: String,
    },
    /// Order is not in the in-progress bucket.
    #[error("order {0} is not in progress")]
    OrderNotInProgress(String),
    /// Scanned QR payload does not match the expected order context.
    #[error("QR payload does not match the expected order")]
    QrMismatch,
    /// Scanned QR payload is not valid JSON or misses fields.
    #[error("malformed QR payload: {0}")]
    QrMalformed(String),
    /// No valid code was read before the session deadline.
    #[error("scan session timed out")]
    ScanTimeout,
    /// User cancelled the scan session.
    #[error("scan session cancelled")]
    ScanCancelled,
    /// Export endpoint reported failure.
    #[error("export failed: {0}")]
    ExportFailed(String),
    /// Local storage I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// Local storage (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;
