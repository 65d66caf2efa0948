//! Wire models for the REST backend
//!
//! The backend speaks camelCase JSON with Mongo-style `_id` keys; every
//! model accepts both spellings for its identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::orders::{ManagerApproval, OrderStatus};

/// Monitored device with its telemetry summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device ID.
    #[serde(alias = "_id")]
    pub id:          String,
    /// Display name.
    pub device_name: String,
    /// Owning company.
    pub company_id:  String,
    /// Physical location label.
    #[serde(default)]
    pub location:    Option<String>,
    /// Displayed inventory/stock count (PO balance).
    #[serde(default)]
    pub po_balance:  i64,
    /// Whether the device is currently reporting.
    #[serde(default)]
    pub online:      bool,
    /// Last report time, as the server formats it.
    #[serde(default)]
    pub last_active: Option<String>,
}

/// Catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    #[serde(alias = "_id")]
    pub id:                 String,
    /// Display name.
    pub name:               String,
    /// SKU number.
    pub sku_number:         String,
    /// Unit sale price in minor units.
    pub sale_price:         u64,
    /// Current inventory ceiling (PO balance).
    pub po_balance:         u32,
    /// Quantity above which manager approval is required.
    #[serde(default)]
    pub approval_threshold: u32,
    /// Category ID.
    #[serde(default)]
    pub category_id:        Option<String>,
    /// Owning company.
    #[serde(default)]
    pub company_id:         Option<String>,
    /// Product image URL.
    #[serde(default)]
    pub image:              Option<String>,
}

/// Server-owned order entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Order ID.
    #[serde(alias = "_id")]
    pub id:               String,
    /// Product display name.
    pub product:          String,
    /// Product ID.
    #[serde(default)]
    pub product_id:       Option<String>,
    /// Unit sale price in minor units.
    pub sale_price:       u64,
    /// Ordered quantity.
    pub order_count:      u32,
    /// Related device, if any.
    #[serde(default)]
    pub device_id:        Option<String>,
    /// Line total in minor units.
    pub total_price:      u64,
    /// Current workflow status (aliases normalized on decode).
    pub order_status:     OrderStatus,
    /// Manager sign-off flag.
    #[serde(default)]
    pub manager_approval: ManagerApproval,
    /// Requested delivery date.
    pub delivery_date:    NaiveDate,
    /// Free-form remark.
    #[serde(default)]
    pub remark:           String,
    /// Ordering user.
    #[serde(default)]
    pub user_id:          Option<String>,
    /// Tenant.
    #[serde(default)]
    pub company_id:       Option<String>,
}

/// Rule assigning a user to a device or product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Rule ID.
    #[serde(alias = "_id")]
    pub id:         String,
    /// Assigned user.
    pub user_id:    String,
    /// Target device, for device rules.
    #[serde(default)]
    pub device_id:  Option<String>,
    /// Target product, for product rules.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Whether the user is notified.
    #[serde(default)]
    pub notify:     bool,
}

/// Rule creation payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    /// Assigned user.
    pub user_id:    String,
    /// Target device, for device rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id:  Option<String>,
    /// Target product, for product rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Whether the user is notified.
    pub notify:     bool,
}

impl RuleDraft {
    /// Label used in partial-failure summaries.
    #[must_use]
    pub fn label(&self) -> &str {
        self.device_id
            .as_deref()
            .or(self.product_id.as_deref())
            .unwrap_or(self.user_id.as_str())
    }
}

/// Product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID.
    #[serde(alias = "_id")]
    pub id:         String,
    /// Display name.
    pub name:       String,
    /// Owning company.
    #[serde(default)]
    pub company_id: Option<String>,
}

/// Tenant company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company ID.
    #[serde(alias = "_id")]
    pub id:      String,
    /// Display name.
    pub name:    String,
    /// Contact email.
    #[serde(default)]
    pub email:   Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone:   Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Physical location devices are installed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Location ID.
    #[serde(alias = "_id")]
    pub id:         String,
    /// Display name.
    pub name:       String,
    /// Postal address.
    #[serde(default)]
    pub address:    Option<String>,
    /// Owning company.
    #[serde(default)]
    pub company_id: Option<String>,
}

/// Audit/activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Log entry ID.
    #[serde(alias = "_id")]
    pub id:         String,
    /// Acting user.
    pub user_id:    String,
    /// Performed action.
    pub action:     String,
    /// Extra detail.
    #[serde(default)]
    pub detail:     Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: u64,
}

/// Chat room summary, latest message attached client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    /// Chat room ID.
    #[serde(alias = "_id")]
    pub id:             String,
    /// Participant user IDs.
    #[serde(default)]
    pub participants:   Vec<String>,
    /// Latest message, filled by [`assemble_chat_list`].
    ///
    /// [`assemble_chat_list`]: crate::chat::assemble_chat_list
    #[serde(default)]
    pub latest_message: Option<ChatMessage>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message ID.
    #[serde(alias = "_id")]
    pub id:         String,
    /// Chat room.
    pub chat_id:    String,
    /// Sending user.
    pub sender_id:  String,
    /// Message text.
    pub body:       String,
    /// Whether the recipient has seen it.
    #[serde(default)]
    pub seen:       bool,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: u64,
}

// ============================================================================
// LIST PAYLOADS
// ============================================================================

/// `GET /device` payload.
#[derive(Debug, Deserialize)]
pub struct DeviceList {
    /// Devices.
    pub devices: Vec<Device>,
}

/// `GET /products` payload.
#[derive(Debug, Deserialize)]
pub struct ProductList {
    /// Products.
    pub products: Vec<Product>,
}

/// `GET /orders` payload.
#[derive(Debug, Deserialize)]
pub struct OrderList {
    /// Orders.
    pub orders: Vec<OrderRecord>,
}

/// `GET /rules` payload.
#[derive(Debug, Deserialize)]
pub struct RuleList {
    /// Rules.
    pub rules: Vec<Rule>,
}

/// `GET /categories` payload.
#[derive(Debug, Deserialize)]
pub struct CategoryList {
    /// Categories.
    pub categories: Vec<Category>,
}

/// `GET /companies` payload.
#[derive(Debug, Deserialize)]
pub struct CompanyList {
    /// Companies.
    pub companies: Vec<Company>,
}

/// `GET /locations` payload.
#[derive(Debug, Deserialize)]
pub struct LocationList {
    /// Locations.
    pub locations: Vec<Location>,
}

/// `GET /activity-logs` payload.
#[derive(Debug, Deserialize)]
pub struct ActivityLogList {
    /// Log entries.
    pub logs: Vec<ActivityLog>,
}

/// `GET /chat` payload.
#[derive(Debug, Deserialize)]
pub struct ChatList {
    /// Chat rooms.
    pub chats: Vec<ChatSummary>,
}

/// `GET /chat/:id/messages` payload.
#[derive(Debug, Deserialize)]
pub struct MessageList {
    /// Messages, in receipt order.
    pub messages: Vec<ChatMessage>,
}

/// `POST /qrcode/create` payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrMintPayload {
    /// Server path of the rendered QR image.
    pub download_path: String,
}
