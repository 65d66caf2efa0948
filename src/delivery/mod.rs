//! Delivery verification
//!
//! Two halves: the admin side mints a QR payload tied to
//! `{userId, itemId, orderId}` once an order is in progress, and the
//! customer side scans it back and confirms delivery. A minted code is
//! only ever offered for download, never regenerated.

mod scan;

pub use scan::{scan_and_confirm, ScanSession, ScanSource};

use serde::{Deserialize, Serialize};

use crate::{
    api::{models::OrderRecord, ApiClient},
    errors::{DashboardError, DashboardResult},
    orders::OrderStatus,
    types::{Capability, UserRole},
};

/// Opaque QR payload minted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    /// Ordering user.
    pub user_id: String,
    /// Ordered product.
    pub item_id: String,
    /// Order being delivered.
    pub type_id: String,
}

impl QrPayload {
    /// Parses a scanned code as JSON.
    pub fn parse(raw: &str) -> DashboardResult<Self> {
        serde_json::from_str(raw).map_err(|e| DashboardError::QrMalformed(e.to_string()))
    }

    /// The payload expected for an order's delivery.
    #[must_use]
    pub fn expected_for(order: &OrderRecord) -> Self {
        Self {
            user_id: order.user_id.clone().unwrap_or_default(),
            item_id: order.product_id.clone().unwrap_or_default(),
            type_id: order.id.clone(),
        }
    }

    /// Whether all three identifying fields match.
    #[must_use]
    pub fn matches(&self, expected: &Self) -> bool {
        self == expected
    }
}

/// A minted QR code. Only a download is offered once minted.
#[derive(Debug, Clone)]
pub struct MintedQr {
    download_path: String,
}

impl MintedQr {
    /// Static download URL, derived from the API base.
    #[must_use]
    pub fn download_url(&self, api_base_url: &str) -> String {
        let host = api_base_url.trim_end_matches('/').trim_end_matches("/api");
        format!("{}{}", host, self.download_path)
    }
}

/// Mints the delivery-verification QR for an order.
///
/// Capability-gated to the admin side; the order must be in the
/// in-progress bucket (either historical tag qualifies).
pub async fn mint_qr(
    client: &ApiClient, role: UserRole, order: &OrderRecord,
) -> DashboardResult<MintedQr> {
    role.require(Capability::GenerateDeliveryQr)?;
    if order.order_status != OrderStatus::InProgress {
        return Err(DashboardError::OrderNotInProgress(order.id.clone()));
    }

    let expected = QrPayload::expected_for(order);
    let payload = client
        .mint_delivery_qr(&expected.user_id, &expected.item_id, &expected.type_id)
        .await?;
    Ok(MintedQr { download_path: payload.download_path })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        api::testing::ScriptedTransport,
        orders::test_order,
        types::DashboardConfig,
    };

    fn client(transport: Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(&DashboardConfig::default(), "tok-1", transport)
    }

    #[tokio::test]
    async fn test_mint_requires_admin_side_capability() {
        let transport = Arc::new(ScriptedTransport::new());
        let order = test_order("ord-1", OrderStatus::InProgress);

        let err = mint_qr(&client(Arc::clone(&transport)), UserRole::Customer, &order)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::PermissionDenied { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mint_requires_in_progress_bucket() {
        let transport = Arc::new(ScriptedTransport::new());
        let order = test_order("ord-1", OrderStatus::NewRequest);

        let err = mint_qr(&client(Arc::clone(&transport)), UserRole::Admin, &order)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::OrderNotInProgress(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mint_posts_order_context_and_derives_download_url() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(serde_json::json!({
            "status": true,
            "downloadPath": "/downloads/qr-ord-1.png"
        }));
        let order = test_order("ord-1", OrderStatus::InProgress);

        let minted = mint_qr(&client(Arc::clone(&transport)), UserRole::Admin, &order)
            .await
            .expect("mint");

        let request = &transport.requests()[0];
        assert!(request.url.ends_with("/api/qrcode/create"));
        let body = request.body.as_ref().expect("body");
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["itemId"], "A");
        assert_eq!(body["typeId"], "ord-1");

        assert_eq!(
            minted.download_url("http://localhost:5000/api"),
            "http://localhost:5000/downloads/qr-ord-1.png"
        );
    }

    #[test]
    fn test_payload_parse_and_match() {
        let raw = r#"{"userId":"u1","itemId":"A","typeId":"ord-1"}"#;
        let payload = QrPayload::parse(raw).expect("parse");
        let order = test_order("ord-1", OrderStatus::InProgress);
        assert!(payload.matches(&QrPayload::expected_for(&order)));

        let other = test_order("ord-2", OrderStatus::InProgress);
        assert!(!payload.matches(&QrPayload::expected_for(&other)));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(matches!(
            QrPayload::parse("not json"),
            Err(DashboardError::QrMalformed(_))
        ));
        assert!(matches!(
            QrPayload::parse(r#"{"userId":"u1"}"#),
            Err(DashboardError::QrMalformed(_))
        ));
    }
}
