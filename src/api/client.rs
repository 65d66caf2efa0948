//! Typed REST client
//!
//! One thin wrapper per backend resource family. The bearer token rides in
//! a custom `token` header on every request; there is no retry or pooling
//! logic beyond what the transport provides.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{
    ActivityLog, ActivityLogList, Category, CategoryList, ChatList, ChatMessage, ChatSummary,
    Company, CompanyList, Device, DeviceList, Location, LocationList, MessageList, OrderRecord,
    OrderList, Product, ProductList, QrMintPayload, Rule, RuleDraft, RuleList,
};
use super::transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
use crate::{
    errors::{DashboardError, DashboardResult},
    orders::{ManagerApproval, OrderDraft, OrderStatus},
    types::{validate_email, validate_phone, Capability, DashboardConfig, UserRole},
};

/// Outcome of a best-effort bulk call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Items attempted.
    pub attempted:     usize,
    /// Items the server accepted.
    pub succeeded:     usize,
    /// Items that failed.
    pub failed:        usize,
    /// Labels of the failed items.
    pub failed_labels: Vec<String>,
}

impl BatchSummary {
    /// One-line count summary, e.g. `"2/3 created successfully"`.
    #[must_use]
    pub fn report(&self) -> String {
        format!("{}/{} created successfully", self.succeeded, self.attempted)
    }
}

/// REST API client.
#[derive(Clone)]
pub struct ApiClient {
    base_url:     String,
    token_header: String,
    token:        String,
    transport:    Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Creates a client for one session token.
    #[must_use]
    pub fn new(
        config: &DashboardConfig, token: impl Into<String>, transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token_header: config.token_header.clone(),
            token: token.into(),
            transport,
        }
    }

    /// API base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(
        &self, method: HttpMethod, path: &str, body: Option<serde_json::Value>,
    ) -> DashboardResult<ApiResponse> {
        let request = ApiRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: vec![(self.token_header.clone(), self.token.clone())],
            body,
        };
        debug!(?method, path, "api request");
        let response = self.transport.send(request).await?;
        debug!(path, status = response.status, "api response");
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> DashboardResult<T> {
        let response = self.request(HttpMethod::Get, path, None).await?;
        decode_envelope(&response)
    }

    async fn post_status(
        &self, path: &str, body: serde_json::Value,
    ) -> DashboardResult<()> {
        let response = self.request(HttpMethod::Post, path, Some(body)).await?;
        decode_status(&response)
    }

    async fn put_status(&self, path: &str, body: serde_json::Value) -> DashboardResult<()> {
        let response = self.request(HttpMethod::Put, path, Some(body)).await?;
        decode_status(&response)
    }

    async fn delete_status(&self, path: &str) -> DashboardResult<()> {
        let response = self.request(HttpMethod::Delete, path, None).await?;
        decode_status(&response)
    }

    // ========================================================================
    // DEVICES
    // ========================================================================

    /// Lists devices with their telemetry summaries.
    pub async fn get_devices(&self) -> DashboardResult<Vec<Device>> {
        Ok(self.get::<DeviceList>("/device").await?.devices)
    }

    /// Fetches one device.
    pub async fn get_device(&self, device_id: &str) -> DashboardResult<Device> {
        #[derive(serde::Deserialize)]
        struct Payload {
            device: Device,
        }
        Ok(self.get::<Payload>(&format!("/device/{}", device_id)).await?.device)
    }

    // ========================================================================
    // PRODUCTS
    // ========================================================================

    /// Lists catalog products (inventory ceilings included).
    pub async fn get_products(&self) -> DashboardResult<Vec<Product>> {
        Ok(self.get::<ProductList>("/products").await?.products)
    }

    // ========================================================================
    // ORDERS
    // ========================================================================

    /// Lists orders visible to the session.
    pub async fn get_orders(&self) -> DashboardResult<Vec<OrderRecord>> {
        Ok(self.get::<OrderList>("/orders").await?.orders)
    }

    /// Creates one order from a draft payload.
    pub async fn create_order(&self, draft: &OrderDraft) -> DashboardResult<()> {
        self.post_status("/orders", serde_json::to_value(draft)?).await
    }

    /// Requests the next workflow tag for an order.
    ///
    /// Transitions are server-driven; this only sends the desired tag.
    pub async fn update_order_status(
        &self, order_id: &str, status: OrderStatus,
    ) -> DashboardResult<()> {
        self.put_status(
            &format!("/orders/{}", order_id),
            serde_json::json!({ "orderStatus": status.as_tag() }),
        )
        .await
    }

    /// Sets the manager-approval flag. Manager role only.
    pub async fn set_manager_approval(
        &self, role: UserRole, order_id: &str, approval: ManagerApproval,
    ) -> DashboardResult<()> {
        role.require(Capability::SetManagerApproval)?;
        self.put_status(
            &format!("/orders/{}", order_id),
            serde_json::json!({ "managerApproval": approval }),
        )
        .await
    }

    /// Confirms delivery of an order (after QR verification).
    pub async fn confirm_delivery(&self, order_id: &str) -> DashboardResult<()> {
        self.update_order_status(order_id, OrderStatus::Delivered).await
    }

    /// Mints a delivery-verification QR payload for an order.
    pub async fn mint_delivery_qr(
        &self, user_id: &str, item_id: &str, order_id: &str,
    ) -> DashboardResult<QrMintPayload> {
        let response = self
            .request(
                HttpMethod::Post,
                "/qrcode/create",
                Some(serde_json::json!({
                    "userId": user_id,
                    "itemId": item_id,
                    "typeId": order_id,
                })),
            )
            .await?;
        decode_envelope(&response)
    }

    // ========================================================================
    // RULES
    // ========================================================================

    /// Lists rules.
    pub async fn get_rules(&self) -> DashboardResult<Vec<Rule>> {
        Ok(self.get::<RuleList>("/rules").await?.rules)
    }

    /// Creates one rule.
    pub async fn create_rule(&self, draft: &RuleDraft) -> DashboardResult<()> {
        self.post_status("/rules", serde_json::to_value(draft)?).await
    }

    /// Creates rules for several devices, best-effort.
    ///
    /// Calls run sequentially; one failure does not abort the rest, and
    /// the outcome is a count summary with no rollback.
    pub async fn create_rules(&self, drafts: &[RuleDraft]) -> BatchSummary {
        let mut summary = BatchSummary { attempted: drafts.len(), ..BatchSummary::default() };
        for draft in drafts {
            match self.create_rule(draft).await {
                Ok(()) => summary.succeeded += 1,
                Err(err) => {
                    tracing::warn!(label = draft.label(), %err, "rule creation failed");
                    summary.failed += 1;
                    summary.failed_labels.push(draft.label().to_string());
                },
            }
        }
        summary
    }

    /// Deletes a rule.
    pub async fn delete_rule(&self, rule_id: &str) -> DashboardResult<()> {
        self.delete_status(&format!("/rules/{}", rule_id)).await
    }

    // ========================================================================
    // CATEGORIES & COMPANIES
    // ========================================================================

    /// Lists categories.
    pub async fn get_categories(&self) -> DashboardResult<Vec<Category>> {
        Ok(self.get::<CategoryList>("/categories").await?.categories)
    }

    /// Creates a category.
    pub async fn create_category(&self, name: &str) -> DashboardResult<()> {
        self.post_status("/categories", serde_json::json!({ "name": name })).await
    }

    /// Deletes a category.
    pub async fn delete_category(&self, category_id: &str) -> DashboardResult<()> {
        self.delete_status(&format!("/categories/{}", category_id)).await
    }

    /// Lists companies.
    pub async fn get_companies(&self) -> DashboardResult<Vec<Company>> {
        Ok(self.get::<CompanyList>("/companies").await?.companies)
    }

    /// Creates a company. Email and phone are validated client-side
    /// before any network call.
    pub async fn create_company(
        &self, name: &str, email: &str, phone: &str, address: &str,
    ) -> DashboardResult<()> {
        validate_email(email)?;
        validate_phone(phone)?;
        self.post_status(
            "/companies",
            serde_json::json!({
                "name": name,
                "email": email,
                "phone": phone,
                "address": address,
            }),
        )
        .await
    }

    /// Deletes a company.
    pub async fn delete_company(&self, company_id: &str) -> DashboardResult<()> {
        self.delete_status(&format!("/companies/{}", company_id)).await
    }

    /// Lists device locations.
    pub async fn get_locations(&self) -> DashboardResult<Vec<Location>> {
        Ok(self.get::<LocationList>("/locations").await?.locations)
    }

    // ========================================================================
    // ACTIVITY LOGS
    // ========================================================================

    /// Lists activity-log entries.
    pub async fn get_activity_logs(&self) -> DashboardResult<Vec<ActivityLog>> {
        Ok(self.get::<ActivityLogList>("/activity-logs").await?.logs)
    }

    /// Clears the activity log. Capability-gated.
    pub async fn clear_activity_logs(&self, role: UserRole) -> DashboardResult<()> {
        role.require(Capability::ClearActivityLogs)?;
        self.delete_status("/activity-logs").await
    }

    // ========================================================================
    // FILES
    // ========================================================================

    /// Uploads a file payload.
    pub async fn save_file(&self, name: &str, content_base64: &str) -> DashboardResult<()> {
        self.post_status(
            "/files/save",
            serde_json::json!({ "name": name, "content": content_base64 }),
        )
        .await
    }

    /// Deletes an uploaded file.
    pub async fn delete_file(&self, name: &str) -> DashboardResult<()> {
        self.post_status("/files/delete", serde_json::json!({ "name": name })).await
    }

    // ========================================================================
    // CHAT
    // ========================================================================

    /// Lists chat rooms for the session.
    pub async fn get_chats(&self) -> DashboardResult<Vec<ChatSummary>> {
        Ok(self.get::<ChatList>("/chat").await?.chats)
    }

    /// Lists a chat room's messages in receipt order.
    pub async fn get_chat_messages(&self, chat_id: &str) -> DashboardResult<Vec<ChatMessage>> {
        Ok(self.get::<MessageList>(&format!("/chat/{}/messages", chat_id)).await?.messages)
    }

    // ========================================================================
    // EXPORTS
    // ========================================================================

    /// Posts an export request; the caller derives the download URL.
    pub(crate) async fn post_export(
        &self, path: &str, payload: serde_json::Value,
    ) -> DashboardResult<()> {
        self.post_status(path, payload).await
    }
}

/// Decodes a `{ status, ...payload }` envelope into the payload type.
fn decode_envelope<T: DeserializeOwned>(response: &ApiResponse) -> DashboardResult<T> {
    let value = parse_envelope(response)?;
    serde_json::from_value(value).map_err(|e| DashboardError::Decode(e.to_string()))
}

/// Decodes an envelope where only the status flag matters.
fn decode_status(response: &ApiResponse) -> DashboardResult<()> {
    parse_envelope(response).map(|_| ())
}

fn parse_envelope(response: &ApiResponse) -> DashboardResult<serde_json::Value> {
    let value: serde_json::Value =
        serde_json::from_str(&response.body).map_err(|e| DashboardError::Decode(e.to_string()))?;
    let ok = value.get("status").and_then(serde_json::Value::as_bool).unwrap_or(false);
    if ok {
        Ok(value)
    } else {
        Err(DashboardError::Api(extract_message(&value)))
    }
}

/// Best-effort error message extraction from an error envelope.
fn extract_message(value: &serde_json::Value) -> String {
    value
        .pointer("/error/message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::transport::testing::ScriptedTransport;

    fn client(transport: Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(&DashboardConfig::default(), "tok-1", transport)
    }

    #[tokio::test]
    async fn test_token_rides_in_custom_header() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(serde_json::json!({ "status": true, "products": [] }));

        let products = client(Arc::clone(&transport)).get_products().await.expect("products");
        assert!(products.is_empty());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/api/products"));
        assert_eq!(
            requests[0].headers,
            vec![("token".to_string(), "tok-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_error_envelope_surfaces_server_message() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(serde_json::json!({
            "status": false,
            "error": { "message": "product out of stock" }
        }));

        let err = client(transport).get_products().await.unwrap_err();
        assert!(matches!(err, DashboardError::Api(ref m) if m == "product out of stock"));
    }

    #[tokio::test]
    async fn test_error_envelope_without_message_is_best_effort() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(serde_json::json!({ "status": false }));

        let err = client(transport).get_products().await.unwrap_err();
        assert!(matches!(err, DashboardError::Api(ref m) if m == "request failed"));
    }

    #[tokio::test]
    async fn test_manager_approval_gated_to_manager() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = client(Arc::clone(&transport));

        let err = api
            .set_manager_approval(UserRole::Admin, "ord-1", ManagerApproval::Yes)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::PermissionDenied { .. }));
        assert_eq!(transport.call_count(), 0);

        transport.push_ok(serde_json::json!({ "status": true }));
        api.set_manager_approval(UserRole::Manager, "ord-1", ManagerApproval::Yes)
            .await
            .expect("manager allowed");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_logs_gated_by_capability() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = client(Arc::clone(&transport));

        let err = api.clear_activity_logs(UserRole::Customer).await.unwrap_err();
        assert!(matches!(err, DashboardError::PermissionDenied { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_company_validation_blocks_before_network() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = client(Arc::clone(&transport));

        let err = api.create_company("Acme", "bad-email", "123456789", "HQ").await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidEmail(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rules_reports_partial_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(serde_json::json!({ "status": true }));
        transport.push_error("connection reset");
        transport.push_ok(serde_json::json!({ "status": true }));

        let drafts: Vec<RuleDraft> = ["dev-1", "dev-2", "dev-3"]
            .iter()
            .map(|device| RuleDraft {
                user_id:    "u1".to_string(),
                device_id:  Some((*device).to_string()),
                product_id: None,
                notify:     true,
            })
            .collect();

        let summary = client(Arc::clone(&transport)).create_rules(&drafts).await;
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failed_labels, vec!["dev-2".to_string()]);
        assert_eq!(summary.report(), "2/3 created successfully");
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_order_status_update_sends_canonical_tag() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(serde_json::json!({ "status": true }));

        client(Arc::clone(&transport))
            .update_order_status("ord-1", OrderStatus::InProgress)
            .await
            .expect("update");

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert!(request.url.ends_with("/api/orders/ord-1"));
        assert_eq!(
            request.body.as_ref().expect("body")["orderStatus"],
            "order_processing"
        );
    }
}
