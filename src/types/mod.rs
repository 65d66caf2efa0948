//! Shared configuration, role, and validation types

use std::{fmt, path::PathBuf, sync::OnceLock, time::Duration};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, DashboardResult};

/// Dashboard core configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// REST API base URL (ends with the `/api` prefix).
    pub api_base_url:    String,
    /// Realtime socket endpoint path.
    pub socket_path:     String,
    /// Header carrying the bearer token. The backend reads a custom
    /// `token` header, not `Authorization`.
    pub token_header:    String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// QR scan session timeout.
    pub scan_timeout:    Duration,
    /// Directory holding persisted cart and session blobs.
    pub storage_dir:     PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url:    "http://localhost:5000/api".to_string(),
            socket_path:     "/socket.io".to_string(),
            token_header:    "token".to_string(),
            request_timeout: Duration::from_secs(30),
            scan_timeout:    Duration::from_secs(30),
            storage_dir:     PathBuf::from("."),
        }
    }
}

// ============================================================================
// ROLES & CAPABILITIES
// ============================================================================

/// User role, as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Platform operator.
    SuperAdmin,
    /// Company administrator.
    Admin,
    /// Order moderator.
    Moderator,
    /// Approval manager.
    Manager,
    /// Ordering customer.
    Customer,
}

impl UserRole {
    /// Wire string for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SuperAdmin",
            Self::Admin => "Admin",
            Self::Moderator => "Moderator",
            Self::Manager => "Manager",
            Self::Customer => "Customer",
        }
    }

    /// Actions this role may perform.
    ///
    /// Consulted once per page instead of re-deriving role checks per
    /// button.
    #[must_use]
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Self::SuperAdmin => &[
                ManageCompanies,
                ManageCategories,
                ManageRules,
                ManageProducts,
                ConfirmOrders,
                ProcessOrders,
                GenerateDeliveryQr,
                ViewActivityLogs,
                ClearActivityLogs,
                ExportReports,
                Chat,
            ],
            Self::Admin => &[
                ManageCategories,
                ManageRules,
                ManageProducts,
                ConfirmOrders,
                ProcessOrders,
                GenerateDeliveryQr,
                ViewActivityLogs,
                ClearActivityLogs,
                ExportReports,
                Chat,
            ],
            Self::Moderator => &[
                ProcessOrders,
                GenerateDeliveryQr,
                ViewActivityLogs,
                ExportReports,
                Chat,
            ],
            Self::Manager => &[SetManagerApproval, ViewActivityLogs, ExportReports, Chat],
            Self::Customer => &[PlaceOrders, ScanDeliveryQr, Chat],
        }
    }

    /// Whether this role carries a capability.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Fails with `PermissionDenied` when the capability is missing.
    pub fn require(&self, capability: Capability) -> DashboardResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(DashboardError::PermissionDenied {
                role:   *self,
                action: capability.describe().to_string(),
            })
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// CRUD on companies.
    ManageCompanies,
    /// CRUD on product categories.
    ManageCategories,
    /// CRUD on user/device rules.
    ManageRules,
    /// CRUD on products.
    ManageProducts,
    /// Confirm or reject new order requests.
    ConfirmOrders,
    /// Move confirmed orders into processing.
    ProcessOrders,
    /// Mint delivery-verification QR codes.
    GenerateDeliveryQr,
    /// Scan delivery-verification QR codes.
    ScanDeliveryQr,
    /// Set the manager-approval flag on orders.
    SetManagerApproval,
    /// View activity logs.
    ViewActivityLogs,
    /// Clear activity logs.
    ClearActivityLogs,
    /// Add products to cart and submit orders.
    PlaceOrders,
    /// Request Excel/PDF exports.
    ExportReports,
    /// Use the realtime chat.
    Chat,
}

impl Capability {
    /// Human description, used in permission errors.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ManageCompanies => "manage companies",
            Self::ManageCategories => "manage categories",
            Self::ManageRules => "manage rules",
            Self::ManageProducts => "manage products",
            Self::ConfirmOrders => "confirm orders",
            Self::ProcessOrders => "process orders",
            Self::GenerateDeliveryQr => "generate delivery QR codes",
            Self::ScanDeliveryQr => "scan delivery QR codes",
            Self::SetManagerApproval => "set manager approval",
            Self::ViewActivityLogs => "view activity logs",
            Self::ClearActivityLogs => "clear activity logs",
            Self::PlaceOrders => "place orders",
            Self::ExportReports => "export reports",
            Self::Chat => "chat",
        }
    }
}

// ============================================================================
// FORM VALIDATION
// ============================================================================

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("static regex"))
}

/// Validates an email address before any network call.
pub fn validate_email(email: &str) -> DashboardResult<()> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(DashboardError::InvalidEmail(email.to_string()))
    }
}

/// Validates a phone number before any network call.
pub fn validate_phone(phone: &str) -> DashboardResult<()> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(DashboardError::InvalidPhone(phone.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table_gates_roles() {
        assert!(UserRole::SuperAdmin.can(Capability::ManageCompanies));
        assert!(!UserRole::Admin.can(Capability::ManageCompanies));
        assert!(UserRole::Moderator.can(Capability::GenerateDeliveryQr));
        assert!(!UserRole::Customer.can(Capability::GenerateDeliveryQr));
        assert!(UserRole::Customer.can(Capability::ScanDeliveryQr));
        assert!(UserRole::Manager.can(Capability::SetManagerApproval));
        assert!(!UserRole::Admin.can(Capability::SetManagerApproval));
    }

    #[test]
    fn test_require_reports_role_and_action() {
        let err = UserRole::Customer.require(Capability::ClearActivityLogs).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Customer"));
        assert!(message.contains("clear activity logs"));
    }

    #[test]
    fn test_role_wire_strings_round_trip() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Moderator,
            UserRole::Manager,
            UserRole::Customer,
        ] {
            let json = serde_json::to_string(&role).expect("serialize");
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: UserRole = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ops@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("+8801712345678").is_ok());
        assert!(validate_phone("0171234").is_ok());
        assert!(validate_phone("12ab34").is_err());
    }
}
