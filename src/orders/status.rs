//! Order status workflow types
//!
//! Status is server-authoritative; the client never computes transitions.
//! It normalizes the server's tags to one canonical enum (the backend
//! historically used both `order_processing` and `order_in_progress` for
//! the same bucket, and both `rejected` and `order_cancel`), maps each
//! status to a label and color, and offers the role-gated next actions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::DashboardError,
    types::{Capability, UserRole},
};

/// Canonical order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Freshly submitted request.
    NewRequest,
    /// Confirmed by an admin.
    #[serde(rename = "order_confirm")]
    Confirmed,
    /// Being processed/prepared. Both historical tags land here.
    #[serde(rename = "order_processing", alias = "order_in_progress")]
    InProgress,
    /// Delivered and verified.
    #[serde(rename = "order_delivered")]
    Delivered,
    /// Rejected or cancelled; terminal.
    #[serde(rename = "rejected", alias = "order_cancel")]
    Rejected,
}

impl OrderStatus {
    /// Canonical wire tag.
    #[must_use]
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::NewRequest => "new_request",
            Self::Confirmed => "order_confirm",
            Self::InProgress => "order_processing",
            Self::Delivered => "order_delivered",
            Self::Rejected => "rejected",
        }
    }

    /// Human label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewRequest => "New Request",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In Progress",
            Self::Delivered => "Delivered",
            Self::Rejected => "Rejected",
        }
    }

    /// Display color for the status chip.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::NewRequest => "#2196f3",
            Self::Confirmed => "#9c27b0",
            Self::InProgress => "#ff9800",
            Self::Delivered => "#4caf50",
            Self::Rejected => "#f44336",
        }
    }

    /// Whether no further action exists for any role.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Rejected)
    }

    /// Actions a role may take from this status.
    ///
    /// The list only names the next allowed tags; the server owns the
    /// transition itself.
    #[must_use]
    pub fn next_actions(&self, role: UserRole) -> Vec<OrderAction> {
        let mut actions = Vec::new();
        match self {
            Self::NewRequest => {
                if role.can(Capability::ConfirmOrders) {
                    actions.push(OrderAction::Confirm);
                    actions.push(OrderAction::Reject);
                }
            },
            Self::Confirmed => {
                if role.can(Capability::ProcessOrders) {
                    actions.push(OrderAction::StartProcessing);
                }
                if role.can(Capability::ConfirmOrders) {
                    actions.push(OrderAction::Reject);
                }
            },
            Self::InProgress => {
                if role.can(Capability::GenerateDeliveryQr) {
                    actions.push(OrderAction::GenerateQr);
                }
                if role.can(Capability::ScanDeliveryQr) {
                    actions.push(OrderAction::ConfirmDelivery);
                }
            },
            Self::Delivered | Self::Rejected => {},
        }
        actions
    }
}

impl FromStr for OrderStatus {
    type Err = DashboardError;

    /// Normalizes a raw server tag, including the historical aliases.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "new_request" => Ok(Self::NewRequest),
            "order_confirm" => Ok(Self::Confirmed),
            "order_processing" | "order_in_progress" => Ok(Self::InProgress),
            "order_delivered" => Ok(Self::Delivered),
            "rejected" | "order_cancel" => Ok(Self::Rejected),
            other => Err(DashboardError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Role-gated action offered against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Confirm a new request.
    Confirm,
    /// Reject/cancel.
    Reject,
    /// Move a confirmed order into processing.
    StartProcessing,
    /// Mint a delivery-verification QR code.
    GenerateQr,
    /// Scan and confirm delivery.
    ConfirmDelivery,
}

impl OrderAction {
    /// The tag this action requests from the server, if it is a status
    /// change.
    #[must_use]
    pub fn target_status(&self) -> Option<OrderStatus> {
        match self {
            Self::Confirm => Some(OrderStatus::Confirmed),
            Self::Reject => Some(OrderStatus::Rejected),
            Self::StartProcessing => Some(OrderStatus::InProgress),
            Self::ConfirmDelivery => Some(OrderStatus::Delivered),
            Self::GenerateQr => None,
        }
    }
}

/// Manager sign-off flag, independent of the status workflow.
///
/// Consulted informationally only; no automated gating beyond the
/// default-vs-pending assignment at creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerApproval {
    /// Below the threshold; no sign-off involved.
    #[default]
    Default,
    /// Above the threshold; awaiting the manager.
    Pending,
    /// Approved.
    Yes,
    /// Declined.
    No,
}

impl ManagerApproval {
    /// Creation-time assignment from the threshold comparison.
    #[must_use]
    pub fn initial(approval_threshold: u32, order_count: u32) -> Self {
        if approval_threshold < order_count {
            Self::Pending
        } else {
            Self::Default
        }
    }
}
