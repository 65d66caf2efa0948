//! # Stockdeck
//!
//! Core logic of the multi-tenant inventory, ordering, and
//! device-monitoring dashboard: session resolution, the cart
//! accumulator, the order workflow, delivery QR verification, support
//! chat, and report exports. Transport seams (HTTP, socket, camera) are
//! traits so the core stays testable without a backend.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod cart;
pub mod chat;
pub mod delivery;
pub mod errors;
pub mod exports;
pub mod orders;
pub mod session;
pub mod types;

// Re-exports for public API
pub use api::{ApiClient, HttpTransport, ReqwestTransport};
pub use cart::{Cart, CartStore};
pub use errors::{DashboardError, DashboardResult};
pub use orders::{OrderStatus, SubmitSummary};
pub use session::{SessionStore, SessionUser};
pub use types::{Capability, DashboardConfig, UserRole};
