//! REST API client layer
//!
//! Thin token-attaching wrapper over an async HTTP transport, plus the
//! backend's wire models. Responses are `{ status: bool, ...payload }`
//! envelopes; error bodies carry `{ error: { message } }`.

mod client;
pub mod models;
mod transport;

pub use client::{ApiClient, BatchSummary};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, ReqwestTransport};

#[cfg(test)]
pub(crate) use transport::testing;
