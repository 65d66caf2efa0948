//! QR scan session
//!
//! A camera-backed scan runs as one session: the first successfully
//! decoded code is processed and later decodes are ignored. The session
//! enforces a timeout and is cancellable by the user at any point. This
//! is the only flow in the dashboard with an explicit timeout/cancel
//! contract.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

use super::QrPayload;
use crate::{
    api::{models::OrderRecord, ApiClient},
    errors::{DashboardError, DashboardResult},
    types::{Capability, UserRole},
};

/// Source of decoded QR text, backed by a camera in production.
#[async_trait]
pub trait ScanSource: Send {
    /// Next decoded code; `None` when the camera stream closes.
    async fn next_decode(&mut self) -> Option<String>;
}

/// One scan attempt with a deadline.
#[derive(Debug, Clone, Copy)]
pub struct ScanSession {
    timeout: Duration,
}

impl ScanSession {
    /// Creates a session with the given timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Waits for the first decoded code, parses it, and returns it.
    ///
    /// Ends with `ScanTimeout` when the deadline passes without a decode
    /// and with `ScanCancelled` when the user cancels or the camera
    /// stream closes. A decode that is not valid JSON ends the session
    /// with `QrMalformed`.
    pub async fn run<S: ScanSource>(
        &self, source: &mut S, mut cancel: oneshot::Receiver<()>,
    ) -> DashboardResult<QrPayload> {
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);
        let mut cancel_open = true;

        loop {
            tokio::select! {
                () = &mut deadline => return Err(DashboardError::ScanTimeout),
                cancelled = &mut cancel, if cancel_open => {
                    match cancelled {
                        Ok(()) => return Err(DashboardError::ScanCancelled),
                        // Sender dropped without cancelling; keep scanning.
                        Err(_) => cancel_open = false,
                    }
                },
                decoded = source.next_decode() => {
                    return match decoded {
                        Some(raw) => {
                            debug!("scan session decoded a code");
                            QrPayload::parse(&raw)
                        },
                        None => Err(DashboardError::ScanCancelled),
                    };
                },
            }
        }
    }
}

/// Runs a scan session against an order and confirms its delivery.
///
/// The decoded payload's `userId`, `itemId`, and `typeId` must all match
/// the expected order context; on mismatch or malformed payload the
/// delivery-confirmation endpoint is never called.
pub async fn scan_and_confirm<S: ScanSource>(
    client: &ApiClient, role: UserRole, order: &OrderRecord, source: &mut S, timeout: Duration,
    cancel: oneshot::Receiver<()>,
) -> DashboardResult<()> {
    role.require(Capability::ScanDeliveryQr)?;

    let payload = ScanSession::new(timeout).run(source, cancel).await?;
    let expected = QrPayload::expected_for(order);
    if !payload.matches(&expected) {
        return Err(DashboardError::QrMismatch);
    }

    client.confirm_delivery(&order.id).await
}
