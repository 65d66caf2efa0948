//! Report exports
//!
//! An export is a POST to `/excel/:type` or `/pdf/:type`; the server
//! renders the file and the client derives a static download URL from
//! the API base rather than reading it from the response.

use tracing::info;

use crate::{
    api::ApiClient,
    errors::{DashboardError, DashboardResult},
    types::{Capability, UserRole},
};

/// Exportable data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Device list with telemetry summaries.
    Devices,
    /// Order history.
    Orders,
    /// Product catalog.
    Products,
    /// Activity log.
    ActivityLogs,
}

impl ExportKind {
    /// Path segment and file stem, e.g. `/excel/orders` and `orders.xlsx`.
    #[must_use]
    pub fn type_segment(self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Orders => "orders",
            Self::Products => "products",
            Self::ActivityLogs => "activity-logs",
        }
    }
}

/// Rendered file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PDF document.
    Pdf,
    /// Excel workbook.
    Xlsx,
}

impl ExportFormat {
    /// Endpoint family, `/pdf/...` or `/excel/...`.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "excel",
        }
    }

    /// File extension of the rendered download.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Static download URL for a rendered export.
///
/// Downloads are served from the host root, not under `/api`.
#[must_use]
pub fn download_url(api_base_url: &str, kind: ExportKind, format: ExportFormat) -> String {
    let host = api_base_url.trim_end_matches('/').trim_end_matches("/api");
    format!("{}/downloads/{}.{}", host, kind.type_segment(), format.extension())
}

/// Requests a server-side export and returns the download URL.
///
/// The payload carries the rows to render, already filtered client-side.
pub async fn request_export(
    client: &ApiClient, role: UserRole, kind: ExportKind, format: ExportFormat,
    payload: serde_json::Value,
) -> DashboardResult<String> {
    role.require(Capability::ExportReports)?;

    let path = format!("/{}/{}", format.path_segment(), kind.type_segment());
    client
        .post_export(&path, payload)
        .await
        .map_err(|err| DashboardError::ExportFailed(err.to_string()))?;

    let url = download_url(client.base_url(), kind, format);
    info!(%url, "export rendered");
    Ok(url)
}
