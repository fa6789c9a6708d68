//! The bulk operation model.
//!
//! A [`BulkOperation`] is the gateway's view of one upstream asynchronous
//! job. The platform owns the lifecycle; this crate only observes
//! snapshots via polling and derives presentation values from them (a
//! progress phrase, a formatted file size, a computed result expiry).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// How long Shopify keeps a completed operation's result file.
const RESULT_RETENTION_DAYS: i64 = 7;

/// Status of an upstream bulk operation.
///
/// Transitions are driven entirely by the platform; the gateway never
/// moves an operation between states itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkOperationStatus {
    /// Submitted, not yet running.
    Created,
    /// Actively streaming results.
    Running,
    /// Finished successfully; a result file may be available.
    Completed,
    /// Failed upstream; see `error_code`.
    Failed,
    /// Canceled before completion.
    Canceled,
}

impl BulkOperationStatus {
    /// The upstream API's string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for BulkOperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point-in-time snapshot of an upstream bulk operation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperation {
    /// The operation's GID.
    pub id: String,
    /// Current status.
    pub status: BulkOperationStatus,
    /// Upstream error code, present when the operation failed.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Objects written to the result file so far.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub object_count: u64,
    /// Result file size in bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_size: u64,
    /// Signed download URL for the result file; absent until completion
    /// and again once the file ages out.
    #[serde(default)]
    pub url: Option<String>,
    /// When the operation was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the operation completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl BulkOperation {
    /// Parses an operation from the GraphQL node value.
    ///
    /// # Errors
    ///
    /// Returns the reason when the value does not match the expected
    /// operation shape.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }

    /// Derives a human-readable progress phrase from the snapshot.
    #[must_use]
    pub fn progress_phrase(&self) -> String {
        match self.status {
            BulkOperationStatus::Created => "Waiting for the export to start".to_string(),
            BulkOperationStatus::Running => {
                format!("Export in progress, {} objects so far", self.object_count)
            }
            BulkOperationStatus::Completed => {
                format!("Export complete, {} objects available", self.object_count)
            }
            BulkOperationStatus::Failed => match &self.error_code {
                Some(code) => format!("Export failed ({code})"),
                None => "Export failed".to_string(),
            },
            BulkOperationStatus::Canceled => "Export was canceled".to_string(),
        }
    }

    /// When the result file expires: `completed_at + 7 days` (UTC).
    ///
    /// Computed client-side, not authoritative; `None` until the
    /// operation has a completion time.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
            .map(|completed| completed + Duration::days(RESULT_RETENTION_DAYS))
    }
}

/// Accepts the `UnsignedInt64` scalar as either a JSON string or number.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

/// Normalizes a bulk operation id to its GID form.
///
/// Bare numeric ids become `gid://shopify/BulkOperation/{id}`; values
/// already in GID form pass through untouched.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::bulk::bulk_operation_gid;
///
/// assert_eq!(
///     bulk_operation_gid("123"),
///     "gid://shopify/BulkOperation/123"
/// );
/// assert_eq!(
///     bulk_operation_gid("gid://shopify/BulkOperation/123"),
///     "gid://shopify/BulkOperation/123"
/// );
/// ```
#[must_use]
pub fn bulk_operation_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("gid://shopify/BulkOperation/{id}")
    }
}

/// Formats a byte count for display.
///
/// Binary thresholds: below 1024 → `"{n} bytes"`, below 1 MiB →
/// `"{:.2} KB"`, otherwise `"{:.2} MB"`.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::bulk::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 bytes");
/// assert_eq!(format_bytes(2048), "2.00 KB");
/// assert_eq!(format_bytes(5_242_880), "5.00 MB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{bytes} bytes")
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}
