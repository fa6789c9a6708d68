//! The bulk export pipeline.
//!
//! # Overview
//!
//! [`BulkExporter`] drives the three phases of an export against the
//! Admin API:
//!
//! 1. **Submit** a generated or custom bulk query via
//!    `bulkOperationRunQuery` ([`BulkExporter::start_export`]).
//! 2. **Poll** the operation by id, or the shop's current operation,
//!    for a status snapshot ([`BulkExporter::get_status`]).
//! 3. **Retrieve** the JSONL result file once the operation completes
//!    ([`BulkExporter::get_results`]), parsed leniently and shaped as a
//!    summary, a sample, or a capped full record set.
//!
//! The exporter never waits on the platform. Each call is a single
//! round trip; polling cadence is the caller's concern.
//!
//! # Example
//!
//! ```rust,no_run
//! use shopify_gateway::bulk::{BulkExporter, ExportOptions, ExportType, ResultFormat};
//! use shopify_gateway::clients::GraphqlClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphqlClient::with_endpoint(
//!     "https://my-store.myshopify.com/admin/api/2025-07/graphql.json",
//!     "shpat_example",
//! );
//! let exporter = BulkExporter::new(client);
//!
//! let started = exporter
//!     .start_export(ExportType::Products, &ExportOptions::default())
//!     .await?;
//! println!("submitted {}", started.id);
//!
//! if let Some(op) = exporter.get_status(Some(&started.id)).await? {
//!     println!("{}", op.progress_phrase());
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::bulk::error::BulkError;
use crate::bulk::operation::{
    bulk_operation_gid, format_bytes, BulkOperation, BulkOperationStatus,
};
use crate::bulk::query::{build_export_query, ExportOptions, ExportType};
use crate::clients::GraphqlClient;

/// Hard cap on records returned by [`ResultFormat::Full`].
pub const FULL_RESULT_CAP: usize = 1000;

const OPERATION_FIELDS: &str =
    "id\nstatus\nerrorCode\ncreatedAt\ncompletedAt\nobjectCount\nfileSize\nurl";

/// How much of a completed export to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultFormat {
    /// Metadata only; the result file is never fetched.
    Summary,
    /// The first `sample_size` records.
    Sample,
    /// Up to [`FULL_RESULT_CAP`] records.
    Full,
}

/// Acknowledgement returned when an export is accepted upstream.
#[derive(Clone, Debug)]
pub struct StartedExport {
    /// GID of the new bulk operation.
    pub id: String,
    /// Initial status, normally [`BulkOperationStatus::Created`].
    pub status: BulkOperationStatus,
    /// Creation time reported by the platform.
    pub created_at: Option<DateTime<Utc>>,
}

/// Metadata view of a completed export.
#[derive(Clone, Debug)]
pub struct ExportSummary {
    /// Objects in the result file.
    pub object_count: u64,
    /// Result file size in bytes.
    pub file_size: u64,
    /// The file size formatted for display.
    pub file_size_display: String,
    /// Signed download URL.
    pub url: Option<String>,
    /// When the operation completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the result file expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Results of a completed export, shaped per [`ResultFormat`].
#[derive(Clone, Debug)]
pub enum ExportResults {
    /// Metadata only.
    Summary(ExportSummary),
    /// Parsed records from the result file.
    Records {
        /// The records, in file order.
        records: Vec<Value>,
        /// How many records this response carries.
        returned: usize,
        /// Total records parsed from the file.
        total: usize,
        /// Whether the [`FULL_RESULT_CAP`] truncated the set.
        truncated: bool,
        /// Signed download URL for the complete file.
        url: Option<String>,
    },
}

/// Client for submitting and retrieving bulk exports.
///
/// Cheap to construct; holds a [`GraphqlClient`] for Admin API calls
/// and a plain HTTP client for fetching result files from storage.
pub struct BulkExporter {
    graphql: GraphqlClient,
    http: reqwest::Client,
}

impl BulkExporter {
    /// Creates an exporter over an authenticated GraphQL client.
    #[must_use]
    pub fn new(graphql: GraphqlClient) -> Self {
        Self {
            graphql,
            http: reqwest::Client::new(),
        }
    }

    /// Submits an export to the platform.
    ///
    /// Builds the bulk query for `export_type`, runs
    /// `bulkOperationRunQuery`, and returns the new operation's id and
    /// initial status. The export continues server-side; poll with
    /// [`get_status`](Self::get_status).
    ///
    /// # Errors
    ///
    /// Returns [`BulkError::Validation`] for an invalid request,
    /// [`BulkError::UpstreamRejected`] when the platform refuses the
    /// query (including `userErrors`), and [`BulkError::Graphql`] for
    /// transport failures.
    pub async fn start_export(
        &self,
        export_type: ExportType,
        options: &ExportOptions,
    ) -> Result<StartedExport, BulkError> {
        let export_query = build_export_query(export_type, options)?;
        tracing::info!(export_type = export_type.as_str(), "submitting bulk export");

        let mutation = "mutation BulkOperationRunQuery($query: String!) {\n  bulkOperationRunQuery(query: $query) {\n    bulkOperation {\n      id\n      status\n      createdAt\n    }\n    userErrors {\n      field\n      message\n    }\n  }\n}";
        let response = self
            .graphql
            .query(mutation, Some(json!({ "query": export_query })))
            .await?;

        if let Some(message) = response.error_messages() {
            return Err(BulkError::UpstreamRejected { message });
        }
        if let Some(message) = response.user_errors("bulkOperationRunQuery") {
            return Err(BulkError::UpstreamRejected { message });
        }

        let operation = response
            .data
            .as_ref()
            .and_then(|data| data.pointer("/bulkOperationRunQuery/bulkOperation"))
            .filter(|node| !node.is_null())
            .ok_or_else(|| BulkError::UpstreamRejected {
                message: "no bulk operation in response".to_string(),
            })?;
        let operation =
            BulkOperation::from_value(operation).map_err(|reason| BulkError::Malformed { reason })?;

        tracing::info!(id = %operation.id, status = %operation.status, "bulk export accepted");
        Ok(StartedExport {
            id: operation.id,
            status: operation.status,
            created_at: operation.created_at,
        })
    }

    /// Fetches a status snapshot of a bulk operation.
    ///
    /// With an id, looks up that operation; without one, asks for the
    /// shop's current (most recent query-type) operation. Returns
    /// `Ok(None)` when no matching operation exists.
    ///
    /// # Errors
    ///
    /// Returns [`BulkError::Graphql`] for transport failures and
    /// [`BulkError::UpstreamRejected`] when the platform returns
    /// errors for the lookup.
    pub async fn get_status(&self, id: Option<&str>) -> Result<Option<BulkOperation>, BulkError> {
        self.fetch_operation(id).await
    }

    /// Retrieves the results of a completed export.
    ///
    /// The operation is looked up the same way as in
    /// [`get_status`](Self::get_status): by id when one is given,
    /// otherwise the shop's current operation.
    ///
    /// [`ResultFormat::Summary`] returns metadata without touching the
    /// result file. The other formats download the file once, parse
    /// each JSONL line independently (malformed lines are skipped with
    /// a warning), and return the first `sample_size` records for
    /// [`ResultFormat::Sample`] or up to [`FULL_RESULT_CAP`] for
    /// [`ResultFormat::Full`].
    ///
    /// # Errors
    ///
    /// Returns [`BulkError::NotFound`] for an unknown operation,
    /// [`BulkError::NotCompleted`] while it is still running,
    /// [`BulkError::ResultsExpired`] once the file has aged out, and
    /// [`BulkError::Download`] when fetching the file fails.
    pub async fn get_results(
        &self,
        id: Option<&str>,
        format: ResultFormat,
        sample_size: usize,
    ) -> Result<ExportResults, BulkError> {
        let operation = self
            .fetch_operation(id)
            .await?
            .ok_or(BulkError::NotFound)?;

        if operation.status != BulkOperationStatus::Completed {
            return Err(BulkError::NotCompleted {
                status: operation.status,
            });
        }

        // A completed operation with no URL has aged out of retention.
        let Some(url) = operation.url.clone() else {
            return Err(BulkError::ResultsExpired);
        };

        if format == ResultFormat::Summary {
            return Ok(ExportResults::Summary(ExportSummary {
                object_count: operation.object_count,
                file_size: operation.file_size,
                file_size_display: format_bytes(operation.file_size),
                url: Some(url),
                completed_at: operation.completed_at,
                expires_at: operation.expires_at(),
            }));
        }

        let body = self.download_results(&url).await?;
        let records = parse_jsonl(&body);
        let total = records.len();

        let keep = if format == ResultFormat::Sample {
            sample_size.min(total)
        } else {
            FULL_RESULT_CAP.min(total)
        };
        let truncated = format == ResultFormat::Full && total > FULL_RESULT_CAP;

        let mut records = records;
        records.truncate(keep);
        Ok(ExportResults::Records {
            returned: records.len(),
            records,
            total,
            truncated,
            url: Some(url),
        })
    }

    /// Runs the node or `currentBulkOperation` lookup for a snapshot.
    async fn fetch_operation(&self, id: Option<&str>) -> Result<Option<BulkOperation>, BulkError> {
        let (document, pointer) = match id {
            Some(id) => (
                format!(
                    "{{\n  node(id: \"{}\") {{\n    ... on BulkOperation {{\n      {OPERATION_FIELDS}\n    }}\n  }}\n}}",
                    bulk_operation_gid(id)
                ),
                "/node",
            ),
            None => (
                format!("{{\n  currentBulkOperation {{\n    {OPERATION_FIELDS}\n  }}\n}}"),
                "/currentBulkOperation",
            ),
        };

        let response = self.graphql.query(&document, None).await?;
        if let Some(message) = response.error_messages() {
            return Err(BulkError::UpstreamRejected { message });
        }

        let Some(node) = response
            .data
            .as_ref()
            .and_then(|data| data.pointer(pointer))
        else {
            return Ok(None);
        };
        if node.is_null() || node.as_object().is_some_and(serde_json::Map::is_empty) {
            return Ok(None);
        }

        let operation =
            BulkOperation::from_value(node).map_err(|reason| BulkError::Malformed { reason })?;
        Ok(Some(operation))
    }

    /// Downloads the result file body from storage.
    async fn download_results(&self, url: &str) -> Result<String, BulkError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            BulkError::Download {
                status: e.status().map_or(0, |s| s.as_u16()),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        // Storage serves the file on a signed URL; a 403 there means
        // the link has aged out, not that access was denied.
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(BulkError::ResultsExpired);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BulkError::Download {
                status: status.as_u16(),
                message,
            });
        }

        response.text().await.map_err(|e| BulkError::Download {
            status: 0,
            message: e.to_string(),
        })
    }
}

/// Parses a JSONL body line by line, skipping lines that fail to parse.
fn parse_jsonl(body: &str) -> Vec<Value> {
    let mut records = Vec::new();
    for (index, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => records.push(value),
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping malformed result line");
            }
        }
    }
    records
}

// Holding an exporter across awaits must not poison task spawning.
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BulkExporter>();
};
