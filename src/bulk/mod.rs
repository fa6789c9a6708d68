//! Bulk data export over the Admin API's bulk operation machinery.
//!
//! # Overview
//!
//! Large reads go through bulk operations instead of paginated
//! queries. The shop runs the query server-side and publishes a JSONL
//! file; this module submits those queries, polls their progress, and
//! retrieves and parses the result file.
//!
//! - [`ExportType`] and [`ExportOptions`] describe what to export.
//! - [`BulkExporter`] drives submit, status, and retrieval.
//! - [`BulkOperation`] is a point-in-time snapshot of an upstream job.
//!
//! # Example
//!
//! ```rust,no_run
//! use shopify_gateway::bulk::{BulkExporter, ExportOptions, ExportType};
//! use shopify_gateway::clients::GraphqlClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphqlClient::with_endpoint(
//!     "https://my-store.myshopify.com/admin/api/2025-07/graphql.json",
//!     "shpat_example",
//! );
//! let exporter = BulkExporter::new(client);
//! let started = exporter
//!     .start_export(ExportType::Orders, &ExportOptions::default())
//!     .await?;
//! println!("export {} is {}", started.id, started.status);
//! # Ok(())
//! # }
//! ```

mod error;
mod exporter;
mod operation;
mod query;

pub use error::BulkError;
pub use exporter::{
    BulkExporter, ExportResults, ExportSummary, ResultFormat, StartedExport, FULL_RESULT_CAP,
};
pub use operation::{bulk_operation_gid, format_bytes, BulkOperation, BulkOperationStatus};
pub use query::{build_export_query, ExportOptions, ExportType};
