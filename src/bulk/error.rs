//! Error types for the bulk export pipeline.

use crate::bulk::operation::BulkOperationStatus;
use crate::clients::graphql::GraphqlError;
use thiserror::Error;

/// Errors that can occur in the bulk export pipeline.
///
/// Every operation either returns a well-formed success value or one of
/// these kinds with a human-readable message. Nothing is retried
/// automatically; callers decide whether a failure is worth repeating.
#[derive(Debug, Error)]
pub enum BulkError {
    /// The export request itself is invalid (detected before submission).
    #[error("Invalid export request: {reason}")]
    Validation {
        /// What is wrong with the request.
        reason: String,
    },

    /// The platform rejected the submission with user-facing validation
    /// errors (e.g. another bulk operation is already running).
    #[error("Bulk operation rejected by Shopify: {message}")]
    UpstreamRejected {
        /// Concatenated `field: message` pairs reported upstream.
        message: String,
    },

    /// No bulk operation exists for the given id, and no current
    /// operation exists for the shop.
    #[error("No bulk operation found")]
    NotFound,

    /// Results were requested before the operation finished.
    #[error("Bulk operation has not completed (status: {status})")]
    NotCompleted {
        /// The operation's current status, so the caller can decide
        /// whether to poll again.
        status: BulkOperationStatus,
    },

    /// The operation completed but its result file has aged out of the
    /// 7-day retention window.
    #[error("Bulk operation results have expired; re-run the export")]
    ResultsExpired,

    /// The result-file download failed.
    #[error("Result download failed with status {status}: {message}")]
    Download {
        /// The HTTP status returned (0 for transport-level failures).
        status: u16,
        /// The response body or transport error text.
        message: String,
    },

    /// An upstream response did not have the expected shape.
    #[error("Malformed bulk operation payload: {reason}")]
    Malformed {
        /// What part of the payload failed to parse.
        reason: String,
    },

    /// Transport-level GraphQL failure.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),
}

// Verify BulkError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BulkError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_completed_includes_status() {
        let error = BulkError::NotCompleted {
            status: BulkOperationStatus::Running,
        };
        assert!(error.to_string().contains("RUNNING"));
    }

    #[test]
    fn test_upstream_rejected_includes_message() {
        let error = BulkError::UpstreamRejected {
            message: "query: already in progress".to_string(),
        };
        assert!(error.to_string().contains("already in progress"));
    }

    #[test]
    fn test_bulk_error_implements_std_error() {
        let error: &dyn std::error::Error = &BulkError::NotFound;
        let _ = error;
    }
}
