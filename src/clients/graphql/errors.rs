//! Error types for the GraphQL client.
//!
//! Only transport-level failures surface here. GraphQL-level errors (top
//! level `errors`, mutation `userErrors`) arrive with HTTP 200 and live in
//! the response body; callers inspect them via
//! [`GraphqlResponse`](crate::clients::graphql::GraphqlResponse).

use thiserror::Error;

/// Error type for GraphQL transport failures.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// The request could not be sent or the response body not read.
    #[error("GraphQL request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-success HTTP status.
    #[error("GraphQL endpoint returned status {status}: {message}")]
    Response {
        /// The HTTP status code returned.
        status: u16,
        /// The response body text.
        message: String,
    },
}

// Verify GraphqlError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlError>();
};
