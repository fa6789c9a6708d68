//! Error types for the OAuth authorization-code flow.

use crate::auth::token_store::StoreError;
use thiserror::Error;

/// Errors that can occur during the interactive OAuth flow.
///
/// Every variant is terminal for the flow invocation: nothing here is
/// retried automatically, and the local callback listener is torn down on
/// each of these paths.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::auth::oauth::OAuthError;
///
/// let error = OAuthError::StateMismatch {
///     expected: "abc123".to_string(),
///     received: "xyz789".to_string(),
/// };
/// assert!(error.to_string().contains("abc123"));
/// ```
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The callback's state parameter does not match the nonce generated
    /// for this flow. The flow aborts without requesting a token.
    #[error("State parameter mismatch: expected '{expected}', received '{received}'")]
    StateMismatch {
        /// The nonce generated when the flow began.
        expected: String,
        /// The state value received in the callback.
        received: String,
    },

    /// The callback is missing a required parameter or is otherwise
    /// malformed.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what is invalid about the callback.
        reason: String,
    },

    /// No callback arrived within the wait window.
    #[error("Timed out waiting {seconds}s for the OAuth callback")]
    Timeout {
        /// The wait window that elapsed, in seconds.
        seconds: u64,
    },

    /// The token endpoint returned a non-success response.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status returned (0 for transport-level failures).
        status: u16,
        /// The response body or transport error text.
        message: String,
    },

    /// The local callback listener could not be started or torn down.
    #[error("Callback listener error: {0}")]
    CallbackServer(#[from] std::io::Error),

    /// The acquired token could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
