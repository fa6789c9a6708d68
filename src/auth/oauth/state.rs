//! State parameter handling for OAuth CSRF protection.
//!
//! A [`StateParam`] is a single-use random nonce generated per flow
//! invocation. It is embedded in the authorization URL, echoed back by the
//! callback, compared once, and discarded with the flow.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// OAuth state parameter for CSRF protection.
///
/// Generated with a cryptographically secure random number generator; held
/// in memory only for the lifetime of one flow invocation.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::auth::oauth::StateParam;
///
/// let state = StateParam::new();
/// assert_eq!(state.as_ref().len(), 15);
/// assert!(state.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam(String);

impl StateParam {
    /// The length of generated nonces.
    const NONCE_LENGTH: usize = 15;

    /// Creates a new state parameter with a secure random nonce.
    #[must_use]
    pub fn new() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();
        Self(nonce)
    }

    /// Wraps an existing state string, for callers managing their own nonce.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};
