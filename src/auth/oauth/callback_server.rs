//! One-shot local HTTP listener for the OAuth redirect.
//!
//! [`await_callback`] binds a localhost listener, waits for exactly one
//! `GET /callback` carrying `code`, `state`, and `shop` query parameters,
//! and resolves or rejects based on the state comparison. The listener is
//! torn down on every exit path (success, CSRF mismatch, malformed
//! callback, or timeout) so the port is always released. A duplicate or
//! retried browser redirect after resolution finds the port closed.
//!
//! The one-shot behavior is built from a [`tokio::sync::oneshot`] channel
//! signaled from the request handler, raced against a timer; the server
//! itself is a single-route [`axum`] router with graceful shutdown.

use crate::auth::oauth::error::OAuthError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// The fixed local port the redirect URI points at.
pub const CALLBACK_PORT: u16 = 3456;

/// The fixed callback path.
pub const CALLBACK_PATH: &str = "/callback";

/// How long to wait for the browser redirect before giving up.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Static page served to the browser on a successful callback.
const SUCCESS_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>Authorization complete</title></head>\n<body>\n<h1>Authorization complete</h1>\n<p>The access token has been received. You can close this tab and return to your terminal.</p>\n</body>\n</html>\n";

/// Parameters extracted from a valid OAuth callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackParams {
    /// The authorization code to exchange for an access token.
    pub code: String,
    /// The shop domain echoed back by Shopify.
    pub shop: String,
}

/// Shared state between the listener and the waiting flow.
struct CallbackState {
    expected_state: String,
    // Taken by the first matching request; one-shot by construction.
    result_tx: Mutex<Option<oneshot::Sender<Result<CallbackParams, OAuthError>>>>,
}

/// Waits for exactly one OAuth callback on `127.0.0.1:{port}`.
///
/// Blocks the invoking task until one of the terminal outcomes below, then
/// shuts the listener down and returns:
///
/// - matching `state` with `code` and `shop` present → `Ok(CallbackParams)`
///   (the browser receives a static success page);
/// - mismatched `state` → [`OAuthError::StateMismatch`] (browser gets 400);
/// - missing `state`, `code`, or `shop` → [`OAuthError::InvalidCallback`]
///   (browser gets 400);
/// - no request within `wait` → [`OAuthError::Timeout`].
///
/// Requests to any other path get a 404 and do not resolve the wait.
///
/// # Errors
///
/// Besides the outcomes above, returns [`OAuthError::CallbackServer`] when
/// the port cannot be bound.
pub async fn await_callback(
    expected_state: impl Into<String>,
    port: u16,
    wait: Duration,
) -> Result<CallbackParams, OAuthError> {
    let (result_tx, result_rx) = oneshot::channel();
    let state = Arc::new(CallbackState {
        expected_state: expected_state.into(),
        result_tx: Mutex::new(Some(result_tx)),
    });

    let app = Router::new()
        .route(CALLBACK_PATH, get(handle_callback))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::debug!(port, "callback listener bound");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = match tokio::time::timeout(wait, result_rx).await {
        Ok(Ok(outcome)) => outcome,
        // Channel closed without a send, or the window elapsed.
        Ok(Err(_)) | Err(_) => Err(OAuthError::Timeout {
            seconds: wait.as_secs(),
        }),
    };

    // Tear down on every exit path so the port is released.
    let _ = shutdown_tx.send(());
    let _ = server.await;
    tracing::debug!(port, "callback listener closed");

    outcome
}

/// Handles the single expected callback request.
async fn handle_callback(
    State(state): State<Arc<CallbackState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let outcome = evaluate_callback(&state.expected_state, &params);

    let response = match &outcome {
        Ok(_) => Html(SUCCESS_PAGE).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    // Only the first request finds the sender; later ones just get a page.
    let sender = state.result_tx.lock().ok().and_then(|mut tx| tx.take());
    if let Some(tx) = sender {
        let _ = tx.send(outcome);
    }

    response
}

/// Applies the callback acceptance rules.
fn evaluate_callback(
    expected_state: &str,
    params: &HashMap<String, String>,
) -> Result<CallbackParams, OAuthError> {
    let received_state = params
        .get("state")
        .ok_or_else(|| OAuthError::InvalidCallback {
            reason: "missing 'state' parameter".to_string(),
        })?;

    if received_state != expected_state {
        return Err(OAuthError::StateMismatch {
            expected: expected_state.to_string(),
            received: received_state.clone(),
        });
    }

    let code = params
        .get("code")
        .filter(|code| !code.is_empty())
        .ok_or_else(|| OAuthError::InvalidCallback {
            reason: "missing 'code' parameter".to_string(),
        })?;

    let shop = params
        .get("shop")
        .filter(|shop| !shop.is_empty())
        .ok_or_else(|| OAuthError::InvalidCallback {
            reason: "missing 'shop' parameter".to_string(),
        })?;

    Ok(CallbackParams {
        code: code.clone(),
        shop: shop.clone(),
    })
}

// Verify CallbackParams is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CallbackParams>();
};
