//! Interactive OAuth authorization-code flow.
//!
//! This module implements the one-shot, process-local flow that turns an
//! app's client credentials into a persisted Admin API access token:
//!
//! 1. **Initiation** ([`begin_auth`]): generate a CSRF state nonce and the
//!    authorization URL pointing back at the local callback listener.
//! 2. **Callback** ([`await_callback`]): a short-lived localhost HTTP
//!    listener catches the browser redirect carrying the authorization
//!    code, validating the state nonce. Exactly one callback is accepted;
//!    the listener closes on every exit path.
//! 3. **Exchange** ([`exchange_code`]): one server-to-server POST swaps
//!    the code for a long-lived access token.
//! 4. **Persistence**: the token is upserted into the per-domain
//!    [`TokenStore`](crate::auth::token_store::TokenStore).
//!
//! [`run_oauth_flow`] sequences all four stages. Per flow invocation the
//! state machine is `NotStarted → AwaitingAuthorization → AwaitingExchange
//! → Persisted`, with any stage failure terminal. No two flows should run
//! concurrently in one process: both would contend for the fixed local
//! port.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_gateway::auth::oauth::run_oauth_flow;
//! use shopify_gateway::auth::token_store::TokenStore;
//!
//! let store = TokenStore::new(TokenStore::default_path().unwrap());
//! let record = run_oauth_flow(&config, &store).await?;
//! println!("token obtained at {}", record.obtained_at);
//! ```

mod begin_auth;
mod callback_server;
mod error;
mod state;
mod token_exchange;

pub use begin_auth::{begin_auth, BeginAuthResult};
pub use callback_server::{
    await_callback, CallbackParams, CALLBACK_PATH, CALLBACK_PORT, CALLBACK_TIMEOUT,
};
pub use error::OAuthError;
pub use state::StateParam;
pub use token_exchange::exchange_code;

use crate::auth::token_store::{TokenRecord, TokenStore};
use crate::config::GatewayConfig;

/// Runs the complete interactive OAuth flow and persists the result.
///
/// The callback listener is started before the browser opens, so a fast
/// redirect cannot be missed. The browser launch is best-effort; the
/// authorization URL is always logged so the user can open it manually.
///
/// # Errors
///
/// Any stage's failure aborts the flow with the corresponding
/// [`OAuthError`]; nothing is persisted except by the final, atomic
/// credential-file rewrite on success.
pub async fn run_oauth_flow(
    config: &GatewayConfig,
    store: &TokenStore,
) -> Result<TokenRecord, OAuthError> {
    let begin = begin_auth(config, None);

    // Listener first, browser second.
    let callback = tokio::spawn(await_callback(
        begin.state.as_ref().to_string(),
        CALLBACK_PORT,
        CALLBACK_TIMEOUT,
    ));

    tracing::info!(url = %begin.auth_url, "open this URL to authorize the app");
    if webbrowser::open(&begin.auth_url).is_err() {
        tracing::warn!("could not launch a browser; open the URL manually");
    }

    let params = callback
        .await
        .map_err(|e| OAuthError::CallbackServer(std::io::Error::other(e)))??;
    tracing::info!(shop = %params.shop, "authorization code received");

    let record = exchange_code(config, &params.code).await?;
    store.persist(config.shop_domain(), &record)?;

    Ok(record)
}
