//! Authorization-code exchange.
//!
//! After the callback delivers an authorization code, a single
//! server-to-server POST to `https://{shop}/admin/oauth/access_token`
//! exchanges it for a long-lived Admin API access token. The exchange is
//! never retried: a failure surfaces with the upstream status and body so
//! the caller can decide what to do.

use crate::auth::oauth::error::OAuthError;
use crate::auth::token_store::TokenRecord;
use crate::config::GatewayConfig;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Request body for the token exchange POST.
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Successful response from the token endpoint.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    scope: String,
}

/// Exchanges an authorization code for an access token.
///
/// Performs one POST to the configured shop's token endpoint with the
/// client credentials and the code from the callback.
///
/// # Errors
///
/// Returns [`OAuthError::TokenExchangeFailed`] carrying the upstream HTTP
/// status and body text when the response is not successful, or status 0
/// with the transport error text when the request never completed.
pub async fn exchange_code(config: &GatewayConfig, code: &str) -> Result<TokenRecord, OAuthError> {
    let token_url = format!(
        "https://{}/admin/oauth/access_token",
        config.shop_domain().as_ref()
    );
    exchange_code_at(
        &token_url,
        config.client_id().as_ref(),
        config.client_secret().as_ref(),
        code,
    )
    .await
}

/// Performs the exchange against an explicit token endpoint URL.
pub(crate) async fn exchange_code_at(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
) -> Result<TokenRecord, OAuthError> {
    let request_body = TokenExchangeRequest {
        client_id,
        client_secret,
        code,
    };

    let client = reqwest::Client::new();
    let response = client
        .post(token_url)
        .json(&request_body)
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(OAuthError::TokenExchangeFailed { status, message });
    }

    let token_response: AccessTokenResponse =
        response
            .json()
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed {
                status,
                message: format!("Failed to parse token response: {e}"),
            })?;

    tracing::info!(scope = %token_response.scope, "access token obtained");

    Ok(TokenRecord {
        access_token: token_response.access_token,
        scope: token_response.scope,
        obtained_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_successful_exchange_returns_token_record() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .and(body_partial_json(serde_json::json!({
                "client_id": "test-client-id",
                "client_secret": "test-secret",
                "code": "auth-code"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "shpat_test_token",
                "scope": "read_products,write_orders"
            })))
            .mount(&mock_server)
            .await;

        let token_url = format!("{}/admin/oauth/access_token", mock_server.uri());
        let before = Utc::now();
        let record = exchange_code_at(&token_url, "test-client-id", "test-secret", "auth-code")
            .await
            .unwrap();

        assert_eq!(record.access_token, "shpat_test_token");
        assert_eq!(record.scope, "read_products,write_orders");
        assert!(record.obtained_at >= before);
        assert!(record.obtained_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_non_success_status_carries_status_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
            .mount(&mock_server)
            .await;

        let token_url = format!("{}/admin/oauth/access_token", mock_server.uri());
        let result = exchange_code_at(&token_url, "id", "secret", "bad-code").await;

        assert!(matches!(
            result,
            Err(OAuthError::TokenExchangeFailed { status: 401, message }) if message.contains("invalid client")
        ));
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_an_exchange_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let token_url = format!("{}/admin/oauth/access_token", mock_server.uri());
        let result = exchange_code_at(&token_url, "id", "secret", "code").await;

        assert!(matches!(
            result,
            Err(OAuthError::TokenExchangeFailed { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_network_error_maps_to_status_zero() {
        // Nothing is listening on this port.
        let result =
            exchange_code_at("http://127.0.0.1:9/admin/oauth/access_token", "i", "s", "c").await;

        assert!(matches!(
            result,
            Err(OAuthError::TokenExchangeFailed { status: 0, .. })
        ));
    }
}
