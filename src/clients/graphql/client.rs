//! GraphQL client for the Shopify Admin API.

use crate::clients::graphql::GraphqlError;
use crate::config::GatewayConfig;
use serde::Deserialize;
use serde_json::Value;

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// The shared GraphQL request client.
///
/// Configured once with the shop's endpoint and access token, then passed
/// by reference into each component's constructor; there is no hidden
/// process-wide client handle, so every component can be tested against a
/// mock endpoint via [`with_endpoint`](Self::with_endpoint).
///
/// Each call is a single POST with no retries; callers decide whether a
/// failed call is worth repeating.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync` and cheap to clone.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_gateway::clients::graphql::GraphqlClient;
/// use serde_json::json;
///
/// let client = GraphqlClient::new(&config, "shpat_...");
///
/// let response = client
///     .query(
///         "query GetProduct($id: ID!) { product(id: $id) { title } }",
///         Some(json!({ "id": "gid://shopify/Product/123" })),
///     )
///     .await?;
///
/// if let Some(errors) = &response.errors {
///     println!("GraphQL errors: {errors}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

/// A parsed GraphQL response envelope.
///
/// GraphQL-level errors arrive with HTTP 200; they are carried here rather
/// than surfaced as [`GraphqlError`].
#[derive(Clone, Debug, Deserialize)]
pub struct GraphqlResponse {
    /// The query result data, if any.
    #[serde(default)]
    pub data: Option<Value>,
    /// Top-level GraphQL errors, if any.
    #[serde(default)]
    pub errors: Option<Value>,
    /// Query cost and other extension metadata.
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphqlResponse {
    /// Joins top-level GraphQL error messages, if any.
    #[must_use]
    pub fn error_messages(&self) -> Option<String> {
        let errors = self.errors.as_ref()?.as_array()?;
        if errors.is_empty() {
            return None;
        }
        let joined = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }

    /// Concatenates a mutation's `userErrors` into `field: message` pairs.
    ///
    /// `user_errors` is the array found at the given mutation payload key
    /// under `data` (e.g. `data.bulkOperationRunQuery.userErrors`).
    /// Returns `None` when the array is absent or empty.
    #[must_use]
    pub fn user_errors(&self, mutation: &str) -> Option<String> {
        let errors = self
            .data
            .as_ref()?
            .get(mutation)?
            .get("userErrors")?
            .as_array()?;
        if errors.is_empty() {
            return None;
        }
        let joined = errors
            .iter()
            .map(|e| {
                let field = e
                    .get("field")
                    .map(|f| match f {
                        Value::Array(parts) => parts
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join("."),
                        other => other.as_str().unwrap_or_default().to_string(),
                    })
                    .filter(|f| !f.is_empty());
                let message = e
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                match field {
                    Some(field) => format!("{field}: {message}"),
                    None => message.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

impl GraphqlClient {
    /// Creates a client for the configured shop and access token.
    ///
    /// The endpoint is
    /// `https://{domain}/admin/api/{version}/graphql.json`.
    #[must_use]
    pub fn new(config: &GatewayConfig, access_token: impl Into<String>) -> Self {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.shop_domain().as_ref(),
            config.api_version()
        );
        Self::with_endpoint(endpoint, access_token)
    }

    /// Creates a client against an explicit endpoint URL.
    ///
    /// The seam used by tests to point the client at a mock server.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }

    /// Returns the endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes one GraphQL query or mutation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Request`] for transport failures and
    /// [`GraphqlError::Response`] for non-2xx statuses. GraphQL-level
    /// errors are *not* errors here; inspect the returned
    /// [`GraphqlResponse`].
    pub async fn query(
        &self,
        document: &str,
        variables: Option<Value>,
    ) -> Result<GraphqlResponse, GraphqlError> {
        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        tracing::debug!(endpoint = %self.endpoint, "sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GraphqlError::Response {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GraphqlResponse>().await?)
    }
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret, ShopDomain};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> GatewayConfig {
        GatewayConfig::builder()
            .client_id(ClientId::new("test-client-id").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .shop_domain(ShopDomain::new("test-shop").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_builds_versioned_endpoint() {
        let config = create_test_config();
        let client = GraphqlClient::new(&config, "token");
        assert_eq!(
            client.endpoint(),
            format!(
                "https://test-shop.myshopify.com/admin/api/{}/graphql.json",
                config.api_version()
            )
        );
    }

    #[test]
    fn test_graphql_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphqlClient>();
    }

    #[tokio::test]
    async fn test_query_sends_access_token_header() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql.json"))
            .and(header("X-Shopify-Access-Token", "secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "shop": { "name": "Test Shop" } }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GraphqlClient::with_endpoint(
            format!("{}/graphql.json", mock_server.uri()),
            "secret-token",
        );
        let response = client
            .query("query { shop { name } }", None)
            .await
            .unwrap();

        assert_eq!(response.data.unwrap()["shop"]["name"], "Test Shop");
        assert!(response.errors.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_response_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&mock_server)
            .await;

        let client =
            GraphqlClient::with_endpoint(format!("{}/graphql.json", mock_server.uri()), "t");
        let result = client.query("query { shop { name } }", None).await;

        assert!(matches!(
            result,
            Err(GraphqlError::Response { status: 401, message }) if message.contains("unauthorized")
        ));
    }

    #[test]
    fn test_error_messages_joins_top_level_errors() {
        let response: GraphqlResponse = serde_json::from_value(serde_json::json!({
            "errors": [
                { "message": "Field 'bogus' doesn't exist" },
                { "message": "Parse error" }
            ]
        }))
        .unwrap();

        assert_eq!(
            response.error_messages().unwrap(),
            "Field 'bogus' doesn't exist; Parse error"
        );
    }

    #[test]
    fn test_user_errors_concatenates_field_message_pairs() {
        let response: GraphqlResponse = serde_json::from_value(serde_json::json!({
            "data": {
                "bulkOperationRunQuery": {
                    "bulkOperation": null,
                    "userErrors": [
                        { "field": ["query"], "message": "A bulk query operation is already in progress" },
                        { "field": null, "message": "Something else" }
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(
            response.user_errors("bulkOperationRunQuery").unwrap(),
            "query: A bulk query operation is already in progress; Something else"
        );
    }

    #[test]
    fn test_user_errors_none_when_empty() {
        let response: GraphqlResponse = serde_json::from_value(serde_json::json!({
            "data": { "bulkOperationRunQuery": { "userErrors": [] } }
        }))
        .unwrap();

        assert!(response.user_errors("bulkOperationRunQuery").is_none());
    }
}
