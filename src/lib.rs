//! # Shopify Agent Gateway
//!
//! A gateway core for the Shopify GraphQL Admin API: interactive OAuth
//! authorization with a local callback listener, on-disk credential
//! storage, a GraphQL client, and a bulk export pipeline for large
//! data sets.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GatewayConfig`] and [`GatewayConfigBuilder`]
//! - Validated newtypes for OAuth credentials and shop domains
//! - The interactive authorization-code flow via [`auth::oauth`],
//!   including a one-shot localhost callback server
//! - A per-domain credential store via [`auth::token_store`]
//! - An authenticated Admin API GraphQL client via [`clients::graphql`]
//! - Bulk exports of products, orders, customers, and inventory via [`bulk`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_gateway::{ClientId, ClientSecret, GatewayConfig, ShopDomain};
//!
//! // Configure the gateway with the builder pattern
//! let config = GatewayConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .shop_domain(ShopDomain::new("my-store").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Authorizing
//!
//! The interactive flow opens the shop's grant screen in a browser,
//! catches the redirect on `localhost`, exchanges the code, and
//! persists the resulting token:
//!
//! ```rust,ignore
//! use shopify_gateway::auth::oauth::run_oauth_flow;
//! use shopify_gateway::auth::TokenStore;
//!
//! let store = TokenStore::new(TokenStore::default_path().unwrap());
//! let record = run_oauth_flow(&config, &store).await?;
//! println!("granted scopes: {}", record.scope);
//! ```
//!
//! ## Exporting Data
//!
//! Bulk exports run asynchronously on the platform; submit one, poll
//! its status, then retrieve the JSONL results:
//!
//! ```rust,ignore
//! use shopify_gateway::bulk::{BulkExporter, ExportOptions, ExportType, ResultFormat};
//! use shopify_gateway::clients::GraphqlClient;
//!
//! let client = GraphqlClient::new(&config, access_token);
//! let exporter = BulkExporter::new(client);
//!
//! let started = exporter
//!     .start_export(ExportType::Products, &ExportOptions::default())
//!     .await?;
//!
//! loop {
//!     if let Some(op) = exporter.get_status(Some(&started.id)).await? {
//!         println!("{}", op.progress_phrase());
//!         if op.status == shopify_gateway::bulk::BulkOperationStatus::Completed {
//!             break;
//!         }
//!     }
//!     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
//! }
//!
//! let results = exporter
//!     .get_results(Some(&started.id), ResultFormat::Sample, 10)
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Single-call operations**: The gateway never waits on the
//!   platform; polling cadence belongs to the caller

pub mod auth;
pub mod bulk;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{AuthScopes, StoreError, TokenRecord, TokenStore};
pub use config::{
    ApiVersion, ClientId, ClientSecret, GatewayConfig, GatewayConfigBuilder, ShopDomain,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::{GraphqlClient, GraphqlError, GraphqlResponse};

// Re-export OAuth types for convenience
pub use auth::oauth::{
    await_callback, begin_auth, exchange_code, run_oauth_flow, BeginAuthResult, CallbackParams,
    OAuthError, StateParam,
};

// Re-export the bulk export surface
pub use bulk::{
    BulkError, BulkExporter, BulkOperation, BulkOperationStatus, ExportOptions, ExportResults,
    ExportType, ResultFormat,
};
