//! Authentication for the gateway.
//!
//! This module covers everything between "no credential" and "a usable
//! Admin API access token":
//!
//! - [`oauth`]: the interactive authorization-code flow, from authorization
//!   URL through the local callback listener to the code exchange
//! - [`token_store`]: the per-domain on-disk credential store
//! - [`AuthScopes`]: OAuth scope handling with the gateway's default set
//!
//! # Flow
//!
//! ```rust,ignore
//! use shopify_gateway::auth::oauth::run_oauth_flow;
//! use shopify_gateway::auth::token_store::TokenStore;
//!
//! let store = TokenStore::new(TokenStore::default_path().unwrap());
//! let record = run_oauth_flow(&config, &store).await?;
//! println!("granted scopes: {}", record.scope);
//! ```

pub mod oauth;
pub mod token_store;

mod scopes;

pub use scopes::AuthScopes;
pub use token_store::{StoreError, TokenRecord, TokenStore};
