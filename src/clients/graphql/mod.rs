//! GraphQL client for the Shopify Admin API.
//!
//! The gateway issues opaque query/mutation documents with variable bags
//! through one shared [`GraphqlClient`] and receives parsed JSON back. The
//! only HTTP the gateway performs outside this client is deliberate: the
//! OAuth token-exchange POST, the bulk result-file GET, and the local
//! callback listener.
//!
//! # Response Structure
//!
//! A [`GraphqlResponse`] carries the standard envelope fields:
//!
//! - `data`: the query result
//! - `errors`: top-level GraphQL errors (still HTTP 200)
//! - `extensions`: query cost metadata
//!
//! Mutation validation failures (`userErrors`) are part of `data`;
//! [`GraphqlResponse::user_errors`] concatenates them into the uniform
//! `field: message` error surface.

mod client;
mod errors;

pub use client::{GraphqlClient, GraphqlResponse};
pub use errors::GraphqlError;
