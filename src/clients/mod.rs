//! HTTP-facing clients.
//!
//! Currently a single member: the [`graphql`] client every upstream call
//! goes through.

pub mod graphql;

pub use graphql::{GraphqlClient, GraphqlError, GraphqlResponse};
