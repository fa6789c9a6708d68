//! OAuth access scope handling.
//!
//! Scopes are requested during authorization as a comma-separated list. The
//! gateway ships a fixed default set covering the resources its tools touch;
//! callers may override it with their own comma-separated list.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The scope set requested when no override is supplied.
const DEFAULT_SCOPES: &[&str] = &[
    "read_products",
    "write_products",
    "read_orders",
    "write_orders",
    "read_customers",
    "write_customers",
    "read_inventory",
    "write_inventory",
];

/// An ordered, de-duplicated set of OAuth access scopes.
///
/// Parses from and serializes to the comma-separated form Shopify's
/// authorization endpoint expects.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::AuthScopes;
///
/// let scopes: AuthScopes = "read_products, write_orders".parse().unwrap();
/// assert!(scopes.contains("read_products"));
/// assert_eq!(scopes.to_string(), "read_products,write_orders");
///
/// // The default set covers the gateway's tool surface.
/// assert!(AuthScopes::default().contains("read_orders"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthScopes {
    scopes: BTreeSet<String>,
}

impl AuthScopes {
    /// Creates an empty scope set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: BTreeSet::new(),
        }
    }

    /// Returns `true` if no scopes are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns the number of scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` if the given scope is present.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Iterates over the scopes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }
}

impl Default for AuthScopes {
    /// The gateway's fixed default scope set.
    fn default() -> Self {
        Self {
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    /// Parses a comma-separated scope list.
    ///
    /// Whitespace around entries is trimmed and duplicates collapse. An
    /// entirely empty input yields an empty set; an entry containing
    /// whitespace inside it is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = BTreeSet::new();
        for entry in s.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("scope '{entry}' contains whitespace"),
                });
            }
            scopes.insert(entry.to_string());
        }
        Ok(Self { scopes })
    }
}

impl TryFrom<String> for AuthScopes {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AuthScopes> for String {
    fn from(scopes: AuthScopes) -> Self {
        scopes.to_string()
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for scope in &self.scopes {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(scope)?;
            first = false;
        }
        Ok(())
    }
}

// Verify AuthScopes is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthScopes>();
};
