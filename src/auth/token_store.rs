//! On-disk credential store for acquired access tokens.
//!
//! Tokens are persisted as a single JSON file mapping shop domain to a
//! [`TokenRecord`], created with owner-only permissions. Shopify admin
//! tokens obtained through the authorization-code flow are long-lived, so
//! records are never expired or refreshed here; a new OAuth flow simply
//! overwrites the record for its domain.
//!
//! # Resilience
//!
//! Reading is deliberately forgiving: a missing file or an unparseable file
//! is treated as an empty store, never an error. Damage is contained per
//! entry: when the file parses as a map but an individual record is
//! malformed, only that record is dropped (with a warning); records for
//! other domains survive the next rewrite.
//!
//! # Example
//!
//! ```rust,no_run
//! use shopify_gateway::auth::token_store::{TokenRecord, TokenStore};
//! use shopify_gateway::ShopDomain;
//! use chrono::Utc;
//!
//! let store = TokenStore::new(TokenStore::default_path().unwrap());
//! let domain = ShopDomain::new("my-store").unwrap();
//!
//! store.persist(&domain, &TokenRecord {
//!     access_token: "shpat_...".to_string(),
//!     scope: "read_products".to_string(),
//!     obtained_at: Utc::now(),
//! })?;
//!
//! let record = store.load(&domain)?;
//! assert!(record.is_some());
//! # Ok::<(), shopify_gateway::auth::token_store::StoreError>(())
//! ```

use crate::config::ShopDomain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A persisted access credential for one shop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// The Admin API access token.
    pub access_token: String,
    /// The scope string granted by Shopify.
    pub scope: String,
    /// When the token was obtained.
    pub obtained_at: DateTime<Utc>,
}

/// Errors that can occur while writing the credential store.
///
/// Reads never fail on missing or malformed data; only genuine I/O
/// problems (permissions, disk errors) surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error while reading or writing the store.
    #[error("credential store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store contents could not be serialized.
    #[error("credential store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed credential store keyed by shop domain.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given file path.
    ///
    /// The file and its parent directory are created lazily on the first
    /// [`persist`](Self::persist).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default per-user store location:
    /// `~/.shopify-agent-gateway/tokens.json`.
    ///
    /// Returns `None` when the home directory cannot be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".shopify-agent-gateway").join("tokens.json"))
    }

    /// Returns the path backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record for `domain`.
    ///
    /// Returns `Ok(None)` when the file does not exist, cannot be parsed,
    /// or holds no record for the domain. A malformed file is never fatal
    /// on the read path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] only for I/O failures other than the
    /// file being absent.
    pub fn load(&self, domain: &ShopDomain) -> Result<Option<TokenRecord>, StoreError> {
        Ok(self.read_records()?.remove(domain.as_ref()))
    }

    /// Inserts or replaces the record for `domain` and rewrites the file.
    ///
    /// Creates the containing directory (owner-only) and the file
    /// (owner read/write only, on unix) when absent. Records for other
    /// domains are preserved, including across a partially corrupted file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the directory or file cannot be written.
    pub fn persist(&self, domain: &ShopDomain, record: &TokenRecord) -> Result<(), StoreError> {
        let mut records = self.read_records()?;
        records.insert(domain.as_ref().to_string(), record.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }

        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(domain = %domain, path = %self.path.display(), "persisted access token");
        Ok(())
    }

    /// Reads the full domain map, salvaging what it can.
    fn read_records(&self) -> Result<BTreeMap<String, TokenRecord>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "credential store is unparseable, treating as empty"
                );
                return Ok(BTreeMap::new());
            }
        };

        let mut records = BTreeMap::new();
        for (domain, value) in raw {
            match serde_json::from_value::<TokenRecord>(value) {
                Ok(record) => {
                    records.insert(domain, record);
                }
                Err(e) => {
                    tracing::warn!(
                        domain = %domain,
                        error = %e,
                        "dropping malformed credential store entry"
                    );
                }
            }
        }
        Ok(records)
    }
}

// Verify store types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenStore>();
    assert_send_sync::<TokenRecord>();
};
