//! Connection settings
//!
//! A catalog is addressed by a connection string. Two forms are accepted:
//!
//! ```text
//! file://./data/ecommerce      relative to the working directory
//! file:///var/lib/catalog      absolute
//! ./data/ecommerce             bare path
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable holding the connection string
pub const CATALOG_URI_ENV: &str = "CATALOG_URI";

/// Environment variable that turns off git history when set to `true`
pub const CATALOG_NO_HISTORY_ENV: &str = "CATALOG_NO_HISTORY";

/// Connection string used when none is configured
pub const DEFAULT_URI: &str = "file://./data/ecommerce";

const FILE_SCHEME: &str = "file://";

/// A parsed catalog connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUri {
    raw: String,
    root: PathBuf,
}

impl ConnectionUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let invalid = |reason: &str| Error::Connection {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let path = match uri.strip_prefix(FILE_SCHEME) {
            Some(path) => path,
            None if uri.contains("://") => {
                return Err(invalid("unsupported scheme (expected file://)"));
            }
            None => uri,
        };

        if path.is_empty() {
            return Err(invalid("missing database path"));
        }

        Ok(Self {
            raw: uri.to_string(),
            root: PathBuf::from(path),
        })
    }

    /// Directory holding the catalog database
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for ConnectionUri {
    fn default() -> Self {
        Self {
            raw: DEFAULT_URI.to_string(),
            root: PathBuf::from("./data/ecommerce"),
        }
    }
}

impl FromStr for ConnectionUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Options applied when a session opens the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Record every write as a git commit in the database directory
    pub history: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { history: true }
    }
}

impl ConnectOptions {
    pub fn without_history() -> Self {
        Self { history: false }
    }
}
