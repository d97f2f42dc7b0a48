//! Path classification and S3 locator parsing
//!
//! Classifies an argument as a local filesystem path or an S3 object locator
//! of the form: s3://{bucket}+{namespace}.{host}:{port}/{key-prefix}
//! The namespace segment is optional; providers without namespace support use
//! s3://{bucket}+{host}:{port}/{key-prefix}.

use crate::error::{Error, Result};

/// A parsed S3 object locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocator {
    /// Bucket name
    pub bucket: String,
    /// Optional provider namespace, joined in front of the host on the wire.
    ///
    /// A namespace label cannot be told apart from a host label textually, so
    /// parsing leaves this unset and keeps the full dotted authority in
    /// `host`. It exists for callers that construct locators programmatically
    /// for providers with namespace support.
    pub namespace: Option<String>,
    /// Endpoint host
    pub host: String,
    /// Endpoint port
    pub port: u16,
    /// Key prefix used to filter object keys (may be empty)
    pub key_prefix: String,
}

impl ObjectLocator {
    /// Create a new ObjectLocator
    pub fn new(
        bucket: impl Into<String>,
        namespace: Option<String>,
        host: impl Into<String>,
        port: u16,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            namespace,
            host: host.into(),
            port,
            key_prefix: key_prefix.into(),
        }
    }

    /// The endpoint authority, `[namespace.]host:port`
    pub fn authority(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}:{}", ns, self.host, self.port),
            None => format!("{}:{}", self.host, self.port),
        }
    }

    /// Whether two locators point at the same endpoint
    pub fn same_endpoint(&self, other: &ObjectLocator) -> bool {
        self.authority() == other.authority()
    }
}

impl std::fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "s3://{}+{}/{}",
            self.bucket,
            self.authority(),
            self.key_prefix
        )
    }
}

/// A classified path argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Local filesystem path (possibly a glob pattern)
    Local(std::path::PathBuf),
    /// S3 object locator
    Remote(ObjectLocator),
}

impl Location {
    /// Check if this is a remote location
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Remote(_))
    }

    /// Get the locator if this is a remote location
    pub fn as_remote(&self) -> Option<&ObjectLocator> {
        match self {
            Location::Remote(l) => Some(l),
            Location::Local(_) => None,
        }
    }

    /// Get the path if this is a local location
    pub fn as_local(&self) -> Option<&std::path::PathBuf> {
        match self {
            Location::Local(p) => Some(p),
            Location::Remote(_) => None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Local(p) => write!(f, "{}", p.display()),
            Location::Remote(l) => write!(f, "{l}"),
        }
    }
}

/// Parse a path string into a Location
///
/// Anything without the `s3://` scheme is a local path. A scheme prefix with
/// a remainder that cannot be decomposed into bucket, host, and port is a
/// format error.
pub fn parse_location(path: &str) -> Result<Location> {
    if path.is_empty() {
        return Err(Error::Format("Path cannot be empty".into()));
    }

    let Some(rest) = path.strip_prefix("s3://") else {
        return Ok(Location::Local(std::path::PathBuf::from(path)));
    };

    let (authority, key_prefix) = match rest.split_once('/') {
        Some((a, k)) => (a, k),
        None => (rest, ""),
    };

    // Bucket names may themselves contain '+', so split at the last one.
    let Some((bucket, endpoint)) = authority.rsplit_once('+') else {
        return Err(malformed(path));
    };
    if bucket.is_empty() {
        return Err(malformed(path));
    }

    let Some((host, port)) = endpoint.rsplit_once(':') else {
        return Err(malformed(path));
    };
    if host.is_empty() {
        return Err(malformed(path));
    }
    let port: u16 = port.parse().map_err(|_| malformed(path))?;

    Ok(Location::Remote(ObjectLocator::new(
        bucket, None, host, port, key_prefix,
    )))
}

fn malformed(path: &str) -> Error {
    Error::Format(format!(
        "'{path}' does not match 's3://{{bucket}}+{{namespace}}.{{host}}:{{port}}/{{key-prefix}}'"
    ))
}
