//! Invocation configuration
//!
//! Credentials and certificate material are collected once at startup into an
//! immutable `SyncConfig` and passed by reference into every collaborator
//! call. Copy mode involves two endpoints; credentials and certificates are
//! indexed per endpoint, with a single supplied value serving both.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable fallbacks for the access key, unindexed and per-endpoint
const ACCESS_KEY_ENV: &str = "S3_ACCESS_KEY_ID";
/// Environment variable fallbacks for the secret key, unindexed and per-endpoint
const SECRET_KEY_ENV: &str = "S3_SECRET_ACCESS_KEY";

/// Credentials and TLS material resolved for one endpoint
#[derive(Debug, Clone)]
pub struct EndpointCredentials {
    pub access_key: String,
    pub secret_key: String,
    /// Custom CA bundle; when set it is the sole trust root for this endpoint
    pub cert: Option<PathBuf>,
}

/// Process-wide configuration, immutable after initialization
#[derive(Debug, Clone)]
pub struct SyncConfig {
    access_keys: Vec<String>,
    secret_keys: Vec<String>,
    certs: Vec<PathBuf>,
    /// Fall back to an unverified connection when TLS verification fails
    pub insecure: bool,
    /// Disable partial-path autocompletion in the prefix resolver
    pub no_partial_paths: bool,
}

impl SyncConfig {
    /// Build the configuration from CLI flag values.
    ///
    /// At most two access keys, secret keys, and certificates are accepted,
    /// one per endpoint.
    pub fn new(
        access_keys: Vec<String>,
        secret_keys: Vec<String>,
        certs: Vec<PathBuf>,
        insecure: bool,
        no_partial_paths: bool,
    ) -> Result<Self> {
        if access_keys.len() > 2 || secret_keys.len() > 2 {
            return Err(Error::Config(format!(
                "Too many access keys or secret keys given ({} access, {} secret); at most one per endpoint",
                access_keys.len(),
                secret_keys.len()
            )));
        }
        if certs.len() > 2 {
            return Err(Error::Config(format!(
                "Too many certificates given ({}); at most one per endpoint",
                certs.len()
            )));
        }

        Ok(Self {
            access_keys,
            secret_keys,
            certs,
            insecure,
            no_partial_paths,
        })
    }

    /// Resolve credentials for the endpoint at `index` (0 = source side,
    /// 1 = destination side in copy mode).
    ///
    /// Flag values take precedence; `S3_ACCESS_KEY_ID_{N}` and the unindexed
    /// `S3_ACCESS_KEY_ID` (likewise for the secret key) are the fallback.
    pub fn endpoint(&self, index: usize) -> Result<EndpointCredentials> {
        let access_key = resolve_value(
            pick(&self.access_keys, index),
            &env_var(ACCESS_KEY_ENV, index),
        )
        .ok_or_else(|| missing("access key", ACCESS_KEY_ENV, index))?;

        let secret_key = resolve_value(
            pick(&self.secret_keys, index),
            &env_var(SECRET_KEY_ENV, index),
        )
        .ok_or_else(|| missing("secret key", SECRET_KEY_ENV, index))?;

        Ok(EndpointCredentials {
            access_key,
            secret_key,
            cert: pick(&self.certs, index).cloned(),
        })
    }
}

/// The flag value for an endpoint: first for the source side, last for the
/// destination side, so a single value serves both endpoints.
fn pick<T>(values: &[T], index: usize) -> Option<&T> {
    if index == 0 {
        values.first()
    } else {
        values.last()
    }
}

fn env_var(base: &str, index: usize) -> Vec<Option<String>> {
    vec![
        std::env::var(format!("{}_{}", base, index + 1)).ok(),
        std::env::var(base).ok(),
    ]
}

fn resolve_value(flag: Option<&String>, env: &[Option<String>]) -> Option<String> {
    flag.cloned()
        .or_else(|| env.iter().flatten().next().cloned())
}

fn missing(what: &str, env: &str, index: usize) -> Error {
    Error::Config(format!(
        "No {what} given for endpoint {} (flag or {env}[_{}])",
        index + 1,
        index + 1
    ))
}
