//! Endpoint scheme and trust resolution
//!
//! An S3 locator names only an authority (`host:port`); whether the endpoint
//! speaks verifiable TLS is probed once per endpoint before the SDK client is
//! built. A custom CA bundle, when given, becomes the sole trust root.
//! Endpoints that cannot be verified are reached over cleartext http when the
//! user allows it, mirroring the tool's documented fallback order.

use std::path::{Path, PathBuf};

use syncer_core::{EndpointCredentials, Error, Result};

/// How the endpoint is trusted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS verified against the system trust store
    System,
    /// TLS verified against a custom CA bundle only
    CustomCa(PathBuf),
    /// Plain http fallback
    Cleartext,
}

/// A probed endpoint, ready to hand to the SDK
#[derive(Debug, Clone)]
pub struct ResolvedEndpoint {
    /// Full endpoint URL including scheme
    pub url: String,
    pub tls: TlsMode,
}

/// Probe `authority` and decide scheme and trust material.
///
/// Order: https verified with the custom CA bundle (system roots when none is
/// given or the bundle file is missing); then cleartext http, allowed when no
/// bundle was supplied or `insecure` is set. Anything else is a transport
/// error.
pub async fn resolve_endpoint(
    authority: &str,
    credentials: &EndpointCredentials,
    insecure: bool,
) -> Result<ResolvedEndpoint> {
    let cert = effective_cert(credentials.cert.as_deref());
    let https_url = format!("https://{authority}");

    if probe(&https_url, cert).await {
        let tls = match cert {
            Some(path) => TlsMode::CustomCa(path.to_path_buf()),
            None => TlsMode::System,
        };
        return Ok(ResolvedEndpoint { url: https_url, tls });
    }

    if insecure || cert.is_none() {
        tracing::warn!(authority, "could not verify TLS, using http instead");
        return Ok(ResolvedEndpoint {
            url: format!("http://{authority}"),
            tls: TlsMode::Cleartext,
        });
    }

    Err(Error::Transport(format!(
        "Could not establish a verified TLS connection to {authority}"
    )))
}

/// A certificate path counts only if the file actually exists; otherwise the
/// system trust store is used, matching the tool's lenient handling.
fn effective_cert(cert: Option<&Path>) -> Option<&Path> {
    match cert {
        Some(path) if path.exists() => Some(path),
        Some(path) => {
            tracing::warn!(cert = %path.display(), "certificate file not found, using system trust store");
            None
        }
        None => None,
    }
}

async fn probe(url: &str, cert: Option<&Path>) -> bool {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .connect_timeout(std::time::Duration::from_secs(5));

    if let Some(path) = cert {
        let pem = match std::fs::read(path) {
            Ok(pem) => pem,
            Err(_) => return false,
        };
        let certificate = match reqwest::Certificate::from_pem(&pem) {
            Ok(c) => c,
            Err(_) => return false,
        };
        builder = builder
            .tls_built_in_root_certs(false)
            .add_root_certificate(certificate);
    }

    let Ok(client) = builder.build() else {
        return false;
    };

    // Any HTTP response means the connection (and TLS handshake) succeeded.
    client.get(url).send().await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_cert_missing_file_falls_back() {
        let path = PathBuf::from("/definitely/not/here.pem");
        assert_eq!(effective_cert(Some(&path)), None);
    }

    #[test]
    fn test_effective_cert_existing_file_kept() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(effective_cert(Some(file.path())), Some(file.path()));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_without_cert_downgrades_to_http() {
        let credentials = EndpointCredentials {
            access_key: "ak".into(),
            secret_key: "sk".into(),
            cert: None,
        };
        // Reserved TEST-NET address, nothing listens there.
        let endpoint = resolve_endpoint("192.0.2.1:1", &credentials, false)
            .await
            .unwrap();
        assert_eq!(endpoint.url, "http://192.0.2.1:1");
        assert_eq!(endpoint.tls, TlsMode::Cleartext);
    }
}
