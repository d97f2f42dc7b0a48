//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from syncer-core.

use async_trait::async_trait;

use syncer_core::{
    EndpointCredentials, Error, ListOptions, ListResult, ObjectInfo, ObjectLocator, ObjectStore,
    Result,
};

use crate::endpoint::{resolve_endpoint, ResolvedEndpoint, TlsMode};

/// S3 client wrapper for one endpoint
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Probe the locator's endpoint and build a client for it
    pub async fn connect(
        locator: &ObjectLocator,
        credentials: &EndpointCredentials,
        insecure: bool,
    ) -> Result<Self> {
        let endpoint = resolve_endpoint(&locator.authority(), credentials, insecure).await?;
        Self::with_endpoint(&endpoint, credentials).await
    }

    /// Build a client against an already resolved endpoint
    pub async fn with_endpoint(
        endpoint: &ResolvedEndpoint,
        credentials: &EndpointCredentials,
    ) -> Result<Self> {
        let sdk_credentials = aws_credential_types::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3-syncer-static-credentials",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(sdk_credentials)
            .region(aws_config::Region::new("us-east-1"))
            .endpoint_url(&endpoint.url);

        // A custom CA bundle becomes the sole trust root of the SDK's
        // HTTP client, matching what the probe verified against.
        if let TlsMode::CustomCa(path) = &endpoint.tls {
            let pem = std::fs::read(path)?;
            let trust_store =
                aws_smithy_http_client::tls::TrustStore::empty().with_pem_certificate(pem);
            let tls_context = aws_smithy_http_client::tls::TlsContext::builder()
                .with_trust_store(trust_store)
                .build()
                .map_err(|e| Error::Transport(format!("Invalid TLS configuration: {e}")))?;
            let http_client = aws_smithy_http_client::Builder::new()
                .tls_provider(aws_smithy_http_client::tls::Provider::Rustls(
                    aws_smithy_http_client::tls::rustls_provider::CryptoMode::AwsLc,
                ))
                .tls_context(tls_context)
                .build_https();
            loader = loader.http_client(http_client);
        }

        let config = loader.load().await;

        // Path-style addressing: the bucket is not part of the endpoint DNS
        // name in the locator format.
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

fn classify_error(err: impl std::fmt::Display, identifier: &str) -> Error {
    let err_str = err.to_string();
    if err_str.contains("NotFound") || err_str.contains("NoSuchKey") || err_str.contains("NoSuchBucket")
    {
        Error::NotFound(identifier.to_string())
    } else {
        Error::Transport(err_str)
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<ListResult> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }
        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(aws_sdk_s3::error::DisplayErrorContext(&e), bucket))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let key = object.key().unwrap_or_default();
                let mut info = ObjectInfo::file(key, object.size().unwrap_or(0));
                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }
                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }
                info
            })
            .collect();

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_error(aws_sdk_s3::error::DisplayErrorContext(&e), key))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(aws_sdk_s3::error::DisplayErrorContext(&e), key))?;

        let mut info = ObjectInfo::file(key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_error(aws_sdk_s3::error::DisplayErrorContext(&e), key))?;

        Ok(())
    }

    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()> {
        let copy_source = format!("{src_bucket}/{src_key}");

        self.inner
            .copy_object()
            .copy_source(&copy_source)
            .bucket(dst_bucket)
            .key(dst_key)
            .send()
            .await
            .map_err(|e| classify_error(aws_sdk_s3::error::DisplayErrorContext(&e), src_key))?;

        Ok(())
    }
}
