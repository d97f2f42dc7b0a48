//! syncer-s3: S3 SDK adapter for the s3-syncer CLI
//!
//! This crate provides the implementation of the ObjectStore trait
//! using the aws-sdk-s3 crate, plus endpoint scheme probing and TLS
//! trust configuration. It is the only crate that directly depends on
//! the AWS SDK.

pub mod client;
pub mod endpoint;

pub use client::S3Client;
pub use endpoint::{resolve_endpoint, ResolvedEndpoint, TlsMode};
