//! syncer-core: Core library for the s3-syncer CLI
//!
//! This crate provides the SDK-independent functionality of s3-syncer:
//! - Path classification and S3 locator parsing
//! - Local glob expansion
//! - Prefix resolution over flat key namespaces
//! - Transfer task classification and batch result accumulation
//! - Credential and certificate configuration
//! - The ObjectStore trait for S3 operations
//!
//! It knows nothing about any specific S3 SDK, allowing the transfer logic
//! to be exercised against an in-memory store in tests.

pub mod batch;
pub mod config;
pub mod error;
pub mod expand;
pub mod locator;
pub mod resolve;
pub mod task;
pub mod traits;

pub use batch::{BatchOutcome, FailureRecord};
pub use config::{EndpointCredentials, SyncConfig};
pub use error::{Error, Result};
pub use expand::{expand_source, Expansion};
pub use locator::{parse_location, Location, ObjectLocator};
pub use resolve::{relative_suffix, resolve, segment_extension, ResolvedKeySet};
pub use task::{TransferMode, TransferTask};
pub use traits::{list_all_keys, ListOptions, ListResult, ObjectInfo, ObjectStore};
