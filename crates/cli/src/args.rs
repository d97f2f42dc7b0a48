//! CLI argument surface
//!
//! A single-command interface: positional source and destination plus flags.

use std::path::PathBuf;

use clap::Parser;

const LOCATOR_FORM: &str = "s3://{bucket}+{namespace}.{host}:{port}/{key-prefix}";

/// Upload and download objects from and to an S3 bucket, or copy objects
/// from one S3-compatible store to another. Supports unix-like glob patterns
/// for local files and prefix search on S3 keys.
#[derive(Parser, Debug)]
#[command(name = "s3-syncer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the source object. For local files it can contain unix-like
    /// glob patterns (don't forget the quotes). An S3 path needs the form
    /// 's3://{bucket}+{namespace}.{host}:{port}/{key-prefix}'.
    pub source_path: String,

    /// Path to the destination object, local or S3. The S3 key-prefix acts
    /// as a filter, so it does not have to match an exact key or 'folder'.
    /// The namespace segment is obsolete on providers without namespaces.
    #[arg(default_value = ".")]
    pub destination_path: String,

    /// Lists objects in the given source path, without transferring anything
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Access key id for the S3 service. Alternatively use env var
    /// S3_ACCESS_KEY_ID[_N]. Repeat the flag for a second endpoint.
    #[arg(short = 'a', long = "access_key")]
    pub access_key: Vec<String>,

    /// Secret key for the S3 service. Alternatively use env var
    /// S3_SECRET_ACCESS_KEY[_N]. Repeat the flag for a second endpoint.
    #[arg(short = 's', long = "secret_key")]
    pub secret_key: Vec<String>,

    /// Deletes all objects that match the given key prefix. Only valid when
    /// the source path is an S3 locator.
    #[arg(short = 'd', long)]
    pub delete: bool,

    /// Print created objects, created local files, or deleted keys to stdout
    #[arg(long = "to-stdout")]
    pub to_stdout: bool,

    /// Path to a CA certificate to verify the endpoint with. Repeat or
    /// comma-separate for a second endpoint; a single certificate serves
    /// both connections.
    #[arg(short = 'c', long = "cert", value_delimiter = ',')]
    pub cert: Vec<PathBuf>,

    /// Fall back to an unverified connection when TLS verification fails
    #[arg(long)]
    pub insecure: bool,

    /// Suppress all output to stdout and stderr
    #[arg(long)]
    pub suppress: bool,

    /// Do not autocomplete partial key prefixes to full paths. A partial
    /// prefix like 'docs/cod' then matches nothing; a complete segment path
    /// like 'docs/coding' is required.
    #[arg(long = "no-partial-paths")]
    pub no_partial_paths: bool,
}

impl Cli {
    /// Printable locator form for error messages
    pub const fn locator_form() -> &'static str {
        LOCATOR_FORM
    }
}
