//! Per-object result accumulation for a transfer batch
//!
//! Individual object failures do not abort the batch; they are recorded and
//! surfaced as one aggregate error after every object has been attempted.

use serde::Serialize;

use crate::error::{Error, Result};

/// A single failed object and the cause of its failure
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// Identifier of the object (key or local path)
    pub object: String,
    /// Cause of the failure
    pub cause: String,
}

/// Accumulates per-object outcomes over one batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    created: Vec<String>,
    failures: Vec<FailureRecord>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed object
    pub fn record_success(&mut self, object: impl Into<String>) {
        self.created.push(object.into());
    }

    /// Record a failed object; the batch continues
    pub fn record_failure(&mut self, object: impl Into<String>, cause: impl Into<String>) {
        let record = FailureRecord {
            object: object.into(),
            cause: cause.into(),
        };
        tracing::warn!(object = %record.object, cause = %record.cause, "object failed");
        self.failures.push(record);
    }

    /// Identifiers processed so far
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Failures recorded so far
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Close the batch: the created identifiers on full success, or an
    /// aggregate error carrying every failed identifier in attempt order.
    pub fn finish(self) -> Result<Vec<String>> {
        if self.failures.is_empty() {
            Ok(self.created)
        } else {
            Err(Error::Batch {
                failed: self.failures.into_iter().map(|f| f.object).collect(),
            })
        }
    }
}
