//! # contract: seams between the core and its collaborators
//!
//! The core never talks to a terminal or a cloud SDK directly. It talks to:
//! - an [`ObjectStore`], which accepts whole objects or multipart uploads,
//! - a [`ProgressObserver`], which is told how many bytes the store acknowledged,
//! - a [`TokenExtractor`], which proposes extra tags from free text.
//!
//! `ObjectStore` and `ProgressObserver` carry `mockall` mocks (`MockObjectStore`,
//! `MockProgressObserver`) when the `test-export-mocks` feature is on, so downstream
//! crates can script transport behaviour in their own tests.

use async_trait::async_trait;

#[allow(unused_imports)]
use mockall::{automock, predicate::*};

/// Error type returned by object stores. Boxed so any client's error can pass through.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Where an object goes and how it is labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTarget {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
}

impl ObjectTarget {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            content_type: content_type.into(),
        }
    }
}

/// Acknowledgement for one uploaded part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReceipt {
    pub part_number: i32,
    pub e_tag: String,
}

/// Trait for writing objects to a bucket.
///
/// Implementors map these calls onto their storage API. Every call must return only
/// after the destination acknowledged it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` as a single object.
    async fn put_object(&self, target: &ObjectTarget, body: Vec<u8>) -> Result<(), StoreError>;

    /// Open a multipart upload and return its upload id.
    async fn create_multipart(&self, target: &ObjectTarget) -> Result<String, StoreError>;

    /// Send one part. Part numbers start at 1.
    async fn upload_part(
        &self,
        target: &ObjectTarget,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<PartReceipt, StoreError>;

    /// Materialize the object from the acknowledged parts.
    async fn complete_multipart(
        &self,
        target: &ObjectTarget,
        upload_id: &str,
        parts: Vec<PartReceipt>,
    ) -> Result<(), StoreError>;

    /// Discard an unfinished multipart upload.
    async fn abort_multipart(&self, target: &ObjectTarget, upload_id: &str) -> Result<(), StoreError>;
}

/// Receives byte-level progress for a single upload.
///
/// `on_progress` values never decrease and never exceed the total passed to `on_start`.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, _total_bytes: u64) {}

    fn on_progress(&self, bytes_transferred: u64);

    /// Called once the destination confirmed the whole object.
    fn on_finish(&self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _bytes_transferred: u64) {}
}

/// Proposes noun-like tokens from free text (usually a file name).
pub trait TokenExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}
