//! # uploader: stream a local file to an [`ObjectStore`] with progress
//!
//! Small files go up in one `put_object`. Anything larger than the part size is sent
//! as a multipart upload, one part at a time, so progress can advance as each part is
//! acknowledged. The object only exists at the destination once the final call
//! succeeded.
//!
//! Failures are not retried. A failed multipart upload is aborted best-effort and the
//! error is returned to the caller. The same happens when the uploader's cancellation
//! token fires: no further part is sent and the open upload is aborted.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::contract::{ObjectStore, ObjectTarget, PartReceipt, ProgressObserver, StoreError};

/// S3 rejects non-final parts smaller than 5 MiB.
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

pub const DEFAULT_PART_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload of {key} failed: {source}")]
    Transport {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("upload of {key} was cancelled")]
    Cancelled { key: String },
}

/// What the destination confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub key: String,
    pub bytes: u64,
    /// 0 for single-request uploads.
    pub parts: usize,
}

/// Monotone byte counter capped at the expected total.
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    total: u64,
    transferred: u64,
}

impl ProgressCounter {
    pub fn new(total: u64) -> Self {
        Self { total, transferred: 0 }
    }

    /// Adds `bytes` and returns the new (clamped) position.
    pub fn advance(&mut self, bytes: u64) -> u64 {
        self.transferred = self.transferred.saturating_add(bytes).min(self.total);
        self.transferred
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

#[derive(Debug, Clone)]
pub struct Uploader {
    part_size: usize,
    cancel: CancellationToken,
}

impl Default for Uploader {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            cancel: CancellationToken::new(),
        }
    }
}

impl Uploader {
    /// Use a different part size. Values below [`MIN_PART_SIZE`] are raised to it.
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size.max(MIN_PART_SIZE);
        self
    }

    /// Stop sending once `cancel` fires. An in-flight multipart upload is aborted.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn cancelled(&self, target: &ObjectTarget) -> UploadError {
        warn!(key = %target.key, "Upload cancelled");
        UploadError::Cancelled {
            key: target.key.clone(),
        }
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    pub async fn upload<S>(
        &self,
        store: &S,
        target: &ObjectTarget,
        file_path: &Path,
        observer: &dyn ProgressObserver,
    ) -> Result<UploadReceipt, UploadError>
    where
        S: ObjectStore + ?Sized,
    {
        let io_err = |source| UploadError::Io {
            path: file_path.to_path_buf(),
            source,
        };

        if self.cancel.is_cancelled() {
            return Err(self.cancelled(target));
        }

        let mut file = File::open(file_path).await.map_err(io_err)?;
        let total = file.metadata().await.map_err(io_err)?.len();
        info!(
            path = %file_path.display(),
            bucket = %target.bucket,
            key = %target.key,
            total_bytes = total,
            "Starting upload"
        );
        observer.on_start(total);

        let mut counter = ProgressCounter::new(total);
        let parts = if total <= self.part_size as u64 {
            let mut body = Vec::with_capacity(total as usize);
            file.read_to_end(&mut body).await.map_err(io_err)?;
            let len = body.len() as u64;
            let sent = tokio::select! {
                biased;
                sent = store.put_object(target, body) => sent,
                _ = self.cancel.cancelled() => return Err(self.cancelled(target)),
            };
            sent.map_err(|source| {
                error!(key = %target.key, error = %source, "put_object failed");
                UploadError::Transport {
                    key: target.key.clone(),
                    source,
                }
            })?;
            observer.on_progress(counter.advance(len));
            0
        } else {
            self.upload_parts(store, target, file_path, &mut file, &mut counter, observer)
                .await?
        };

        observer.on_finish();
        info!(key = %target.key, bytes = counter.transferred(), parts, "Upload complete");
        Ok(UploadReceipt {
            key: target.key.clone(),
            bytes: counter.transferred(),
            parts,
        })
    }

    async fn upload_parts<S>(
        &self,
        store: &S,
        target: &ObjectTarget,
        file_path: &Path,
        file: &mut File,
        counter: &mut ProgressCounter,
        observer: &dyn ProgressObserver,
    ) -> Result<usize, UploadError>
    where
        S: ObjectStore + ?Sized,
    {
        let transport = |source: StoreError| UploadError::Transport {
            key: target.key.clone(),
            source,
        };

        let upload_id = store.create_multipart(target).await.map_err(transport)?;
        debug!(key = %target.key, upload_id = %upload_id, "Opened multipart upload");

        match self
            .send_parts(store, target, &upload_id, file_path, file, counter, observer)
            .await
        {
            Ok(parts) => {
                let count = parts.len();
                match store.complete_multipart(target, &upload_id, parts).await {
                    Ok(()) => Ok(count),
                    Err(source) => {
                        error!(key = %target.key, upload_id = %upload_id, error = %source, "complete_multipart failed");
                        abort_quietly(store, target, &upload_id).await;
                        Err(transport(source))
                    }
                }
            }
            Err(e) => {
                abort_quietly(store, target, &upload_id).await;
                Err(e)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn send_parts<S>(
        &self,
        store: &S,
        target: &ObjectTarget,
        upload_id: &str,
        file_path: &Path,
        file: &mut File,
        counter: &mut ProgressCounter,
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<PartReceipt>, UploadError>
    where
        S: ObjectStore + ?Sized,
    {
        let mut parts = Vec::new();
        let mut part_number = 1;
        let mut buffer = vec![0u8; self.part_size];

        loop {
            if self.cancel.is_cancelled() {
                return Err(self.cancelled(target));
            }

            let mut filled = 0;
            while filled < self.part_size {
                let read = file
                    .read(&mut buffer[filled..])
                    .await
                    .map_err(|source| UploadError::Io {
                        path: file_path.to_path_buf(),
                        source,
                    })?;
                if read == 0 {
                    break;
                }
                filled += read;
            }
            if filled == 0 {
                break;
            }

            let sent = tokio::select! {
                biased;
                sent = store.upload_part(target, upload_id, part_number, buffer[..filled].to_vec()) => sent,
                _ = self.cancel.cancelled() => return Err(self.cancelled(target)),
            };
            let receipt = sent.map_err(|source| {
                error!(key = %target.key, part_number, error = %source, "upload_part failed");
                UploadError::Transport {
                    key: target.key.clone(),
                    source,
                }
            })?;
            debug!(key = %target.key, part_number, bytes = filled, "Part acknowledged");
            parts.push(receipt);
            observer.on_progress(counter.advance(filled as u64));
            part_number += 1;
        }

        Ok(parts)
    }
}

async fn abort_quietly<S>(store: &S, target: &ObjectTarget, upload_id: &str)
where
    S: ObjectStore + ?Sized,
{
    if let Err(e) = store.abort_multipart(target, upload_id).await {
        warn!(key = %target.key, upload_id, error = %e, "Failed to abort multipart upload");
    }
}

/// Uploads with the default part size.
pub async fn upload<S>(
    store: &S,
    target: &ObjectTarget,
    file_path: &Path,
    observer: &dyn ProgressObserver,
) -> Result<UploadReceipt, UploadError>
where
    S: ObjectStore + ?Sized,
{
    Uploader::default()
        .upload(store, target, file_path, observer)
        .await
}
