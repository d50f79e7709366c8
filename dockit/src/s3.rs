//! [`ObjectStore`] backed by `aws-sdk-s3`.
//!
//! The client is configured from the resolved [`Config`]: region always, static
//! credentials only when both halves were configured. Otherwise the SDK's default
//! credential chain applies. Timeouts are the SDK defaults.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use dockit_core::config::Config;
use dockit_core::contract::{ObjectStore, ObjectTarget, PartReceipt, StoreError};
use tracing::{debug, error, info};

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "dockit-config",
            ));
        }
        let sdk_config = loader.load().await;
        info!(
            region = %config.region,
            static_credentials = config.credentials.is_some(),
            "Initialized S3 client"
        );
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, target: &ObjectTarget, body: Vec<u8>) -> Result<(), StoreError> {
        debug!(bucket = %target.bucket, key = %target.key, bytes = body.len(), "PutObject");
        self.client
            .put_object()
            .bucket(&target.bucket)
            .key(&target.key)
            .content_type(&target.content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, key = %target.key, "PutObject failed");
                Box::new(e) as StoreError
            })?;
        Ok(())
    }

    async fn create_multipart(&self, target: &ObjectTarget) -> Result<String, StoreError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&target.bucket)
            .key(&target.key)
            .content_type(&target.content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, key = %target.key, "CreateMultipartUpload failed");
                Box::new(e) as StoreError
            })?;
        created
            .upload_id()
            .map(str::to_string)
            .ok_or_else(|| "CreateMultipartUpload returned no upload id".into())
    }

    async fn upload_part(
        &self,
        target: &ObjectTarget,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<PartReceipt, StoreError> {
        let uploaded = self
            .client
            .upload_part()
            .bucket(&target.bucket)
            .key(&target.key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, key = %target.key, part_number, "UploadPart failed");
                Box::new(e) as StoreError
            })?;
        Ok(PartReceipt {
            part_number,
            e_tag: uploaded.e_tag().unwrap_or_default().to_string(),
        })
    }

    async fn complete_multipart(
        &self,
        target: &ObjectTarget,
        upload_id: &str,
        parts: Vec<PartReceipt>,
    ) -> Result<(), StoreError> {
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(
                parts
                    .into_iter()
                    .map(|part| {
                        CompletedPart::builder()
                            .e_tag(part.e_tag)
                            .part_number(part.part_number)
                            .build()
                    })
                    .collect(),
            ))
            .build();

        self.client
            .complete_multipart_upload()
            .bucket(&target.bucket)
            .key(&target.key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, key = %target.key, "CompleteMultipartUpload failed");
                Box::new(e) as StoreError
            })?;
        Ok(())
    }

    async fn abort_multipart(&self, target: &ObjectTarget, upload_id: &str) -> Result<(), StoreError> {
        self.client
            .abort_multipart_upload()
            .bucket(&target.bucket)
            .key(&target.key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(|e| Box::new(e) as StoreError)?;
        info!(key = %target.key, upload_id, "Aborted multipart upload");
        Ok(())
    }
}
