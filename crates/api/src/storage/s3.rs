//! S3-compatible backend (AWS, MinIO, Aliyun OSS in S3 mode).

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use super::{check_key, content_type, ObjectStorage, StorageError};
use crate::config::StorageConfig;

pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.access_key_secret.clone(),
            None,
            None,
            "helper-admin-config",
        );
        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket.clone(),
        }
    }
}

fn backend_error<E>(err: E) -> StorageError
where
    E: std::error::Error,
{
    StorageError::Backend(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object_from_file(&self, key: &str, path: &Path) -> Result<(), StorageError> {
        let key = check_key(key)?;
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type(key))
            .acl(ObjectCannedAcl::PublicRead)
            .body(body)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn hide_object(&self, key: &str) -> Result<(), StorageError> {
        let key = check_key(key)?;
        self.client
            .put_object_acl()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn put_symlink(&self, link_key: &str, target_key: &str) -> Result<(), StorageError> {
        let link_key = check_key(link_key)?;
        let target_key = check_key(target_key)?;
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, target_key))
            .key(link_key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}
