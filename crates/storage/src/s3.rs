//! S3-compatible object store.
//!
//! Works against AWS S3 and against S3-compatible gateways (Supabase Storage,
//! MinIO) when an endpoint URL is given; custom endpoints use path-style
//! addressing. Credentials come from the standard AWS environment chain.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{ObjectEntry, ObjectStore, StorageError};

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the AWS environment, optionally pointed at a
    /// custom S3-compatible endpoint.
    pub async fn from_env(bucket: impl Into<String>, endpoint_url: Option<&str>) -> Self {
        let shared = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url).force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()), bucket)
    }
}

fn backend_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(err.to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound(path.to_string())
                } else {
                    backend_error(e)
                }
            })?;

        let data = output.body.collect().await.map_err(backend_error)?;
        Ok(data.into_bytes().to_vec())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(backend_error(e)),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        let folder = format!("{}/", prefix.trim_end_matches('/'));
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&folder)
                .delimiter("/")
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(backend_error)?;

            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let Some(name) = key.strip_prefix(&folder) else { continue };
                if name.is_empty() {
                    continue;
                }
                entries.push(ObjectEntry {
                    key: key.to_string(),
                    name: name.to_string(),
                });
            }

            match page.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(backend_error)?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(backend_error)?;
        Ok(request.uri().to_string())
    }
}
