//! Remote object store access.

use crate::error::SyncError;
use crate::types::{ObjectRecord, SyncConfig};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Abstraction over the remote object store.
///
/// The sync walk only ever talks to the store through this trait, so tests
/// can substitute an in-memory fake for the real S3 client.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all objects under `prefix`, draining pagination to completion.
    ///
    /// Returns the raw listing, directory markers included; callers decide
    /// what to keep. A listing failure is surfaced immediately — a partial
    /// listing is never treated as success.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectRecord>, SyncError>;

    /// Fetch one object's full body into memory.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SyncError>;

    /// Stream one object's body directly to a local file, without
    /// buffering the whole body.
    async fn download_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<(), SyncError>;
}

/// Remote store backed by the AWS S3 SDK.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Builds a store from configuration.
    ///
    /// Credentials resolve through the default AWS chain (environment,
    /// profile, instance metadata) unless explicit keys are set on the
    /// config. A custom endpoint switches the client to path-style
    /// addressing for MinIO/LocalStack compatibility.
    pub async fn connect(config: &SyncConfig) -> Self {
        Self {
            client: create_s3_client(config).await,
        }
    }

    /// Wraps an already-constructed SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Create an S3 client from configuration.
async fn create_s3_client(config: &SyncConfig) -> Client {
    use aws_config::Region;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "s3mirror");
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let aws_config = loader.load().await;

    let builder = aws_sdk_s3::config::Builder::from(&aws_config);
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    Client::from_conf(s3_config)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectRecord>, SyncError> {
        let mut records = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket);

            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }

            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| SyncError::List(e.to_string()))?;

            for object in response.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                records.push(ObjectRecord {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                });
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(|s| s.to_string());
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(records)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SyncError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| SyncError::Fetch {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let data = response.body.collect().await.map_err(|e| SyncError::Fetch {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn download_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<(), SyncError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| SyncError::Fetch {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let mut body = response.body;
        let mut file = BufWriter::new(tokio::fs::File::create(path).await?);

        while let Some(chunk) = body.try_next().await.map_err(|e| SyncError::Fetch {
            key: key.to_string(),
            message: e.to_string(),
        })? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }
}
