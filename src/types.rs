//! Configuration and data structures for bucket mirroring.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JPEG quality used when normalizing images.
pub const JPEG_QUALITY: u8 = 95;

/// A single object reported by the remote store listing.
///
/// Keys are `/`-delimited; a key ending in `/` is a directory marker
/// carrying no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// The object key (full path within the bucket).
    pub key: String,
    /// Size of the object in bytes, as reported by the listing.
    pub size: u64,
}

/// Configuration for a bucket mirror run.
///
/// # Example
///
/// ```
/// use s3mirror::SyncConfig;
///
/// let config = SyncConfig::new("my-photos")
///     .with_prefix("2024/")
///     .with_local_dir("./photo")
///     .with_transcode(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Bucket to mirror.
    pub bucket: String,

    /// Prefix restricting the listing (empty = whole bucket).
    pub prefix: String,

    /// Destination root for the mirrored tree.
    pub local_dir: PathBuf,

    /// Re-encode recognized image objects as quality-95 JPEG.
    pub transcode_images: bool,

    /// AWS region (optional).
    pub region: Option<String>,

    /// Custom endpoint URL (for R2/MinIO/LocalStack; enables path-style
    /// addressing).
    pub endpoint: Option<String>,

    /// AWS profile name (optional).
    pub profile: Option<String>,

    /// Explicit AWS access key (optional; otherwise the default
    /// credential chain applies).
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional).
    pub secret_key: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: String::new(),
            local_dir: PathBuf::from("."),
            transcode_images: false,
            region: None,
            endpoint: None,
            profile: None,
            access_key: None,
            secret_key: None,
        }
    }
}

impl SyncConfig {
    /// Create a config with the required bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the prefix for filtering objects.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the destination root.
    pub fn with_local_dir(mut self, local_dir: impl Into<PathBuf>) -> Self {
        self.local_dir = local_dir.into();
        self
    }

    /// Enable or disable image normalization.
    pub fn with_transcode(mut self, transcode: bool) -> Self {
        self.transcode_images = transcode;
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (R2/MinIO/LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set explicit static credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

/// Counters accumulated over one mirror run.
///
/// Purely observational; nothing reads these to make control decisions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Objects materialized (directory markers excluded).
    pub synced: u64,
    /// Objects re-encoded as JPEG.
    pub transcoded: u64,
    /// Image objects whose transcode failed and kept their original bytes.
    pub fallbacks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = SyncConfig::new("my-bucket")
            .with_prefix("data/")
            .with_local_dir("/tmp/out")
            .with_transcode(true)
            .with_endpoint("http://localhost:4566")
            .with_region("us-east-1");

        assert_eq!(config.bucket, "my-bucket");
        assert_eq!(config.prefix, "data/");
        assert_eq!(config.local_dir, PathBuf::from("/tmp/out"));
        assert!(config.transcode_images);
        assert_eq!(config.endpoint, Some("http://localhost:4566".to_string()));
        assert_eq!(config.region, Some("us-east-1".to_string()));
    }

    #[test]
    fn test_config_defaults() {
        let config = SyncConfig::new("b");
        assert_eq!(config.prefix, "");
        assert_eq!(config.local_dir, PathBuf::from("."));
        assert!(!config.transcode_images);
        assert!(config.profile.is_none());
    }
}
