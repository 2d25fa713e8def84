//! s3mirror - Mirror an S3 bucket to the local filesystem
//!
//! This library downloads every object under a bucket/prefix into a local
//! directory, preserving the key-derived hierarchy, and can optionally
//! normalize recognized image formats to quality-95 baseline JPEG.
//!
//! # Features
//!
//! - **Full pagination**: drains ListObjectsV2 to completion before any
//!   download starts, so the progress total is exact
//! - **Structure preserving**: `photos/2024/p.png` lands at
//!   `<local_dir>/photos/2024/p.png`, parent directories created on demand
//! - **Image normalization**: optional transcode of jpg/jpeg/png/gif/bmp/webp
//!   objects to JPEG, compositing transparency onto white
//! - **Graceful degradation**: an undecodable image keeps its original bytes
//!   at its original path instead of failing the run
//!
//! The walk is strictly sequential: one object is fully written before the
//! next begins. There are no retries and no resumability; interrupting the
//! process leaves a partially populated tree behind.
//!
//! # Example
//!
//! ```no_run
//! use s3mirror::{sync_bucket, S3Store, SyncConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::new("my-photos")
//!     .with_prefix("2024/")
//!     .with_local_dir("./photo")
//!     .with_transcode(true);
//!
//! let store = S3Store::connect(&config).await;
//! let report = sync_bucket(&store, &config).await?;
//! # Ok(())
//! # }
//! ```

mod enumerate;
mod error;
mod materialize;
mod orchestrator;
mod store;
mod transcode;
mod types;

pub use enumerate::{enumerate_objects, is_directory_marker};
pub use error::SyncError;
pub use materialize::{local_path, materialize_object, Materialized};
pub use orchestrator::sync_bucket;
pub use store::{ObjectStore, S3Store};
pub use transcode::{classify_key, key_extension, transcode_to_jpeg, HandlingMode};
pub use types::{ObjectRecord, SyncConfig, SyncReport, JPEG_QUALITY};
