//! Per-object materialization: path mapping, mode dispatch, disk writes.

use crate::enumerate::is_directory_marker;
use crate::error::SyncError;
use crate::store::ObjectStore;
use crate::transcode::{classify_key, transcode_to_jpeg, HandlingMode};
use crate::types::{ObjectRecord, SyncConfig, JPEG_QUALITY};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of materializing one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// Directory marker; nothing written.
    Skipped,
    /// Bytes written verbatim.
    Raw,
    /// Decoded and re-encoded as JPEG.
    Transcoded,
    /// Image object whose transcode failed; original bytes written to the
    /// original path instead.
    Fallback,
}

/// Maps a key onto the local tree.
///
/// Leading separators are stripped so a key can never resolve to an
/// absolute path outside `local_dir`.
pub fn local_path(local_dir: &Path, key: &str) -> PathBuf {
    local_dir.join(key.trim_start_matches('/'))
}

/// Downloads one object to its place in the local tree.
///
/// Opaque objects (and all objects when transcoding is disabled) stream
/// straight to disk. Image objects are fetched into memory, normalized to
/// JPEG and written with a `jpg` extension; if decoding or encoding fails,
/// the original bytes are written to the original path and the run
/// continues.
///
/// Parent directories are created on demand; re-creating existing ones is
/// a no-op. Fetch and write failures propagate and abort the whole run.
pub async fn materialize_object(
    store: &dyn ObjectStore,
    config: &SyncConfig,
    record: &ObjectRecord,
) -> Result<Materialized, SyncError> {
    if is_directory_marker(&record.key) {
        return Ok(Materialized::Skipped);
    }

    let path = local_path(&config.local_dir, &record.key);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mode = if config.transcode_images {
        classify_key(&record.key)
    } else {
        HandlingMode::Opaque
    };

    match mode {
        HandlingMode::Opaque => {
            store
                .download_to_file(&config.bucket, &record.key, &path)
                .await?;
            debug!("Wrote {}", path.display());
            Ok(Materialized::Raw)
        }
        HandlingMode::Image => {
            let bytes = store.get_object(&config.bucket, &record.key).await?;

            match transcode_to_jpeg(&bytes, JPEG_QUALITY) {
                Ok(jpeg) => {
                    let jpeg_path = path.with_extension("jpg");
                    tokio::fs::write(&jpeg_path, jpeg).await?;
                    debug!("Transcoded {} -> {}", record.key, jpeg_path.display());
                    Ok(Materialized::Transcoded)
                }
                Err(e) => {
                    warn!(
                        "⚠️  Could not transcode {}: {}. Keeping original bytes.",
                        record.key, e
                    );
                    tokio::fs::write(&path, bytes).await?;
                    Ok(Materialized::Fallback)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::MemStore;

    fn record(key: &str, size: u64) -> ObjectRecord {
        ObjectRecord {
            key: key.to_string(),
            size,
        }
    }

    #[test]
    fn test_local_path_mirrors_key_hierarchy() {
        let path = local_path(Path::new("out"), "a/b/c.txt");
        assert_eq!(path, PathBuf::from("out/a/b/c.txt"));
    }

    #[test]
    fn test_local_path_never_escapes_to_absolute() {
        let path = local_path(Path::new("out"), "/etc/passwd");
        assert_eq!(path, PathBuf::from("out/etc/passwd"));
    }

    #[tokio::test]
    async fn test_raw_copy_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemStore::new([("a/b.txt", b"hello world".to_vec())]);
        let config = SyncConfig::new("bucket").with_local_dir(dir.path());

        let outcome = materialize_object(&store, &config, &record("a/b.txt", 11))
            .await
            .unwrap();

        assert_eq!(outcome, Materialized::Raw);
        let written = std::fs::read(dir.path().join("a/b.txt")).unwrap();
        assert_eq!(written, b"hello world");
    }

    #[tokio::test]
    async fn test_directory_marker_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemStore::new([("a/c/", Vec::new())]);
        let config = SyncConfig::new("bucket").with_local_dir(dir.path());

        let outcome = materialize_object(&store, &config, &record("a/c/", 0))
            .await
            .unwrap();

        assert_eq!(outcome, Materialized::Skipped);
        assert!(!dir.path().join("a/c").exists());
    }

    #[tokio::test]
    async fn test_existing_parent_directories_are_fine() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();

        let store = MemStore::new([("a/b/c.txt", b"x".to_vec())]);
        let config = SyncConfig::new("bucket").with_local_dir(dir.path());

        materialize_object(&store, &config, &record("a/b/c.txt", 1))
            .await
            .unwrap();

        assert!(dir.path().join("a/b/c.txt").exists());
    }

    #[tokio::test]
    async fn test_images_copied_verbatim_when_transcoding_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = vec![1u8, 2, 3, 4];
        let store = MemStore::new([("img/p.png", bytes.clone())]);
        let config = SyncConfig::new("bucket").with_local_dir(dir.path());

        let outcome = materialize_object(&store, &config, &record("img/p.png", 4))
            .await
            .unwrap();

        assert_eq!(outcome, Materialized::Raw);
        assert_eq!(std::fs::read(dir.path().join("img/p.png")).unwrap(), bytes);
        assert!(!dir.path().join("img/p.jpg").exists());
    }

    #[tokio::test]
    async fn test_corrupt_image_falls_back_to_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = b"definitely not a gif".to_vec();
        let store = MemStore::new([("img/bad.gif", bytes.clone())]);
        let config = SyncConfig::new("bucket")
            .with_local_dir(dir.path())
            .with_transcode(true);

        let outcome = materialize_object(&store, &config, &record("img/bad.gif", 20))
            .await
            .unwrap();

        assert_eq!(outcome, Materialized::Fallback);
        assert_eq!(
            std::fs::read(dir.path().join("img/bad.gif")).unwrap(),
            bytes
        );
        assert!(!dir.path().join("img/bad.jpg").exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::store::testing::BrokenStore;
        let config = SyncConfig::new("bucket").with_local_dir(dir.path());

        let result = materialize_object(&store, &config, &record("a/b.txt", 1)).await;
        assert!(matches!(result, Err(SyncError::Fetch { .. })));
    }
}
