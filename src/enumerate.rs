//! Bucket enumeration.

use crate::error::SyncError;
use crate::store::ObjectStore;
use crate::types::ObjectRecord;
use tracing::debug;

/// Checks whether a key is a directory marker.
///
/// Markers are zero-content folder placeholders whose key ends in the path
/// separator; they are never materialized and never counted.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// Lists every object under `prefix`, excluding directory markers.
///
/// The listing is drained to completion up front, so the total used for
/// progress display and the records driving materialization come from the
/// same snapshot and can never disagree.
///
/// # Arguments
///
/// * `store` - The remote store to enumerate
/// * `bucket` - Bucket name
/// * `prefix` - Prefix filter (empty = whole bucket)
///
/// # Returns
///
/// All matching non-marker records, in the order the store yields them, or
/// an error if the listing fails.
pub async fn enumerate_objects(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<ObjectRecord>, SyncError> {
    let mut records = store.list_objects(bucket, prefix).await?;
    records.retain(|record| !is_directory_marker(&record.key));

    debug!(
        "Enumerated {} objects in s3://{}/{}",
        records.len(),
        bucket,
        prefix
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{BrokenStore, MemStore};

    #[test]
    fn test_directory_marker_detection() {
        assert!(is_directory_marker("a/c/"));
        assert!(is_directory_marker("/"));
        assert!(!is_directory_marker("a/b.txt"));
        assert!(!is_directory_marker(""));
    }

    #[tokio::test]
    async fn test_markers_excluded_from_enumeration() {
        let store = MemStore::new([
            ("a/b.txt", b"hello".to_vec()),
            ("a/c/", Vec::new()),
            ("img/p.png", vec![1, 2, 3]),
        ]);

        let records = enumerate_objects(&store, "bucket", "").await.unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();

        assert_eq!(keys, vec!["a/b.txt", "img/p.png"]);
    }

    #[tokio::test]
    async fn test_prefix_filter() {
        let store = MemStore::new([
            ("a/b.txt", b"hello".to_vec()),
            ("img/p.png", vec![1, 2, 3]),
        ]);

        let records = enumerate_objects(&store, "bucket", "img/").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "img/p.png");
        assert_eq!(records[0].size, 3);
    }

    #[tokio::test]
    async fn test_listing_failure_is_surfaced() {
        let result = enumerate_objects(&BrokenStore, "bucket", "").await;
        assert!(matches!(result, Err(SyncError::List(_))));
    }
}
