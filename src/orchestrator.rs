//! Main run loop for mirroring a bucket.

use crate::enumerate::enumerate_objects;
use crate::error::SyncError;
use crate::materialize::{materialize_object, Materialized};
use crate::store::ObjectStore;
use crate::types::{SyncConfig, SyncReport};
use tracing::info;

/// Mirrors every object under the configured prefix into the local tree.
///
/// This is the main entry point. It performs the following steps:
///
/// 1. Enumerates the bucket once, draining pagination and dropping
///    directory markers
/// 2. Materializes each object sequentially, one fully written before the
///    next begins
/// 3. Advances a progress bar by exactly one per object
///
/// A listing, fetch or write failure aborts the run; a failed image
/// transcode only downgrades that one object to a raw copy.
///
/// # Arguments
///
/// * `store` - The remote store to mirror from
/// * `config` - Mirror configuration
///
/// # Returns
///
/// A [`SyncReport`] with the final counters, or the first fatal error.
///
/// # Example
///
/// ```no_run
/// use s3mirror::{sync_bucket, S3Store, SyncConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SyncConfig::new("my-photos").with_transcode(true);
/// let store = S3Store::connect(&config).await;
/// let report = sync_bucket(&store, &config).await?;
/// println!("mirrored {} objects", report.synced);
/// # Ok(())
/// # }
/// ```
pub async fn sync_bucket(
    store: &dyn ObjectStore,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let records = enumerate_objects(store, &config.bucket, &config.prefix).await?;
    let total = records.len() as u64;
    let total_bytes: u64 = records.iter().map(|r| r.size).sum();

    info!(
        "📦 Mirroring {} objects ({}) from s3://{}/{} to {}",
        total,
        indicatif::HumanBytes(total_bytes),
        config.bucket,
        config.prefix,
        config.local_dir.display()
    );

    let pb = indicatif::ProgressBar::new(total);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg} | {elapsed_precise} elapsed, ETA {eta_precise}")
            .unwrap()
            .progress_chars("█▓▒░ "),
    );
    pb.set_message("Downloading files");

    let mut report = SyncReport::default();

    for record in &records {
        pb.set_message(format!("| ⬇️  {}", record.key));

        match materialize_object(store, config, record).await? {
            Materialized::Skipped => continue,
            Materialized::Raw => {}
            Materialized::Transcoded => report.transcoded += 1,
            Materialized::Fallback => report.fallbacks += 1,
        }

        report.synced += 1;
        pb.inc(1);
    }

    pb.finish_with_message(format!(
        "✅ Mirrored {} objects to {}",
        report.synced,
        config.local_dir.display()
    ));

    Ok(report)
}
