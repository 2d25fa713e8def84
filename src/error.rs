//! Error types for bucket mirror operations.

use std::io;
use thiserror::Error;

/// Errors that can occur while mirroring a bucket.
///
/// Everything here is fatal to the run: there is no retry logic, and a
/// failure on one object aborts the whole pass. The only recoverable
/// condition, a failed image transcode, never surfaces as a `SyncError`;
/// it falls back to writing the original bytes.
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O error during file or directory operations.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Bucket listing failure (unreachable endpoint, bad credentials,
    /// unknown bucket).
    #[error("Failed to list bucket contents: {0}")]
    List(String),

    /// Failure fetching one object's body from the remote store.
    #[error("Failed to fetch object '{key}': {message}")]
    Fetch { key: String, message: String },
}
