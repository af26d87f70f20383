//! Error types for remote onboarding operations.

use thiserror::Error;

use onboard_model::FileType;

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Message(String),
}

/// Failure of a mapping submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Submission attempted without a prior successful upload. No network
    /// call is made.
    #[error("no upload id: files must be uploaded before mappings can be submitted")]
    MissingUploadId,
    /// One of the per-file-type submission calls failed. Groups that were
    /// already persisted server-side are not rolled back; re-submitting the
    /// named file type is safe (the server keys on upload id + file type).
    #[error("mapping submission failed for {file_type} file: {source}")]
    Submission {
        file_type: FileType,
        #[source]
        source: ApiError,
    },
}

/// Failure of status tracking.
#[derive(Debug, Error)]
pub enum PollError {
    /// A status fetch failed. Tracking stops immediately; there is no retry.
    #[error("status fetch failed: {0}")]
    Transport(#[from] ApiError),
    /// The caller cancelled tracking.
    #[error("status tracking cancelled")]
    Cancelled,
}
