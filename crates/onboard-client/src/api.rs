//! The collaborator contract consumed by the onboarding core.
//!
//! Transport and wire encoding are owned by the implementation; the core
//! only assumes the shapes below. [`crate::HttpApi`] is the production
//! implementation, tests substitute scripted in-memory ones.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use onboard_model::{DetectedField, FileType, UploadSession, UploadedFileRef};

use crate::error::ApiError;

/// Files to upload, at most one per file type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadRequest {
    pub policy: Option<PathBuf>,
    pub claim: Option<PathBuf>,
    pub cancel: Option<PathBuf>,
}

impl UploadRequest {
    /// Present files, in file-type order.
    pub fn parts(&self) -> impl Iterator<Item = (FileType, &Path)> {
        [
            (FileType::Policy, self.policy.as_deref()),
            (FileType::Claim, self.claim.as_deref()),
            (FileType::Cancel, self.cancel.as_deref()),
        ]
        .into_iter()
        .filter_map(|(file_type, path)| path.map(|p| (file_type, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.parts().next().is_none()
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Identifier for the whole upload session.
    pub upload_id: String,
    /// Per-file references created by the upload service.
    #[serde(default)]
    pub files: Vec<UploadedFileRef>,
}

/// One mapping entry in a submission payload, keyed by source field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub canonical_field: String,
    pub populated_pct: f64,
    pub detected_type: String,
    pub confidence: f32,
}

/// Mapping submission for one file type.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitMappingRequest {
    pub upload_id: String,
    pub file_type: FileType,
    pub mappings: BTreeMap<String, MappingEntry>,
}

/// Server acknowledgement of a mapping submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Remote onboarding service operations. All four calls are fallible and
/// none are retried by the core.
#[async_trait]
pub trait OnboardingApi: Send + Sync {
    /// Upload the selected files, creating an upload session.
    async fn upload_files(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError>;

    /// Fetch detected source columns and suggested canonical targets for
    /// one uploaded file type.
    async fn detect_fields(
        &self,
        upload_id: &str,
        file_type: FileType,
    ) -> Result<Vec<DetectedField>, ApiError>;

    /// Persist one file type's mapping table.
    async fn submit_mapping(&self, request: &SubmitMappingRequest) -> Result<SubmitAck, ApiError>;

    /// Fetch the aggregate job status for an upload.
    async fn get_status(&self, upload_id: &str) -> Result<UploadSession, ApiError>;
}
