//! Mapping submission: fan-out one request per file type, fan-in the results.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use onboard_map::MappingState;
use onboard_model::FileType;

use crate::api::{MappingEntry, OnboardingApi, SubmitMappingRequest};
use crate::error::SubmitError;

/// One entry of the flattened post-submission table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedMapping {
    pub canonical_field: String,
    pub populated_pct: f64,
    pub detected_type: String,
    pub confidence: f32,
    pub file_type: FileType,
}

/// Groups validated assignments by file type and dispatches one submission
/// per file type, concurrently.
///
/// The submitter does not re-validate; callers only invoke it after the
/// validator reports no errors.
pub struct MappingSubmitter<'a, A: OnboardingApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: OnboardingApi + ?Sized> MappingSubmitter<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Submit all assigned mappings, one concurrent request per file type
    /// that has at least one entry.
    ///
    /// The per-file-type payloads are snapshotted from `state` before any
    /// request is dispatched, so edits made while requests are in flight
    /// cannot tear an already-built payload. On success, returns the
    /// flattened `source field -> submitted entry` table. On failure,
    /// returns the first error encountered; groups persisted before the
    /// failure are not rolled back (see [`SubmitError::Submission`]).
    pub async fn submit(
        &self,
        upload_id: Option<&str>,
        state: &MappingState,
    ) -> Result<BTreeMap<String, SubmittedMapping>, SubmitError> {
        let Some(upload_id) = upload_id else {
            return Err(SubmitError::MissingUploadId);
        };

        // One consistent snapshot, built before any dispatch.
        let mut requests: Vec<SubmitMappingRequest> = Vec::new();
        for (file_type, rows) in state.grouped_assigned() {
            let mut mappings = BTreeMap::new();
            for row in rows {
                let Some(canonical_field) = row.canonical_field.clone() else {
                    continue;
                };
                mappings.insert(
                    row.source_field.clone(),
                    MappingEntry {
                        canonical_field,
                        populated_pct: row.populated_pct,
                        detected_type: row.detected_type.clone(),
                        confidence: row.confidence,
                    },
                );
            }
            if mappings.is_empty() {
                continue;
            }
            debug!(%file_type, entries = mappings.len(), "built submission payload");
            requests.push(SubmitMappingRequest {
                upload_id: upload_id.to_string(),
                file_type,
                mappings,
            });
        }

        try_join_all(requests.iter().map(|request| async move {
            self.api
                .submit_mapping(request)
                .await
                .map_err(|source| SubmitError::Submission {
                    file_type: request.file_type,
                    source,
                })
        }))
        .await?;

        let mut flattened = BTreeMap::new();
        for request in &requests {
            for (source_field, entry) in &request.mappings {
                flattened.insert(
                    source_field.clone(),
                    SubmittedMapping {
                        canonical_field: entry.canonical_field.clone(),
                        populated_pct: entry.populated_pct,
                        detected_type: entry.detected_type.clone(),
                        confidence: entry.confidence,
                        file_type: request.file_type,
                    },
                );
            }
        }
        info!(
            upload_id,
            file_types = requests.len(),
            entries = flattened.len(),
            "mappings submitted"
        );
        Ok(flattened)
    }
}
