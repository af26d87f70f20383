//! The onboarding wizard step machine.
//!
//! Steps are linear: `checklist → upload → mapping → processing → complete`.
//! `mapping → upload` and `upload → checklist` are explicit user-initiated
//! back-transitions; there is no backward movement out of processing or
//! complete. The current step is an observable value: front ends subscribe
//! to a watch channel instead of polling controller state.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use onboard_client::{
    MappingSubmitter, OnboardingApi, StatusPoller, UploadReceipt, UploadRequest,
};
use onboard_map::MappingState;
use onboard_model::{
    DetectedField, FileStatus, FileType, OverallStatus, UploadSession, UploadedFileRef,
};
use onboard_validate::{ValidationReport, Validator};

use crate::error::WizardError;

/// Wizard step, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Checklist,
    Upload,
    Mapping,
    Processing,
    Complete,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Checklist => "checklist",
            Self::Upload => "upload",
            Self::Mapping => "mapping",
            Self::Processing => "processing",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Sequences upload, mapping, submission, and status tracking for one
/// onboarding session.
pub struct WizardController<A: OnboardingApi> {
    api: A,
    step_tx: watch::Sender<WizardStep>,
    cancel: CancellationToken,
    upload: Option<UploadReceipt>,
    mapping: Option<MappingState>,
    last_session: Option<UploadSession>,
    processing_failed: bool,
}

impl<A: OnboardingApi> WizardController<A> {
    pub fn new(api: A) -> Self {
        let (step_tx, _) = watch::channel(WizardStep::Checklist);
        Self {
            api,
            step_tx,
            cancel: CancellationToken::new(),
            upload: None,
            mapping: None,
            last_session: None,
            processing_failed: false,
        }
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        *self.step_tx.borrow()
    }

    /// Observe step changes without polling the controller.
    pub fn subscribe(&self) -> watch::Receiver<WizardStep> {
        self.step_tx.subscribe()
    }

    /// Token that abandons status tracking when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// `checklist → upload`.
    pub fn begin_upload(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Checklist)?;
        self.set_step(WizardStep::Upload);
        Ok(())
    }

    /// Upload the selected files, recording the receipt for later steps.
    pub async fn upload(&mut self, request: &UploadRequest) -> Result<&UploadReceipt, WizardError> {
        self.expect_step(WizardStep::Upload)?;
        let receipt = self.api.upload_files(request).await?;
        info!(upload_id = %receipt.upload_id, files = receipt.files.len(), "files uploaded");
        Ok(self.upload.insert(receipt))
    }

    /// `upload → mapping`: requires a completed policy file, then fetches
    /// detections per uploaded file and seeds the mapping table.
    pub async fn enter_mapping(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Upload)?;
        let Some(receipt) = self.upload.as_ref() else {
            return Err(WizardError::PolicyFileRequired);
        };
        let policy_ready = receipt
            .files
            .iter()
            .any(|f| f.file_type == FileType::Policy && f.status == FileStatus::Completed);
        if !policy_ready {
            return Err(WizardError::PolicyFileRequired);
        }

        let mut suggestions: BTreeMap<String, Vec<DetectedField>> = BTreeMap::new();
        for file in &receipt.files {
            let detected = self
                .api
                .detect_fields(&receipt.upload_id, file.file_type)
                .await?;
            debug!(file = %file.id, file_type = %file.file_type, columns = detected.len(), "fields detected");
            suggestions.insert(file.id.clone(), detected);
        }
        self.mapping = Some(MappingState::initialize(&receipt.files, &suggestions));
        self.set_step(WizardStep::Mapping);
        Ok(())
    }

    /// Assign a canonical field to a source column.
    pub fn assign(&mut self, file_type: FileType, source_field: &str, canonical_field: &str) -> bool {
        self.mapping
            .as_mut()
            .is_some_and(|m| m.assign(file_type, source_field, canonical_field))
    }

    /// Clear a source column's assignment.
    pub fn unassign(&mut self, file_type: FileType, source_field: &str) -> bool {
        self.mapping
            .as_mut()
            .is_some_and(|m| m.unassign(file_type, source_field))
    }

    /// The live mapping table, present only during the mapping step.
    pub fn mapping_state(&self) -> Option<&MappingState> {
        self.mapping.as_ref()
    }

    /// Re-run validation against the current table and uploaded files.
    pub fn validation(&self) -> ValidationReport {
        let files: &[UploadedFileRef] = self
            .upload
            .as_ref()
            .map(|r| r.files.as_slice())
            .unwrap_or_default();
        match &self.mapping {
            Some(state) => Validator::new().evaluate(state, files),
            None => ValidationReport::default(),
        }
    }

    /// User-initiated back-transition: `mapping → upload` or
    /// `upload → checklist`. The mapping table is discarded on leaving the
    /// mapping step.
    pub fn back(&mut self) -> Result<(), WizardError> {
        match self.step() {
            WizardStep::Mapping => {
                self.mapping = None;
                self.set_step(WizardStep::Upload);
                Ok(())
            }
            WizardStep::Upload => {
                self.set_step(WizardStep::Checklist);
                Ok(())
            }
            found => Err(WizardError::WrongStep {
                expected: WizardStep::Mapping,
                found,
            }),
        }
    }

    /// `mapping → processing → complete`: validate, submit, then track jobs
    /// to a terminal status.
    ///
    /// `on_update` receives every fetched session, including the terminal
    /// one. On `done` the wizard advances to complete. On `failed` it stays
    /// at processing with the failed session retained (no automatic retry).
    pub async fn submit_and_track<F>(&mut self, mut on_update: F) -> Result<(), WizardError>
    where
        F: FnMut(&UploadSession),
    {
        self.expect_step(WizardStep::Mapping)?;
        let report = self.validation();
        if !report.is_valid() {
            return Err(WizardError::ValidationFailed(report.errors));
        }
        let upload_id = self.upload.as_ref().map(|r| r.upload_id.clone());
        let Some(state) = self.mapping.as_ref() else {
            return Err(WizardError::ValidationFailed(vec![
                "No mapping table loaded".to_string(),
            ]));
        };

        MappingSubmitter::new(&self.api)
            .submit(upload_id.as_deref(), state)
            .await?;
        // Past the mapping step: the table's lifecycle ends here.
        self.mapping = None;
        self.processing_failed = false;
        self.set_step(WizardStep::Processing);

        let upload_id = upload_id.unwrap_or_default();
        let cancel = self.cancel.clone();
        let result = StatusPoller::new(&self.api)
            .poll(&upload_id, &cancel, |session| on_update(session))
            .await;

        match result {
            Ok(session) => {
                let overall = session.overall;
                self.last_session = Some(session);
                if overall == OverallStatus::Done {
                    self.set_step(WizardStep::Complete);
                } else {
                    // Failed: stay at processing, surface the session.
                    warn!(%upload_id, "transformation failed, wizard remains at processing");
                    self.processing_failed = true;
                }
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// The most recent session fetched by the poller.
    pub fn last_session(&self) -> Option<&UploadSession> {
        self.last_session.as_ref()
    }

    /// True when tracking ended with `overall == failed`.
    pub fn processing_failed(&self) -> bool {
        self.processing_failed
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        let found = self.step();
        if found == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep { expected, found })
        }
    }

    fn set_step(&mut self, step: WizardStep) {
        debug!(from = %self.step(), to = %step, "wizard step change");
        self.step_tx.send_replace(step);
    }
}
