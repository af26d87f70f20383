use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use onboard_client::{
    ApiError, OnboardingApi, SubmitAck, SubmitMappingRequest, UploadReceipt, UploadRequest,
};
use onboard_model::{
    DetectedField, FileStatus, FileType, JobState, JobStatus, OverallStatus, UploadSession,
    UploadedFileRef,
};
use onboard_wizard::{WizardController, WizardError, WizardStep};

struct MockApi {
    files: Vec<UploadedFileRef>,
    detections: BTreeMap<FileType, Vec<DetectedField>>,
    sessions: Mutex<VecDeque<Result<UploadSession, ApiError>>>,
    submitted: Mutex<Vec<SubmitMappingRequest>>,
}

impl MockApi {
    fn new(
        files: Vec<UploadedFileRef>,
        detections: BTreeMap<FileType, Vec<DetectedField>>,
        sessions: Vec<Result<UploadSession, ApiError>>,
    ) -> Self {
        Self {
            files,
            detections,
            sessions: Mutex::new(sessions.into_iter().collect()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OnboardingApi for MockApi {
    async fn upload_files(&self, _request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        Ok(UploadReceipt {
            upload_id: "up-1".to_string(),
            files: self.files.clone(),
        })
    }

    async fn detect_fields(
        &self,
        _upload_id: &str,
        file_type: FileType,
    ) -> Result<Vec<DetectedField>, ApiError> {
        Ok(self.detections.get(&file_type).cloned().unwrap_or_default())
    }

    async fn submit_mapping(&self, request: &SubmitMappingRequest) -> Result<SubmitAck, ApiError> {
        self.submitted.lock().unwrap().push(request.clone());
        Ok(SubmitAck {
            status: "accepted".to_string(),
            message: String::new(),
        })
    }

    async fn get_status(&self, _upload_id: &str) -> Result<UploadSession, ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Message("status queue exhausted".to_string())))
    }
}

fn policy_file(status: FileStatus) -> UploadedFileRef {
    UploadedFileRef {
        id: "f-pol".to_string(),
        file_type: FileType::Policy,
        status,
    }
}

fn detection(source: &str, canonical: &str, confidence: f32) -> DetectedField {
    DetectedField {
        source_field: source.to_string(),
        suggested_canonical: canonical.to_string(),
        populated_pct: 99.0,
        detected_type: "string".to_string(),
        confidence,
    }
}

fn full_policy_detections() -> BTreeMap<FileType, Vec<DetectedField>> {
    let mut detections = BTreeMap::new();
    detections.insert(
        FileType::Policy,
        vec![
            detection("PolicyNo", "policy_number", 0.95),
            detection("StartDate", "effective_date", 0.92),
            detection("EndDate", "expiration_date", 0.9),
            detection("WrittenPrem", "premium_written", 0.88),
            detection("Product", "product_type", 0.85),
        ],
    );
    detections
}

fn job(status: JobState, progress: f32) -> JobStatus {
    JobStatus {
        file_type: FileType::Policy,
        status,
        progress,
        message: String::new(),
        updated_at: Utc::now(),
    }
}

fn session(jobs: Vec<JobStatus>) -> Result<UploadSession, ApiError> {
    Ok(UploadSession::new("up-1", jobs))
}

#[tokio::test(start_paused = true)]
async fn happy_path_reaches_complete() {
    let api = MockApi::new(
        vec![policy_file(FileStatus::Completed)],
        full_policy_detections(),
        vec![
            session(vec![job(JobState::Running, 0.5)]),
            session(vec![job(JobState::Done, 1.0)]),
        ],
    );
    let mut wizard = WizardController::new(api);
    let mut steps = wizard.subscribe();
    assert_eq!(wizard.step(), WizardStep::Checklist);

    wizard.begin_upload().unwrap();
    wizard.upload(&UploadRequest::default()).await.unwrap();
    wizard.enter_mapping().await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Mapping);
    assert!(wizard.validation().is_valid());

    let mut overall_seen = Vec::new();
    wizard
        .submit_and_track(|s| overall_seen.push(s.overall))
        .await
        .unwrap();

    assert_eq!(wizard.step(), WizardStep::Complete);
    assert_eq!(overall_seen, vec![OverallStatus::Running, OverallStatus::Done]);
    // The mapping table's lifecycle ended when the wizard left the mapping step.
    assert!(wizard.mapping_state().is_none());
    assert!(steps.has_changed().unwrap());
    assert_eq!(*steps.borrow_and_update(), WizardStep::Complete);
}

#[tokio::test]
async fn mapping_requires_completed_policy_file() {
    let api = MockApi::new(
        vec![policy_file(FileStatus::Processing)],
        full_policy_detections(),
        vec![],
    );
    let mut wizard = WizardController::new(api);
    wizard.begin_upload().unwrap();
    wizard.upload(&UploadRequest::default()).await.unwrap();

    let result = wizard.enter_mapping().await;
    assert!(matches!(result, Err(WizardError::PolicyFileRequired)));
    assert_eq!(wizard.step(), WizardStep::Upload);
}

#[tokio::test]
async fn invalid_mapping_blocks_submission() {
    let mut detections = BTreeMap::new();
    detections.insert(
        FileType::Policy,
        vec![
            detection("PolicyNo", "policy_number", 0.95),
            detection("StartDate", "effective_date", 0.92),
        ],
    );
    let api = MockApi::new(vec![policy_file(FileStatus::Completed)], detections, vec![]);
    let mut wizard = WizardController::new(api);
    wizard.begin_upload().unwrap();
    wizard.upload(&UploadRequest::default()).await.unwrap();
    wizard.enter_mapping().await.unwrap();

    let result = wizard.submit_and_track(|_| {}).await;
    match result {
        Err(WizardError::ValidationFailed(errors)) => assert_eq!(errors.len(), 3),
        other => panic!("expected validation failure, got {other:?}"),
    }
    // Still at mapping; nothing was submitted.
    assert_eq!(wizard.step(), WizardStep::Mapping);
}

#[tokio::test(start_paused = true)]
async fn failed_jobs_keep_wizard_at_processing() {
    let api = MockApi::new(
        vec![policy_file(FileStatus::Completed)],
        full_policy_detections(),
        vec![session(vec![job(JobState::Failed, 0.2)])],
    );
    let mut wizard = WizardController::new(api);
    wizard.begin_upload().unwrap();
    wizard.upload(&UploadRequest::default()).await.unwrap();
    wizard.enter_mapping().await.unwrap();

    wizard.submit_and_track(|_| {}).await.unwrap();

    assert_eq!(wizard.step(), WizardStep::Processing);
    assert!(wizard.processing_failed());
    assert_eq!(
        wizard.last_session().unwrap().overall,
        OverallStatus::Failed
    );
}

#[tokio::test]
async fn back_transitions_discard_mapping_state() {
    let api = MockApi::new(
        vec![policy_file(FileStatus::Completed)],
        full_policy_detections(),
        vec![],
    );
    let mut wizard = WizardController::new(api);
    wizard.begin_upload().unwrap();
    wizard.upload(&UploadRequest::default()).await.unwrap();
    wizard.enter_mapping().await.unwrap();
    assert!(wizard.mapping_state().is_some());

    wizard.back().unwrap();
    assert_eq!(wizard.step(), WizardStep::Upload);
    assert!(wizard.mapping_state().is_none());

    wizard.back().unwrap();
    assert_eq!(wizard.step(), WizardStep::Checklist);

    let result = wizard.back();
    assert!(matches!(result, Err(WizardError::WrongStep { .. })));
}

#[tokio::test]
async fn assignment_edits_flow_through_validation() {
    let api = MockApi::new(
        vec![policy_file(FileStatus::Completed)],
        full_policy_detections(),
        vec![],
    );
    let mut wizard = WizardController::new(api);
    wizard.begin_upload().unwrap();
    wizard.upload(&UploadRequest::default()).await.unwrap();
    wizard.enter_mapping().await.unwrap();
    assert!(wizard.validation().is_valid());

    assert!(wizard.unassign(FileType::Policy, "Product"));
    assert!(!wizard.validation().is_valid());

    assert!(wizard.assign(FileType::Policy, "Product", "product_type"));
    assert!(wizard.validation().is_valid());
}
