//! Job and session status types for tracking server-side transformation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{FileType, JobState, OverallStatus};

/// Status of one file type's transformation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    /// File type this job is transforming.
    pub file_type: FileType,
    /// Current job state.
    pub status: JobState,
    /// Completion fraction (0.0 to 1.0).
    pub progress: f32,
    /// Human-readable status message from the server.
    #[serde(default)]
    pub message: String,
    /// When the server last updated this job.
    pub updated_at: DateTime<Utc>,
}

/// Aggregate status of all jobs for one upload.
///
/// `overall` is always the deterministic reduction of `jobs`; consumers that
/// receive a session off the wire call [`UploadSession::normalize`] so a
/// disagreeing server value cannot break that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSession {
    /// Upload this session tracks.
    pub upload_id: String,
    /// Per-file-type jobs, in submission order.
    pub jobs: Vec<JobStatus>,
    /// Session-level reduction of `jobs`.
    pub overall: OverallStatus,
}

impl UploadSession {
    /// Create a session with `overall` computed from `jobs`.
    pub fn new(upload_id: impl Into<String>, jobs: Vec<JobStatus>) -> Self {
        let overall = OverallStatus::reduce(&jobs);
        Self {
            upload_id: upload_id.into(),
            jobs,
            overall,
        }
    }

    /// Recompute `overall` from `jobs`, discarding whatever the wire said.
    pub fn normalize(mut self) -> Self {
        self.overall = OverallStatus::reduce(&self.jobs);
        self
    }

    /// Mean progress across jobs, 0.0 when there are none.
    pub fn aggregate_progress(&self) -> f32 {
        if self.jobs.is_empty() {
            return 0.0;
        }
        let total: f32 = self.jobs.iter().map(|j| j.progress).sum();
        total / self.jobs.len() as f32
    }
}

impl OverallStatus {
    /// Deterministic reduction of a job list.
    ///
    /// `Done` iff all jobs are done; `Failed` iff any job failed; `Pending`
    /// while every job is still queued with no progress; `Running` otherwise.
    /// An empty job list reduces to `Unknown`.
    pub fn reduce(jobs: &[JobStatus]) -> Self {
        if jobs.is_empty() {
            return Self::Unknown;
        }
        if jobs.iter().any(|j| j.status == JobState::Failed) {
            return Self::Failed;
        }
        if jobs.iter().all(|j| j.status == JobState::Done) {
            return Self::Done;
        }
        if jobs
            .iter()
            .all(|j| j.status == JobState::Queued && j.progress == 0.0)
        {
            return Self::Pending;
        }
        Self::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(file_type: FileType, status: JobState, progress: f32) -> JobStatus {
        JobStatus {
            file_type,
            status,
            progress,
            message: String::new(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_jobs_reduce_to_unknown() {
        assert_eq!(OverallStatus::reduce(&[]), OverallStatus::Unknown);
    }

    #[test]
    fn any_failed_job_fails_the_session() {
        let jobs = vec![
            job(FileType::Policy, JobState::Done, 1.0),
            job(FileType::Claim, JobState::Failed, 0.3),
        ];
        assert_eq!(OverallStatus::reduce(&jobs), OverallStatus::Failed);
    }

    #[test]
    fn done_requires_all_jobs_done() {
        // One done, one still running: the session is running, not done.
        let jobs = vec![
            job(FileType::Policy, JobState::Done, 1.0),
            job(FileType::Claim, JobState::Running, 0.4),
        ];
        assert_eq!(OverallStatus::reduce(&jobs), OverallStatus::Running);

        let jobs = vec![
            job(FileType::Policy, JobState::Done, 1.0),
            job(FileType::Claim, JobState::Done, 1.0),
        ];
        assert_eq!(OverallStatus::reduce(&jobs), OverallStatus::Done);
    }

    #[test]
    fn all_queued_is_pending() {
        let jobs = vec![
            job(FileType::Policy, JobState::Queued, 0.0),
            job(FileType::Cancel, JobState::Queued, 0.0),
        ];
        assert_eq!(OverallStatus::reduce(&jobs), OverallStatus::Pending);
    }

    #[test]
    fn normalize_overrides_wire_overall() {
        let mut session = UploadSession::new("up-1", vec![job(FileType::Policy, JobState::Running, 0.5)]);
        session.overall = OverallStatus::Done;
        let session = session.normalize();
        assert_eq!(session.overall, OverallStatus::Running);
    }

    #[test]
    fn session_serializes() {
        let session = UploadSession::new("up-1", vec![job(FileType::Policy, JobState::Queued, 0.0)]);
        let json = serde_json::to_string(&session).expect("serialize session");
        let round: UploadSession = serde_json::from_str(&json).expect("deserialize session");
        assert_eq!(round.upload_id, "up-1");
        assert_eq!(round.overall, OverallStatus::Pending);
    }
}
