use thiserror::Error;

use onboard_client::{ApiError, PollError, SubmitError};

#[derive(Debug, Error)]
pub enum WizardError {
    /// A step was requested out of order.
    #[error("wizard is at {found} but {expected} is required")]
    WrongStep {
        expected: crate::WizardStep,
        found: crate::WizardStep,
    },
    /// The mapping step requires at least one completed policy file.
    #[error("a completed policy file is required before mapping")]
    PolicyFileRequired,
    /// The validator reported errors; submission was not attempted.
    #[error("mapping validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Poll(#[from] PollError),
}
