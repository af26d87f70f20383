#![deny(unsafe_code)]

pub mod api;
pub mod error;
pub mod http;
pub mod poll;
pub mod submit;

pub use api::{
    MappingEntry, OnboardingApi, SubmitAck, SubmitMappingRequest, UploadReceipt, UploadRequest,
};
pub use error::{ApiError, PollError, SubmitError};
pub use http::HttpApi;
pub use poll::{POLL_INTERVAL, StatusPoller};
pub use submit::{MappingSubmitter, SubmittedMapping};
