#![deny(unsafe_code)]

pub mod validator;

pub use validator::{LOW_CONFIDENCE_THRESHOLD, ValidationReport, Validator};
