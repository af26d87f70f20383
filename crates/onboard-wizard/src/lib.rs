#![deny(unsafe_code)]

pub mod controller;
pub mod error;

pub use controller::{WizardController, WizardStep};
pub use error::WizardError;
