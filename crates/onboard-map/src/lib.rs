#![deny(unsafe_code)]

pub mod state;

pub use state::MappingState;
