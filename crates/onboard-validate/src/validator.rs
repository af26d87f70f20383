//! Mapping validation.
//!
//! Three rule families, recomputed in full on every call (the table is
//! small, at most a few dozen rows):
//!
//! - **Required coverage** — every required canonical field of every
//!   uploaded file type must have a mapped source column → **Error**
//! - **Duplicate targets** — a `(file type, canonical field)` pair assigned
//!   to more than one source column → **Error**, once per occurrence beyond
//!   the first, in table order
//! - **Low confidence** — an assigned mapping whose detector confidence is
//!   below 0.7 → **Warning**
//!
//! Warnings never block submission.

use std::collections::BTreeSet;

use serde::Serialize;

use onboard_map::MappingState;
use onboard_model::{CanonicalCatalog, FileType, UploadedFileRef};

/// Assigned mappings below this confidence draw a warning.
pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Outcome of evaluating a mapping table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// A mapping is submittable iff there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Pure validation over a mapping state and the uploaded file set.
pub struct Validator {
    low_confidence_threshold: f32,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }

    /// Evaluate the mapping table. No side effects.
    pub fn evaluate(&self, state: &MappingState, files: &[UploadedFileRef]) -> ValidationReport {
        let mut report = ValidationReport::default();

        // Required coverage, per uploaded file type present.
        for file_type in FileType::ALL {
            if !files.iter().any(|f| f.file_type == file_type) {
                continue;
            }
            for name in CanonicalCatalog::required_fields_for(file_type) {
                let mapped = state
                    .mappings_for(file_type)
                    .any(|m| m.canonical_field.as_deref() == Some(name));
                if !mapped {
                    report
                        .errors
                        .push(format!("Required field \"{name}\" not mapped in {file_type} file"));
                }
            }
        }

        // Duplicate targets, one error per occurrence beyond the first.
        let mut seen: BTreeSet<(FileType, &str)> = BTreeSet::new();
        for mapping in state.mappings() {
            let Some(canonical) = mapping.canonical_field.as_deref() else {
                continue;
            };
            if !seen.insert((mapping.file_type, canonical)) {
                report.errors.push(format!(
                    "Duplicate mapping detected: {}_{canonical}",
                    mapping.file_type
                ));
            }
        }

        // Low-confidence warnings for assigned rows.
        for mapping in state.mappings() {
            if let Some(canonical) = mapping.canonical_field.as_deref()
                && mapping.confidence < self.low_confidence_threshold
            {
                report.warnings.push(format!(
                    "Low confidence mapping for \"{}\" -> \"{canonical}\"",
                    mapping.source_field
                ));
            }
        }

        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
