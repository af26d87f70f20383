//! Detection and mapping records for source-to-canonical column mapping.

use serde::{Deserialize, Serialize};

use crate::catalog::CanonicalCatalog;
use crate::enums::{FileStatus, FileType};

/// A source column detected in an uploaded file, with the detector's
/// suggested canonical target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedField {
    /// Column name as it appears in the source file.
    pub source_field: String,
    /// Suggested canonical field name.
    pub suggested_canonical: String,
    /// Percentage of non-empty values observed (0.0 to 100.0).
    pub populated_pct: f64,
    /// Detector's best guess at the column's data type.
    pub detected_type: String,
    /// Likelihood that the suggestion is correct (0.0 to 1.0).
    pub confidence: f32,
}

/// One row of the mapping table: a source column and its (possibly absent)
/// canonical assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Source column name.
    pub source_field: String,
    /// Assigned canonical field, `None` when unassigned.
    pub canonical_field: Option<String>,
    /// File type the source column came from.
    pub file_type: FileType,
    /// Percentage of non-empty values observed (0.0 to 100.0).
    pub populated_pct: f64,
    /// Detected source data type.
    pub detected_type: String,
    /// Detector confidence for the original suggestion (0.0 to 1.0).
    pub confidence: f32,
    /// Whether the assigned canonical field is required by the catalog.
    /// Derived from `canonical_field` at creation/assignment time.
    pub required: bool,
}

impl FieldMapping {
    /// Build a mapping from a detection suggestion, pre-assigning the
    /// suggested canonical field and deriving `required` from the catalog.
    pub fn from_detection(file_type: FileType, detected: &DetectedField) -> Self {
        let canonical_field = if detected.suggested_canonical.is_empty() {
            None
        } else {
            Some(detected.suggested_canonical.clone())
        };
        let required = canonical_field
            .as_deref()
            .is_some_and(|name| CanonicalCatalog::is_required(file_type, name));
        Self {
            source_field: detected.source_field.clone(),
            canonical_field,
            file_type,
            populated_pct: detected.populated_pct,
            detected_type: detected.detected_type.clone(),
            confidence: detected.confidence,
            required,
        }
    }

    /// True when a canonical field is currently assigned.
    pub fn is_assigned(&self) -> bool {
        self.canonical_field.is_some()
    }
}

/// Reference to a file managed by the upload service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFileRef {
    /// Upload-service identifier for this file.
    pub id: String,
    /// File type declared at upload time.
    pub file_type: FileType,
    /// Current upload/parse status.
    pub status: FileStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(source: &str, canonical: &str, confidence: f32) -> DetectedField {
        DetectedField {
            source_field: source.to_string(),
            suggested_canonical: canonical.to_string(),
            populated_pct: 100.0,
            detected_type: "string".to_string(),
            confidence,
        }
    }

    #[test]
    fn from_detection_derives_required() {
        let mapping =
            FieldMapping::from_detection(FileType::Policy, &detection("PolicyNo", "policy_number", 0.95));
        assert_eq!(mapping.canonical_field.as_deref(), Some("policy_number"));
        assert!(mapping.required);

        let optional =
            FieldMapping::from_detection(FileType::Policy, &detection("Insured", "insured_name", 0.8));
        assert!(!optional.required);
    }

    #[test]
    fn empty_suggestion_starts_unassigned() {
        let mapping = FieldMapping::from_detection(FileType::Claim, &detection("Misc", "", 0.1));
        assert!(!mapping.is_assigned());
        assert!(!mapping.required);
    }
}
