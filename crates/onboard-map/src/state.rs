//! Mapping state management for the interactive mapping step.
//!
//! [`MappingState`] is the single assignment engine: every input modality
//! (dropdown selection, drag gesture, CLI auto-accept) funnels through
//! [`MappingState::assign`] and [`MappingState::unassign`]. Uniqueness of
//! canonical targets is deliberately *not* enforced at write time; the user
//! may pass through temporarily-invalid states while editing, and the
//! validator reports duplicates on every recomputation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use onboard_model::{
    CanonicalCatalog, CanonicalFieldSpec, DetectedField, FieldMapping, FileType, UploadedFileRef,
};

/// The mutable source-to-canonical assignment table for one wizard session.
///
/// Rows are keyed by `(file_type, source_field)` and live from the arrival
/// of detection suggestions until the wizard advances past the mapping step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingState {
    mappings: Vec<FieldMapping>,
}

impl MappingState {
    /// Seed the table from detection suggestions, one row per suggestion.
    ///
    /// Each row starts pre-assigned to its suggested canonical field, with
    /// `required` derived from the catalog. Suggestions for files that are
    /// not in `files` are ignored.
    pub fn initialize(
        files: &[UploadedFileRef],
        suggestions_by_file: &BTreeMap<String, Vec<DetectedField>>,
    ) -> Self {
        let mut mappings = Vec::new();
        for file in files {
            let Some(suggestions) = suggestions_by_file.get(&file.id) else {
                continue;
            };
            for detected in suggestions {
                mappings.push(FieldMapping::from_detection(file.file_type, detected));
            }
        }
        debug!(rows = mappings.len(), "mapping state initialized");
        Self { mappings }
    }

    /// Assign a canonical field to a source column, overwriting any previous
    /// assignment (last writer wins). Returns false when no such row exists.
    pub fn assign(&mut self, file_type: FileType, source_field: &str, canonical_field: &str) -> bool {
        let Some(mapping) = self.row_mut(file_type, source_field) else {
            return false;
        };
        mapping.canonical_field = Some(canonical_field.to_string());
        mapping.required = CanonicalCatalog::is_required(file_type, canonical_field);
        true
    }

    /// Clear a source column's assignment. Returns false when no such row exists.
    pub fn unassign(&mut self, file_type: FileType, source_field: &str) -> bool {
        let Some(mapping) = self.row_mut(file_type, source_field) else {
            return false;
        };
        mapping.canonical_field = None;
        mapping.required = false;
        true
    }

    /// Full catalog spec for a canonical name currently assigned within
    /// `file_type`, for display. `None` when nothing is assigned to it.
    pub fn resolved_field(
        &self,
        file_type: FileType,
        canonical_name: &str,
    ) -> Option<&'static CanonicalFieldSpec> {
        let assigned = self
            .mappings_for(file_type)
            .any(|m| m.canonical_field.as_deref() == Some(canonical_name));
        if assigned {
            CanonicalCatalog::find(file_type, canonical_name)
        } else {
            None
        }
    }

    /// All rows, in insertion order.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Rows belonging to one file type.
    pub fn mappings_for(&self, file_type: FileType) -> impl Iterator<Item = &FieldMapping> {
        self.mappings.iter().filter(move |m| m.file_type == file_type)
    }

    /// Assigned rows grouped by file type, keyed by source field.
    ///
    /// This is the submission snapshot: unassigned rows never appear, and
    /// file types with no assigned rows are absent from the result.
    pub fn grouped_assigned(&self) -> BTreeMap<FileType, Vec<&FieldMapping>> {
        let mut grouped: BTreeMap<FileType, Vec<&FieldMapping>> = BTreeMap::new();
        for mapping in self.mappings.iter().filter(|m| m.is_assigned()) {
            grouped.entry(mapping.file_type).or_default().push(mapping);
        }
        grouped
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// True when no suggestions have been loaded.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn row_mut(&mut self, file_type: FileType, source_field: &str) -> Option<&mut FieldMapping> {
        self.mappings
            .iter_mut()
            .find(|m| m.file_type == file_type && m.source_field == source_field)
    }
}
