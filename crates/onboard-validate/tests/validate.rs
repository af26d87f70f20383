use std::collections::BTreeMap;

use onboard_map::MappingState;
use onboard_model::{DetectedField, FileStatus, FileType, UploadedFileRef};
use onboard_validate::Validator;

fn detection(source: &str, canonical: &str) -> DetectedField {
    DetectedField {
        source_field: source.to_string(),
        suggested_canonical: canonical.to_string(),
        populated_pct: 100.0,
        detected_type: "string".to_string(),
        confidence: 0.9,
    }
}

fn fully_mapped_policy() -> (MappingState, Vec<UploadedFileRef>) {
    let files = vec![UploadedFileRef {
        id: "file-1".to_string(),
        file_type: FileType::Policy,
        status: FileStatus::Completed,
    }];
    let mut by_file = BTreeMap::new();
    by_file.insert(
        "file-1".to_string(),
        vec![
            detection("PolicyNo", "policy_number"),
            detection("StartDate", "effective_date"),
            detection("EndDate", "expiration_date"),
            detection("WrittenPrem", "premium_written"),
            detection("Product", "product_type"),
        ],
    );
    (MappingState::initialize(&files, &by_file), files)
}

#[test]
fn complete_policy_mapping_is_valid() {
    let (state, files) = fully_mapped_policy();
    let report = Validator::new().evaluate(&state, &files);
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn unassigning_a_required_field_invalidates() {
    let (mut state, files) = fully_mapped_policy();
    state.unassign(FileType::Policy, "Product");

    let report = Validator::new().evaluate(&state, &files);
    assert!(!report.is_valid());
    assert_eq!(
        report.errors,
        vec!["Required field \"product_type\" not mapped in policy file".to_string()]
    );
}

#[test]
fn reassigning_onto_an_occupied_target_invalidates() {
    let (mut state, files) = fully_mapped_policy();
    // Last-writer-wins at the state level; the validator reports both the
    // vacated required field and the duplicate pair.
    state.assign(FileType::Policy, "EndDate", "policy_number");

    let report = Validator::new().evaluate(&state, &files);
    assert!(!report.is_valid());
    assert!(report.errors.contains(
        &"Required field \"expiration_date\" not mapped in policy file".to_string()
    ));
    assert!(report
        .errors
        .contains(&"Duplicate mapping detected: policy_policy_number".to_string()));
}

#[test]
fn repairing_the_state_restores_validity() {
    let (mut state, files) = fully_mapped_policy();
    state.assign(FileType::Policy, "EndDate", "policy_number");
    state.assign(FileType::Policy, "EndDate", "expiration_date");

    let report = Validator::new().evaluate(&state, &files);
    assert!(report.is_valid());
}
