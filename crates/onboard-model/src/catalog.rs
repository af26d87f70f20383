//! The canonical field catalog: the single source of truth for which target
//! columns exist per file type, their semantic types, and whether they are
//! required before a mapping is submittable.
//!
//! Both validation and display consume this catalog; nothing else in the
//! workspace defines canonical field names.

use crate::enums::{FileType, SemanticType};

/// Specification of one canonical target field.
///
/// Within a file type, `name` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalFieldSpec {
    /// Canonical column name, e.g. `policy_number`.
    pub name: &'static str,
    /// Semantic type the transform expects for this column.
    pub semantic_type: SemanticType,
    /// Required fields must each have exactly one mapped source column.
    pub required: bool,
    /// File type this field belongs to.
    pub file_type: FileType,
}

const fn spec(
    name: &'static str,
    semantic_type: SemanticType,
    required: bool,
    file_type: FileType,
) -> CanonicalFieldSpec {
    CanonicalFieldSpec {
        name,
        semantic_type,
        required,
        file_type,
    }
}

const POLICY_FIELDS: &[CanonicalFieldSpec] = &[
    spec("policy_number", SemanticType::String, true, FileType::Policy),
    spec("effective_date", SemanticType::Date, true, FileType::Policy),
    spec("expiration_date", SemanticType::Date, true, FileType::Policy),
    spec("premium_written", SemanticType::Decimal, true, FileType::Policy),
    spec("product_type", SemanticType::Enum, true, FileType::Policy),
    spec("insured_name", SemanticType::String, false, FileType::Policy),
    spec("risk_state", SemanticType::Enum, false, FileType::Policy),
    spec("risk_zip", SemanticType::String, false, FileType::Policy),
    spec("annual_premium", SemanticType::Decimal, false, FileType::Policy),
    spec("limit_amount", SemanticType::Decimal, false, FileType::Policy),
    spec("deductible_amount", SemanticType::Decimal, false, FileType::Policy),
];

const CLAIM_FIELDS: &[CanonicalFieldSpec] = &[
    spec("claim_number", SemanticType::String, true, FileType::Claim),
    spec("policy_number", SemanticType::String, true, FileType::Claim),
    spec("loss_date", SemanticType::Date, true, FileType::Claim),
    spec("paid_amount", SemanticType::Decimal, true, FileType::Claim),
    spec("reserve_amount", SemanticType::Decimal, false, FileType::Claim),
    spec("claim_status", SemanticType::Enum, false, FileType::Claim),
    spec("reported_date", SemanticType::Date, false, FileType::Claim),
    spec("cause_of_loss", SemanticType::String, false, FileType::Claim),
];

const CANCEL_FIELDS: &[CanonicalFieldSpec] = &[
    spec("policy_number", SemanticType::String, true, FileType::Cancel),
    spec("cancellation_date", SemanticType::Date, true, FileType::Cancel),
    spec("cancellation_reason", SemanticType::Enum, false, FileType::Cancel),
    spec("return_premium", SemanticType::Decimal, false, FileType::Cancel),
];

/// Static per-file-type canonical schema.
///
/// Pure lookups, no error conditions.
pub struct CanonicalCatalog;

impl CanonicalCatalog {
    /// Canonical fields for a file type, in display order.
    pub fn fields_for(file_type: FileType) -> &'static [CanonicalFieldSpec] {
        match file_type {
            FileType::Policy => POLICY_FIELDS,
            FileType::Claim => CLAIM_FIELDS,
            FileType::Cancel => CANCEL_FIELDS,
        }
    }

    /// Names of the required canonical fields for a file type.
    pub fn required_fields_for(
        file_type: FileType,
    ) -> impl Iterator<Item = &'static str> {
        Self::fields_for(file_type)
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
    }

    /// Look up a canonical field by name within a file type.
    pub fn find(file_type: FileType, name: &str) -> Option<&'static CanonicalFieldSpec> {
        Self::fields_for(file_type).iter().find(|f| f.name == name)
    }

    /// True when `name` is a required canonical field of `file_type`.
    pub fn is_required(file_type: FileType, name: &str) -> bool {
        Self::find(file_type, name).is_some_and(|f| f.required)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn names_unique_within_file_type() {
        for file_type in FileType::ALL {
            let fields = CanonicalCatalog::fields_for(file_type);
            let names: BTreeSet<&str> = fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), fields.len(), "duplicate name in {file_type}");
        }
    }

    #[test]
    fn policy_required_set() {
        let required: Vec<&str> = CanonicalCatalog::required_fields_for(FileType::Policy).collect();
        assert_eq!(
            required,
            vec![
                "policy_number",
                "effective_date",
                "expiration_date",
                "premium_written",
                "product_type",
            ]
        );
    }

    #[test]
    fn find_and_is_required() {
        let found = CanonicalCatalog::find(FileType::Claim, "loss_date").unwrap();
        assert_eq!(found.semantic_type, SemanticType::Date);
        assert!(found.required);
        assert!(!CanonicalCatalog::is_required(FileType::Claim, "reserve_amount"));
        assert!(CanonicalCatalog::find(FileType::Cancel, "loss_date").is_none());
    }
}
