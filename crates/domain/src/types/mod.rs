//! Request types for LMS endpoints
//!
//! Responses are passed through as `serde_json::Value`; only request
//! payloads are modelled here.

pub mod enrollment;
pub mod registration;

pub use enrollment::{BulkEnrollPayload, EnrollmentAction, EnrollmentRequest};
pub use registration::{Gender, LevelOfEducation, RegistrationForm};

/// Remove duplicates while keeping the first occurrence of each value
pub(crate) fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values.into_iter().filter(|value| seen.insert(value.clone())).collect()
}
