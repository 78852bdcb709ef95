//! Bulk enrollment request types

use serde::{Deserialize, Serialize};

use super::dedup_preserving_order;
use crate::errors::{OpenedxError, Result};
use crate::impl_wire_code_conversions;

/// Enrollment change applied to every (email, course) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentAction {
    #[default]
    Enroll,
    Unenroll,
}

impl_wire_code_conversions!(EnrollmentAction {
    Enroll => "enroll",
    Unenroll => "unenroll",
});

/// Parameters for a bulk enroll/unenroll call
///
/// `emails` and `courses` have set semantics: duplicates are dropped and the
/// first occurrence keeps its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub emails: Vec<String>,
    pub courses: Vec<String>,
    pub action: EnrollmentAction,
    /// Enroll users automatically once they register
    pub auto_enroll: bool,
    /// Notify students by email
    pub email_students: bool,
    /// Cohort names to add the students to
    pub cohorts: Option<Vec<String>>,
    /// LMS (base or site) URL overriding the session base URL
    pub url: Option<String>,
}

impl EnrollmentRequest {
    /// Enroll `emails` in `courses` with the LMS defaults
    /// (`auto_enroll` and `email_students` on)
    pub fn new<E, C>(emails: E, courses: C) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            emails: dedup_preserving_order(emails.into_iter().map(Into::into).collect()),
            courses: dedup_preserving_order(courses.into_iter().map(Into::into).collect()),
            action: EnrollmentAction::Enroll,
            auto_enroll: true,
            email_students: true,
            cohorts: None,
            url: None,
        }
    }

    #[must_use]
    pub fn action(mut self, action: EnrollmentAction) -> Self {
        self.action = action;
        self
    }

    #[must_use]
    pub fn auto_enroll(mut self, enabled: bool) -> Self {
        self.auto_enroll = enabled;
        self
    }

    #[must_use]
    pub fn email_students(mut self, enabled: bool) -> Self {
        self.email_students = enabled;
        self
    }

    #[must_use]
    pub fn cohorts<I>(mut self, cohorts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.cohorts = Some(cohorts.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Build the JSON body expected by the bulk enroll endpoint
    ///
    /// # Errors
    /// Returns `OpenedxError::InvalidInput` when no email or no course is
    /// given.
    pub fn payload(&self) -> Result<BulkEnrollPayload> {
        let emails = non_blank(&self.emails);
        let courses = non_blank(&self.courses);

        if emails.is_empty() {
            return Err(OpenedxError::InvalidInput(
                "at least one email is required for an enrollment change".to_string(),
            ));
        }
        if courses.is_empty() {
            return Err(OpenedxError::InvalidInput(
                "at least one course id is required for an enrollment change".to_string(),
            ));
        }

        let cohorts = self
            .cohorts
            .as_ref()
            .map(|c| non_blank(c))
            .filter(|c| !c.is_empty())
            .map(|c| c.join(","));

        Ok(BulkEnrollPayload {
            auto_enroll: self.auto_enroll,
            email_students: self.email_students,
            action: self.action,
            courses: courses.join(","),
            identifiers: emails.join(","),
            cohorts,
        })
    }
}

fn non_blank(values: &[String]) -> Vec<&str> {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).collect()
}

/// Wire body of `POST /api/bulk_enroll/v1/bulk_enroll/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEnrollPayload {
    pub auto_enroll: bool,
    pub email_students: bool,
    pub action: EnrollmentAction,
    /// Comma-separated course ids
    pub courses: String,
    /// Comma-separated emails
    pub identifiers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohorts: Option<String>,
}
