use openedx_domain::constants::URL_BULK_ENROLL;
use openedx_domain::EnrollmentRequest;
use serde_json::Value;
use tracing::{info, instrument};

use super::OpenedxClient;
use crate::api::ApiError;

impl OpenedxClient {
    /// Enroll or unenroll every email in every course
    ///
    /// Returns the LMS answer as is: an object with a `courses` map keyed by
    /// course id, each entry listing per-identifier `before`/`after` state.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`] when no email or no course is given (no
    /// request is sent); otherwise see [`crate::api::ApiClient::request`].
    #[instrument(
        skip(self, request),
        fields(action = %request.action, emails = request.emails.len(), courses = request.courses.len())
    )]
    pub async fn change_enrollment(&self, request: &EnrollmentRequest) -> Result<Value, ApiError> {
        let payload = request.payload()?;
        let body = serde_json::to_value(&payload)
            .map_err(|e| ApiError::InvalidInput(format!("Failed to serialize enrollment: {e}")))?;

        let url = self.endpoint(request.url.as_deref(), URL_BULK_ENROLL);
        let result = self.api.post(&url, &body).await?;

        info!("Enrollment change applied");
        Ok(result)
    }
}
