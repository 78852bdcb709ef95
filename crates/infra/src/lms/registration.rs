use openedx_domain::constants::{URL_ACCOUNT_REGISTRATION, URL_REGISTRATION_VALIDATION};
use openedx_domain::RegistrationForm;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::OpenedxClient;
use crate::api::ApiError;

impl OpenedxClient {
    /// Ask the LMS to validate registration fields without creating an
    /// account
    ///
    /// The answer has `validation_decisions` (field → message, empty for
    /// valid fields) and `username_suggestions`.
    ///
    /// # Errors
    /// See [`crate::api::ApiClient::request`].
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub async fn validate_registration(
        &self,
        fields: &Map<String, Value>,
        url: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(url, URL_REGISTRATION_VALIDATION);
        self.api.post(&url, &Value::Object(fields.clone())).await
    }

    /// Register a new LMS account
    ///
    /// A rejected registration (duplicate username, weak password, ...) is
    /// not an error: the LMS answer with per-field `user_message`s,
    /// `error_code` and `username_suggestions` is returned as is.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`] when the form fails local validation (no
    /// request is sent); [`ApiError::Http`] for server errors and 4xx answers
    /// without the rejection shape; otherwise see
    /// [`crate::api::ApiClient::request`].
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn register_account(&self, form: &RegistrationForm) -> Result<Value, ApiError> {
        let body = form.payload()?;
        let url = self.endpoint(form.url.as_deref(), URL_ACCOUNT_REGISTRATION);

        let response = self.api.execute(Method::POST, &url, &[], Some(&body)).await?;

        if response.is_success() {
            info!("Account registered");
            return Ok(response.body);
        }

        if response.status.is_client_error() && is_registration_failure(&response.body) {
            warn!(status = response.status.as_u16(), "Registration rejected by the LMS");
            return Ok(response.body);
        }

        response.into_result()
    }
}

/// A rejected registration carries `error_code` or at least one field mapped
/// to a list of `{user_message}` objects
fn is_registration_failure(body: &Value) -> bool {
    let Some(object) = body.as_object() else {
        return false;
    };

    object.contains_key("error_code")
        || object.values().any(|value| {
            value.as_array().is_some_and(|messages| {
                !messages.is_empty()
                    && messages.iter().all(|message| message.get("user_message").is_some())
            })
        })
}
