//! Account registration request types

use serde::{Deserialize, Serialize};

use crate::errors::{OpenedxError, Result};
use crate::impl_wire_code_conversions;

/// Highest completed level of education, as coded by the LMS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOfEducation {
    #[serde(rename = "p")]
    Doctorate,
    #[serde(rename = "m")]
    Masters,
    #[serde(rename = "b")]
    Bachelors,
    #[serde(rename = "a")]
    Associate,
    #[serde(rename = "hs")]
    HighSchool,
    #[serde(rename = "jhs")]
    JuniorHighSchool,
    #[serde(rename = "el")]
    Elementary,
    #[serde(rename = "none")]
    NoFormalEducation,
    #[serde(rename = "other")]
    Other,
}

impl_wire_code_conversions!(LevelOfEducation {
    Doctorate => "p",
    Masters => "m",
    Bachelors => "b",
    Associate => "a",
    HighSchool => "hs",
    JuniorHighSchool => "jhs",
    Elementary => "el",
    NoFormalEducation => "none",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "o")]
    Other,
}

impl_wire_code_conversions!(Gender {
    Male => "m",
    Female => "f",
    Other => "o",
});

/// Body of `POST /api/user/v1/account/registration/`
///
/// `email`, `username`, `name` and `password` are required; everything else
/// is omitted from the payload when unset. When `terms_of_service` is unset
/// it takes the value of `honor_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub email: String,
    pub username: String,
    /// Full name
    pub name: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_of_education: Option<LevelOfEducation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// ISO-3166-1 alpha-2 code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honor_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_emails_opt_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_auth_provider: Option<String>,
    /// LMS (base or site) URL overriding the session base URL
    #[serde(skip)]
    pub url: Option<String>,
}

impl RegistrationForm {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            name: name.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn level_of_education(mut self, level: LevelOfEducation) -> Self {
        self.level_of_education = Some(level);
        self
    }

    #[must_use]
    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    #[must_use]
    pub fn mailing_address(mut self, address: impl Into<String>) -> Self {
        self.mailing_address = Some(address.into());
        self
    }

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn goals(mut self, goals: impl Into<String>) -> Self {
        self.goals = Some(goals.into());
        self
    }

    #[must_use]
    pub fn year_of_birth(mut self, year: u16) -> Self {
        self.year_of_birth = Some(year);
        self
    }

    #[must_use]
    pub fn honor_code(mut self, accepted: bool) -> Self {
        self.honor_code = Some(accepted);
        self
    }

    #[must_use]
    pub fn terms_of_service(mut self, accepted: bool) -> Self {
        self.terms_of_service = Some(accepted);
        self
    }

    #[must_use]
    pub fn marketing_emails_opt_in(mut self, opt_in: bool) -> Self {
        self.marketing_emails_opt_in = Some(opt_in);
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn social_auth_provider(mut self, provider: impl Into<String>) -> Self {
        self.social_auth_provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Validate the form and build the JSON body sent to the LMS
    ///
    /// The country code is upper-cased and `terms_of_service` falls back to
    /// `honor_code`.
    ///
    /// # Errors
    /// Returns `OpenedxError::InvalidInput` if a required field is blank, the
    /// country is not a two-letter code, or the year of birth is not a
    /// four-digit year.
    pub fn payload(&self) -> Result<serde_json::Value> {
        for (field, value) in [
            ("email", &self.email),
            ("username", &self.username),
            ("name", &self.name),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(OpenedxError::InvalidInput(format!("{field} is required")));
            }
        }

        let mut resolved = self.clone();

        if let Some(country) = &self.country {
            let country = country.trim();
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(OpenedxError::InvalidInput(format!(
                    "country must be an ISO-3166-1 alpha-2 code, got {country:?}"
                )));
            }
            resolved.country = Some(country.to_ascii_uppercase());
        }

        if let Some(year) = self.year_of_birth {
            if !(1000..=9999).contains(&year) {
                return Err(OpenedxError::InvalidInput(format!(
                    "year_of_birth must be a four-digit year, got {year}"
                )));
            }
        }

        if resolved.terms_of_service.is_none() {
            resolved.terms_of_service = resolved.honor_code;
        }

        serde_json::to_value(&resolved)
            .map_err(|e| OpenedxError::Internal(format!("Failed to serialize registration: {e}")))
    }
}
