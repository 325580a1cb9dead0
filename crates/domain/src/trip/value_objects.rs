//! Value objects for the trip domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TripError;

/// Longest address accepted (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 320;

/// The editable descriptive attributes of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    pub name: String,
    pub country: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
}

impl TripDetails {
    /// Creates a new set of trip details.
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        description: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            description: description.into(),
            start_date,
        }
    }

    /// Checks that name, country and description are non-empty.
    ///
    /// Length limits are enforced at the API boundary, not here.
    pub fn validate(&self) -> Result<(), TripError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("country", &self.country)?;
        require_non_empty("description", &self.description)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), TripError> {
    if value.is_empty() {
        return Err(TripError::InvalidArgument { field });
    }
    Ok(())
}

/// An email address with a plausible shape.
///
/// Only the shape is checked: exactly one `@`, a non-empty local part and
/// domain, and no whitespace. Comparison is exact, so addresses differing
/// only in case are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and validates an email address.
    pub fn parse(value: impl Into<String>) -> Result<Self, TripError> {
        let value = value.into();

        if value.is_empty() {
            return Err(TripError::InvalidArgument {
                field: "email_address",
            });
        }

        let well_formed = value.len() <= MAX_EMAIL_LEN
            && !value.chars().any(char::is_whitespace)
            && match value.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
                }
                None => false,
            };

        if !well_formed {
            return Err(TripError::InvalidEmail(value));
        }
        Ok(Self(value))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = TripError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
