//! ISO-3166 alpha-2 country code value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated two-letter country code, stored uppercase
///
/// # Examples
///
/// ```
/// use domain::CountryCode;
///
/// let code = CountryCode::new("ua").unwrap();
/// assert_eq!(code.as_str(), "UA");
/// assert!(CountryCode::new("UKR").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Create a country code, validating it is exactly two ASCII letters
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly two ASCII letters.
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let value = code.into().trim().to_uppercase();

        if value.len() != 2 || !value.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::InvalidCountryCode(value));
        }

        Ok(Self(value))
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for CountryCode {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_code_is_accepted() {
        let code = CountryCode::new("UA").unwrap();
        assert_eq!(code.as_str(), "UA");
    }

    #[test]
    fn code_is_normalized_to_uppercase() {
        let code = CountryCode::new("de").unwrap();
        assert_eq!(code.as_str(), "DE");
    }

    #[test]
    fn whitespace_is_trimmed() {
        let code = CountryCode::new(" gb ").unwrap();
        assert_eq!(code.as_str(), "GB");
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(CountryCode::new("UKR").is_err());
        assert!(CountryCode::new("U").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn non_letters_are_rejected() {
        assert!(CountryCode::new("U1").is_err());
        assert!(CountryCode::new("--").is_err());
    }

    #[test]
    fn display_format() {
        let code = CountryCode::new("fr").unwrap();
        assert_eq!(code.to_string(), "FR");
    }
}
