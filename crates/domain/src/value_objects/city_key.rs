//! Composite city lookup key
//!
//! Cities are identified by the (name, region, country code) triple,
//! compared case-sensitively as stored. The region may be empty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::CountryCode;

/// Maximum length of a city name
pub const MAX_NAME_LEN: usize = 150;
/// Maximum length of a region/state name
pub const MAX_REGION_LEN: usize = 150;

/// The composite identity of a city: name, region and country code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityKey {
    name: String,
    region: String,
    country_code: CountryCode,
}

impl CityKey {
    /// Build a validated city key
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is empty or longer than 150
    /// characters, the region is longer than 150 characters, or the country
    /// code is not two ASCII letters.
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let region = region.into().trim().to_string();

        if name.is_empty() {
            return Err(DomainError::validation("city name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "city name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        if region.chars().count() > MAX_REGION_LEN {
            return Err(DomainError::validation(format!(
                "region must be at most {MAX_REGION_LEN} characters"
            )));
        }

        Ok(Self {
            name,
            region,
            country_code: CountryCode::new(country_code)?,
        })
    }

    /// The city name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The region or state; may be empty
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The country code
    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.region.is_empty() {
            write!(f, "{}, {}", self.name, self.country_code)
        } else {
            write!(f, "{}, {}, {}", self.name, self.region, self.country_code)
        }
    }
}
