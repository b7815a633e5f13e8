//! Inbound point-of-interest description and its validation.

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

pub const MAX_NAME_CHARS: usize = 500;
pub const MAX_CATEGORY_CHARS: usize = 100;
pub const MAX_LANGUAGE_CHARS: usize = 50;
pub const DEFAULT_LANGUAGE: &str = "English";

/// Raw request as received from the boundary.
///
/// Missing string fields deserialize as empty so they fail validation with a
/// field-specific message instead of a JSON error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttractionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub language: Option<String>,
}

/// A validated, normalized point of interest. Only obtainable through
/// [`AttractionRequest::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    name: String,
    category: String,
    latitude: f64,
    longitude: f64,
    language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Category,
    Latitude,
    Longitude,
    Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    field: Field,
    message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl AttractionRequest {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            latitude,
            longitude,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Checks fields in order name, category, latitude, longitude, language
    /// and reports the first violation.
    pub fn validate(self) -> Result<Attraction, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new(Field::Name, "name is required"));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::new(
                Field::Name,
                format!("name must be at most {MAX_NAME_CHARS} characters"),
            ));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::new(
                Field::Category,
                "category is required",
            ));
        }
        if category.chars().count() > MAX_CATEGORY_CHARS {
            return Err(ValidationError::new(
                Field::Category,
                format!("category must be at most {MAX_CATEGORY_CHARS} characters"),
            ));
        }

        // NaN fails both comparisons, so `contains` rejects it.
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::new(
                Field::Latitude,
                "latitude must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::new(
                Field::Longitude,
                "longitude must be between -180 and 180",
            ));
        }

        let language = self.language.as_deref().map(str::trim).unwrap_or_default();
        if language.chars().count() > MAX_LANGUAGE_CHARS {
            return Err(ValidationError::new(
                Field::Language,
                format!("language must be at most {MAX_LANGUAGE_CHARS} characters"),
            ));
        }
        let language = if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        };

        Ok(Attraction {
            name: name.to_string(),
            category: category.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            language: language.to_string(),
        })
    }
}

impl Attraction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}
