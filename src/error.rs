//! Error types and handling for the `medi-snow` forecast library

use thiserror::Error;

/// Main error type for the `medi-snow` library
#[derive(Error, Debug)]
pub enum MediSnowError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Timezone name could not be resolved to a rule set
    #[error("Invalid timezone: {name}")]
    InvalidTimezone { name: String },

    /// No timezone is known for a coordinate
    #[error("No timezone found for ({latitude}, {longitude})")]
    TimezoneLookup { latitude: f64, longitude: f64 },

    /// Provider payload is missing data the assembly depends on
    #[error("Malformed provider response: {message}")]
    MalformedProviderResponse { message: String },

    /// Coordinate lies outside every known avalanche zone
    #[error("No avalanche zone found for ({latitude}, {longitude})")]
    NoZoneMatch { latitude: f64, longitude: f64 },

    /// Both concurrent point lookups failed
    #[error("multiple errors: elevation: {elevation}; location: {location}")]
    MultipleSourceFailure { elevation: String, location: String },
}

impl MediSnowError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn invalid_timezone<S: Into<String>>(name: S) -> Self {
        Self::InvalidTimezone { name: name.into() }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedProviderResponse {
            message: message.into(),
        }
    }

    /// True when the error means "nothing here" rather than a failure
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoZoneMatch { .. } | Self::TimezoneLookup { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            MediSnowError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            MediSnowError::Api { .. } | MediSnowError::MultipleSourceFailure { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            MediSnowError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            MediSnowError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            MediSnowError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            MediSnowError::InvalidTimezone { name } => {
                format!("The forecast provider returned an unknown timezone '{name}'.")
            }
            MediSnowError::TimezoneLookup { .. } => {
                "No timezone is known for this location.".to_string()
            }
            MediSnowError::MalformedProviderResponse { .. } => {
                "The forecast provider returned incomplete data. Please try again later."
                    .to_string()
            }
            MediSnowError::NoZoneMatch { .. } => {
                "This location is not covered by any avalanche forecast zone.".to_string()
            }
        }
    }
}

impl From<fjall::Error> for MediSnowError {
    fn from(err: fjall::Error) -> Self {
        Self::cache(err.to_string())
    }
}

impl From<postcard::Error> for MediSnowError {
    fn from(err: postcard::Error) -> Self {
        Self::cache(err.to_string())
    }
}
