//! Error types and handling for the flight search application

use thiserror::Error;

/// Shown when either airport code is blank.
pub const MISSING_AIRPORT_CODES: &str = "Please enter both departure and arrival airport codes";

/// Shown for every failed request, whatever the cause.
pub const SEARCH_FAILED: &str = "Failed to search for flights. Please try again.";

/// Main error type for the flight search application
#[derive(Error, Debug)]
pub enum FlightSearchError {
    /// Input validation errors, raised before any request is made
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Transport, HTTP status or decoding failures of the flight API call
    #[error("Request error: {message}")]
    Request { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FlightSearchError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new request error
    pub fn request<S: Into<String>>(message: S) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Request failures collapse into one generic message; the detail is only logged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Request { .. } => SEARCH_FAILED.to_string(),
            Self::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            Self::Io { .. } => "File operation failed. Please check file permissions.".to_string(),
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
