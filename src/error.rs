//! # Provider Error Types
//!
//! Structured error handling for the resolution engine using thiserror
//! for typed error variants instead of `Box<dyn Error>` patterns.
//!
//! A selection miss is never an error: every `select_*` entry point returns
//! `Option::None` when no candidate survives, and the calling pipeline
//! decides whether that is a protocol-level failure. The variants below
//! cover genuine engine faults only.

use thiserror::Error;

/// Errors surfaced by the resolution engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Malformed media type '{value}': {reason}")]
    MalformedMediaType { value: String, reason: String },

    #[error("Configuration error: {setting}: {message}")]
    Configuration { setting: String, message: String },

    #[error("Context injection failed for '{component}': {message}")]
    Injection { component: String, message: String },

    #[error("Entity conversion failed: {message}")]
    Conversion { message: String },
}

impl ProviderError {
    /// Create a malformed media type error
    pub fn malformed_media_type(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMediaType {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            setting: setting.into(),
            message: message.into(),
        }
    }

    /// Create a context injection error
    pub fn injection(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Injection {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an entity conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
