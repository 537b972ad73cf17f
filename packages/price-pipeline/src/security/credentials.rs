//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the rate API key.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::InputValidationError;

/// The rate API key. Never logged or displayed.
pub struct ApiCredential(SecretBox<str>);

impl ApiCredential {
    /// Wrap a key, rejecting blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, InputValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(InputValidationError::MissingCredential);
        }
        Ok(Self(SecretBox::new(Box::from(trimmed))))
    }

    /// Expose the key for use.
    ///
    /// Only call this when building the outgoing request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiCredential {
    fn clone(&self) -> Self {
        Self(SecretBox::new(Box::from(self.expose())))
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
