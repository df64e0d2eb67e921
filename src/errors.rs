// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Service error taxonomy.
//!
//! Every fallible operation exposed by this service resolves to one of the
//! variants below. The taxonomy mirrors what callers can act on:
//! allow-list violations, missing resources, bad input, provider
//! backpressure, credential problems, and an explicit catch-all.
//!
//! Provider failures arrive as [`crate::provider::ProviderError`] and are
//! upgraded into this taxonomy via the `From` impl; anything the
//! classification does not recognize passes through as [`ServiceError::Unknown`].

use crate::provider::ProviderError;
use thiserror::Error;

/// Errors surfaced by the DNS, tunnel and Access services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request references a zone outside the configured allow-list.
    ///
    /// User-correctable; surfaced as HTTP 403. Raised before any provider
    /// call is made.
    #[error("zone '{zone_id}' is not in the configured allow-list")]
    ZoneNotAllowed {
        /// The offending zone id
        zone_id: String,
    },

    /// The provider does not know the requested entity.
    #[error("{resource} not found")]
    ResourceNotFound {
        /// Human-readable resource noun, e.g. "tunnel" or "DNS record"
        resource: String,
    },

    /// Malformed input, caught before any network call.
    #[error("validation failed: {reason}")]
    Validation {
        /// Explanation of what is invalid
        reason: String,
    },

    /// The provider signalled backpressure. Retryable by the caller; this
    /// service performs no automatic retry.
    #[error("rate limited by provider API")]
    RateLimited,

    /// The provider rejected our credentials or token scope.
    #[error("provider authorization failed: {message}")]
    Unauthorized {
        /// Provider-supplied detail
        message: String,
    },

    /// Anything that does not fit the taxonomy.
    #[error("{0}")]
    Unknown(String),
}

impl ServiceError {
    /// Stable machine-readable code for API responses and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZoneNotAllowed { .. } => "ZONE_NOT_ALLOWED",
            Self::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::RateLimited => "RATE_LIMITED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// HTTP status equivalent of this error.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ZoneNotAllowed { .. } => 403,
            Self::ResourceNotFound { .. } => 404,
            Self::Validation { .. } => 400,
            Self::RateLimited => 429,
            Self::Unauthorized { .. } => 401,
            Self::Unknown(_) => 500,
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    ///
    /// Only backpressure qualifies; everything else needs a changed request
    /// or changed configuration first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Shorthand for a [`ServiceError::ResourceNotFound`] with the given noun.
    #[must_use]
    pub fn not_found(resource: &str) -> Self {
        Self::ResourceNotFound {
            resource: resource.to_string(),
        }
    }

    /// Shorthand for a [`ServiceError::Validation`] with the given reason.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(resource) => Self::ResourceNotFound { resource },
            ProviderError::RateLimited => Self::RateLimited,
            ProviderError::Unauthorized(message) => Self::Unauthorized { message },
            ProviderError::Api { code, message } => {
                classify_api_error(code, &message).unwrap_or(Self::Unknown(message))
            }
            ProviderError::Transport(message) => Self::Unknown(message),
        }
    }
}

/// Upgrade a generic provider API error into the taxonomy by matching on
/// its error code and message content.
///
/// The provider reports many conditions only through free-form messages, so
/// this is deliberately pattern matching on text. Error code 10000 is the
/// provider's "authentication error".
fn classify_api_error(code: i64, message: &str) -> Option<ServiceError> {
    let lowered = message.to_lowercase();

    if code == 10000 || lowered.contains("authentication error") {
        return Some(ServiceError::Unauthorized {
            message: message.to_string(),
        });
    }
    if lowered.contains("rate limit") {
        return Some(ServiceError::RateLimited);
    }
    if lowered.contains("not found") || lowered.contains("could not find") {
        return Some(ServiceError::ResourceNotFound {
            resource: "resource".to_string(),
        });
    }

    None
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
