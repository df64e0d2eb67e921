// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Process configuration.
//!
//! All configuration is read from the environment exactly once at startup
//! and carried in an explicit [`Settings`] value; nothing else in the
//! codebase touches environment variables. The settings value is
//! constructed in `main`, used to build the registry and provider client,
//! and read-only thereafter.

use crate::constants::{DEFAULT_API_BASE, DEFAULT_LISTEN_ADDR};
use anyhow::{Context, Result};

/// Environment variable holding the provider API token
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Environment variable holding the provider account id
pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";

/// Environment variable holding the zone allow-list (`id:name,...`)
pub const ENV_ZONES: &str = "CLOUDFLARE_ZONES";

/// Environment variable overriding the provider API base URL
pub const ENV_API_BASE: &str = "CLOUDFLARE_API_BASE";

/// Environment variable overriding the HTTP listen address
pub const ENV_LISTEN_ADDR: &str = "TUNNELDECK_LISTEN_ADDR";

/// Immutable process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API token used for all provider calls
    pub api_token: String,
    /// Account id scoping tunnel and Access operations
    pub account_id: String,
    /// Raw zone allow-list string, parsed by the zone registry
    pub zones: String,
    /// Provider API base URL
    pub api_base: String,
    /// Bind address for the HTTP API server
    pub listen_addr: String,
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable (`CLOUDFLARE_API_TOKEN`,
    /// `CLOUDFLARE_ACCOUNT_ID`) is missing. An absent zone list yields an
    /// empty allow-list, which denies every zone-scoped request.
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var(ENV_API_TOKEN)
            .with_context(|| format!("{ENV_API_TOKEN} must be set"))?;
        let account_id = std::env::var(ENV_ACCOUNT_ID)
            .with_context(|| format!("{ENV_ACCOUNT_ID} must be set"))?;
        let zones = std::env::var(ENV_ZONES).unwrap_or_default();

        if zones.is_empty() {
            tracing::warn!(
                "{} is empty; every zone-scoped request will be denied",
                ENV_ZONES
            );
        }

        Ok(Self {
            api_token,
            account_id,
            zones,
            api_base: std::env::var(ENV_API_BASE).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            listen_addr: std::env::var(ENV_LISTEN_ADDR)
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
