// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider boundary.
//!
//! Everything this service knows about the remote provider is expressed by
//! the [`Provider`] trait: list/get/create/update/delete operations per
//! resource, nothing more. The reconciler and CRUD services depend only on
//! this trait, so in-memory fakes are sufficient to exercise every
//! reconciliation property without a live API.
//!
//! The production implementation lives in [`http`] and speaks the
//! Cloudflare v4 REST API.

pub mod http;

pub use http::CloudflareClient;

use crate::types::{
    AccessAppInput, AccessApplication, AccessPolicy, AccessPolicyInput, DnsRecord, DnsRecordInput,
    Tunnel, TunnelConfig,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors produced at the provider boundary.
///
/// These are transport-level and API-level failures, before upgrade into
/// the service taxonomy ([`crate::errors::ServiceError`]).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider does not know the requested entity. Carries the
    /// resource noun for error messages.
    #[error("{0} not found")]
    NotFound(String),

    /// HTTP 429 or a rate-limit message from the provider
    #[error("rate limited by provider API")]
    RateLimited,

    /// HTTP 401/403 or an authentication-error code from the provider
    #[error("provider rejected credentials: {0}")]
    Unauthorized(String),

    /// Any other structured API error
    #[error("provider API error {code}: {message}")]
    Api {
        /// Provider error code
        code: i64,
        /// Provider error message
        message: String,
    },

    /// Connection, TLS or deserialization failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Remote provider operations, one method per REST call.
#[async_trait]
pub trait Provider: Send + Sync {
    // ------------------------------------------------------------------
    // DNS records (zone-scoped)
    // ------------------------------------------------------------------

    /// List every DNS record in a zone, draining pagination.
    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError>;

    /// Fetch a single DNS record by id.
    async fn get_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> Result<DnsRecord, ProviderError>;

    /// Create a DNS record.
    async fn create_dns_record(
        &self,
        zone_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ProviderError>;

    /// Overwrite a DNS record by id.
    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ProviderError>;

    /// Delete a DNS record by id.
    async fn delete_dns_record(&self, zone_id: &str, record_id: &str)
        -> Result<(), ProviderError>;

    // ------------------------------------------------------------------
    // Tunnels (account-scoped)
    // ------------------------------------------------------------------

    /// List non-deleted tunnels in the account, draining pagination.
    async fn list_tunnels(&self) -> Result<Vec<Tunnel>, ProviderError>;

    /// Fetch a single tunnel by id.
    async fn get_tunnel(&self, tunnel_id: &str) -> Result<Tunnel, ProviderError>;

    /// Create a remote-configured tunnel with the given name and
    /// base64-encoded secret.
    async fn create_tunnel(&self, name: &str, secret_b64: &str) -> Result<Tunnel, ProviderError>;

    /// Delete a tunnel by id.
    async fn delete_tunnel(&self, tunnel_id: &str) -> Result<(), ProviderError>;

    /// Fetch the cloudflared run token for a tunnel.
    async fn tunnel_token(&self, tunnel_id: &str) -> Result<String, ProviderError>;

    /// Fetch a tunnel's remote configuration.
    ///
    /// Returns `Ok(None)` when the tunnel exists but has no configuration
    /// yet; `NotFound` only when the tunnel itself is unknown.
    async fn get_tunnel_config(
        &self,
        tunnel_id: &str,
    ) -> Result<Option<TunnelConfig>, ProviderError>;

    /// Replace a tunnel's remote configuration.
    async fn update_tunnel_config(
        &self,
        tunnel_id: &str,
        config: &TunnelConfig,
    ) -> Result<(), ProviderError>;

    // ------------------------------------------------------------------
    // Access applications and reusable policies (account-scoped)
    // ------------------------------------------------------------------

    /// List Access applications, draining pagination.
    async fn list_access_apps(&self) -> Result<Vec<AccessApplication>, ProviderError>;

    /// Fetch a single Access application by id.
    async fn get_access_app(&self, app_id: &str) -> Result<AccessApplication, ProviderError>;

    /// Create an Access application.
    async fn create_access_app(
        &self,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ProviderError>;

    /// Update an Access application by id.
    async fn update_access_app(
        &self,
        app_id: &str,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ProviderError>;

    /// Delete an Access application by id.
    async fn delete_access_app(&self, app_id: &str) -> Result<(), ProviderError>;

    /// List reusable Access policies, draining pagination.
    async fn list_access_policies(&self) -> Result<Vec<AccessPolicy>, ProviderError>;

    /// Fetch a single reusable policy by id.
    async fn get_access_policy(&self, policy_id: &str) -> Result<AccessPolicy, ProviderError>;

    /// Create a reusable policy.
    async fn create_access_policy(
        &self,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ProviderError>;

    /// Update a reusable policy by id.
    async fn update_access_policy(
        &self,
        policy_id: &str,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ProviderError>;

    /// Delete a reusable policy by id.
    async fn delete_access_policy(&self, policy_id: &str) -> Result<(), ProviderError>;
}
