// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the Cloudflare provider API.
//!
//! These are deliberately simplified from the provider SDK's union types:
//! only the fields this service reads or writes are modelled. Everything
//! here derives `Serialize`/`Deserialize` so the same types serve the
//! provider client and the HTTP API surface.

use serde::{Deserialize, Serialize};

// ============================================================================
// Zones
// ============================================================================

/// A provider zone this deployment is permitted to operate on.
///
/// Derived once from static configuration at process start; never mutated
/// at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedZone {
    /// Provider zone identifier
    pub id: String,
    /// Zone apex name, e.g. `example.com`
    pub name: String,
}

// ============================================================================
// DNS Records
// ============================================================================

/// A DNS record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for creating or updating a DNS record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecordInput {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// Required by the provider for MX and SRV records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

// ============================================================================
// Tunnels
// ============================================================================

/// An active cloudflared connection reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunnelConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colo_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_ip: Option<String>,
}

/// A cloudflared tunnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tunnel {
    pub id: String,
    pub name: String,
    /// `inactive`, `degraded`, `healthy` or `down`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<TunnelConnection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_config: Option<bool>,
}

/// An ingress rule in the provider's hostname-based format.
///
/// `hostname` is absent only on the mandatory catch-all entry, which must
/// be the last element of the ingress list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Tunnel configuration as stored by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelConfig {
    #[serde(default)]
    pub ingress: Vec<IngressRule>,
}

/// An ingress rule as submitted by callers: zone + subdomain instead of a
/// raw hostname, so the allow-list can be enforced before translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRuleInput {
    pub zone_id: String,
    /// Empty string addresses the zone apex
    pub subdomain: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Provider-level ingress rule resolved back to zone + subdomain for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngressRule {
    pub zone_id: String,
    pub zone_name: String,
    pub subdomain: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Full hostname, kept for display alongside the split form
    pub hostname: String,
}

// ============================================================================
// Access Applications and Policies
// ============================================================================

/// Reference to a reusable policy attached to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyReference {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precedence: Option<u32>,
}

/// An Access application.
///
/// Rule payloads (`include`/`exclude`/`require`) are kept as raw JSON: the
/// provider's rule grammar is large and this service only round-trips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessApplication {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(rename = "type")]
    pub app_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_launcher_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_idps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<PolicyReference>>,
}

/// Input for creating or updating an Access application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessAppInput {
    pub name: String,
    pub domain: String,
    #[serde(rename = "type")]
    pub app_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_launcher_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_idps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<PolicyReference>>,
}

/// A reusable (account-level) Access policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub precedence: u32,
    /// `allow`, `deny`, `non_identity` or `bypass`
    pub decision: String,
    #[serde(default)]
    pub include: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_count: Option<u32>,
}

/// Input for creating or updating a reusable Access policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicyInput {
    pub name: String,
    pub precedence: u32,
    pub decision: String,
    pub include: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_required: Option<bool>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
