// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for tunneldeck.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Provider API Constants
// ============================================================================

/// Base URL for the Cloudflare v4 REST API
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// DNS suffix for tunnel CNAME targets: `<tunnel-id>.cfargotunnel.com`
pub const TUNNEL_CNAME_SUFFIX: &str = "cfargotunnel.com";

/// Catch-all ingress service appended to every pushed ingress list.
///
/// The provider rejects ingress configurations that do not end with a
/// hostname-less catch-all rule.
pub const CATCH_ALL_SERVICE: &str = "http_status:404";

/// Sentinel TTL value meaning "automatic" in the provider API
pub const TTL_AUTO: u32 = 1;

/// Page size for paginated provider list endpoints
pub const LIST_PAGE_SIZE: u32 = 100;

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Record type string for CNAME records
pub const RECORD_TYPE_CNAME: &str = "CNAME";

/// Maximum length of a tunnel name
pub const MAX_TUNNEL_NAME_LEN: usize = 253;

/// Maximum length of a single DNS label
pub const MAX_DNS_LABEL_LEN: usize = 63;

/// Service prefixes accepted in ingress rules
pub const SERVICE_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "tcp://",
    "ssh://",
    "rdp://",
    "unix://",
    "http_status:",
];

// ============================================================================
// Server Constants
// ============================================================================

/// Default bind address for the HTTP API server
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Path for Prometheus metrics endpoint
pub const METRICS_PATH: &str = "/metrics";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
