// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone allow-list registry.
//!
//! The registry is the single source of truth for which provider zones this
//! deployment may touch. It is built once at startup from the configured
//! `id:name` pair list and is read-only thereafter.
//!
//! All operations are pure lookups: absence is expressed as `None`, never
//! as an error.

use crate::types::AllowedZone;

/// Result of resolving a fully-qualified hostname against the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHostname {
    /// Id of the matched zone
    pub zone_id: String,
    /// Prefix before the zone apex; empty for the apex itself
    pub subdomain: String,
}

/// Statically configured set of zones this deployment may operate on.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<AllowedZone>,
}

impl ZoneRegistry {
    /// Build a registry from an explicit zone list.
    #[must_use]
    pub fn new(zones: Vec<AllowedZone>) -> Self {
        Self { zones }
    }

    /// Parse a registry from the configured allow-list string.
    ///
    /// Format: comma-separated `zone_id:zone_name` pairs, e.g.
    /// `abc123:example.com,def456:example.org`. Malformed entries (missing
    /// id or name) are dropped with a warning rather than treated as fatal.
    /// Duplicates are kept verbatim; insertion order is preserved.
    #[must_use]
    pub fn from_config_str(raw: &str) -> Self {
        let mut zones = Vec::new();

        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once(':') {
                Some((id, name)) if !id.is_empty() && !name.is_empty() => {
                    zones.push(AllowedZone {
                        id: id.to_string(),
                        name: name.to_string(),
                    });
                }
                _ => {
                    tracing::warn!(entry, "Dropping malformed zone allow-list entry");
                }
            }
        }

        Self { zones }
    }

    /// All allowed zones, in configured order.
    #[must_use]
    pub fn list_allowed(&self) -> &[AllowedZone] {
        &self.zones
    }

    /// Whether the given zone id is in the allow-list.
    #[must_use]
    pub fn is_allowed(&self, zone_id: &str) -> bool {
        self.zones.iter().any(|zone| zone.id == zone_id)
    }

    /// Resolve a zone id to its allow-list entry.
    #[must_use]
    pub fn get(&self, zone_id: &str) -> Option<&AllowedZone> {
        self.zones.iter().find(|zone| zone.id == zone_id)
    }

    /// Resolve a fully-qualified hostname to an allowed zone and subdomain.
    ///
    /// Zones are tried in configured order; the first exact-apex or
    /// `.{name}` suffix match wins. When two allowed zones have a suffix
    /// relationship (say `example.com` and `api.example.com` are both
    /// configured), the outcome therefore depends on list order. That
    /// ordering is part of the contract and covered by an explicit test.
    ///
    /// Returns `None` if the hostname belongs to no allowed zone.
    #[must_use]
    pub fn parse_hostname(&self, hostname: &str) -> Option<ParsedHostname> {
        for zone in &self.zones {
            if hostname == zone.name {
                return Some(ParsedHostname {
                    zone_id: zone.id.clone(),
                    subdomain: String::new(),
                });
            }
            if let Some(prefix) = hostname.strip_suffix(&format!(".{}", zone.name)) {
                return Some(ParsedHostname {
                    zone_id: zone.id.clone(),
                    subdomain: prefix.to_string(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;
