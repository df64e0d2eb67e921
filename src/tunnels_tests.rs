// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `tunnels.rs`
//!
//! The full reconciliation loop is exercised end-to-end against a fake
//! provider in `tests/ingress_reconciliation.rs`; these tests cover the
//! pure translation helpers.

use crate::errors::ServiceError;
use crate::tunnels::{build_ingress, parse_ingress_rules, tunnel_cname};
use crate::types::{IngressRule, IngressRuleInput, TunnelConfig};
use crate::zones::ZoneRegistry;

fn rule(zone_id: &str, subdomain: &str, service: &str) -> IngressRuleInput {
    IngressRuleInput {
        zone_id: zone_id.to_string(),
        subdomain: subdomain.to_string(),
        service: service.to_string(),
        path: None,
    }
}

#[test]
fn test_tunnel_cname() {
    assert_eq!(tunnel_cname("abc-123"), "abc-123.cfargotunnel.com");
}

#[test]
fn test_build_ingress_appends_catch_all() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let rules = vec![rule("z1", "app", "http://localhost:8080")];

    let (ingress, desired) = build_ingress(&registry, &rules).unwrap();

    assert_eq!(ingress.len(), 2);
    assert_eq!(
        ingress[0],
        IngressRule {
            hostname: Some("app.example.com".to_string()),
            service: "http://localhost:8080".to_string(),
            path: None,
        }
    );
    assert_eq!(
        ingress[1],
        IngressRule {
            hostname: None,
            service: "http_status:404".to_string(),
            path: None,
        }
    );
    assert_eq!(desired.len(), 1);
    assert_eq!(desired["app.example.com"], "z1");
}

/// An empty desired set still yields exactly the catch-all.
#[test]
fn test_build_ingress_empty_rules() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let (ingress, desired) = build_ingress(&registry, &[]).unwrap();
    assert_eq!(ingress.len(), 1);
    assert!(ingress[0].hostname.is_none());
    assert!(desired.is_empty());
}

#[test]
fn test_build_ingress_apex_and_path() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let mut apex = rule("z1", "", "https://origin:8443");
    apex.path = Some("/app".to_string());

    let (ingress, desired) = build_ingress(&registry, &[apex]).unwrap();
    assert_eq!(ingress[0].hostname.as_deref(), Some("example.com"));
    assert_eq!(ingress[0].path.as_deref(), Some("/app"));
    assert_eq!(desired["example.com"], "z1");
}

#[test]
fn test_build_ingress_preserves_input_order() {
    let registry = ZoneRegistry::from_config_str("z1:example.com,z2:example.org");
    let rules = vec![
        rule("z2", "b", "http://b:1"),
        rule("z1", "a", "http://a:1"),
        rule("z2", "c", "http://c:1"),
    ];

    let (ingress, _) = build_ingress(&registry, &rules).unwrap();
    let hostnames: Vec<_> = ingress
        .iter()
        .filter_map(|r| r.hostname.as_deref())
        .collect();
    assert_eq!(
        hostnames,
        vec!["b.example.org", "a.example.com", "c.example.org"]
    );
}

/// A single disallowed zone fails the whole translation; nothing partial
/// escapes.
#[test]
fn test_build_ingress_rejects_disallowed_zone() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let rules = vec![
        rule("z1", "app", "http://localhost:8080"),
        rule("z9", "evil", "http://localhost:9999"),
    ];

    let err = build_ingress(&registry, &rules).unwrap_err();
    match err {
        ServiceError::ZoneNotAllowed { zone_id } => assert_eq!(zone_id, "z9"),
        other => panic!("expected ZoneNotAllowed, got {other:?}"),
    }
}

#[test]
fn test_parse_ingress_rules_round_trip() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let config = TunnelConfig {
        ingress: vec![
            IngressRule {
                hostname: Some("app.example.com".to_string()),
                service: "http://localhost:8080".to_string(),
                path: Some("/api".to_string()),
            },
            IngressRule {
                hostname: None,
                service: "http_status:404".to_string(),
                path: None,
            },
        ],
    };

    let parsed = parse_ingress_rules(&registry, &config);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].zone_id, "z1");
    assert_eq!(parsed[0].zone_name, "example.com");
    assert_eq!(parsed[0].subdomain, "app");
    assert_eq!(parsed[0].hostname, "app.example.com");
    assert_eq!(parsed[0].path.as_deref(), Some("/api"));
}

/// Rules pointing at zones outside the allow-list are dropped from the
/// parsed view rather than surfaced as errors.
#[test]
fn test_parse_ingress_rules_drops_disallowed_hostnames() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let config = TunnelConfig {
        ingress: vec![
            IngressRule {
                hostname: Some("app.other.com".to_string()),
                service: "http://x:1".to_string(),
                path: None,
            },
            IngressRule {
                hostname: Some("ok.example.com".to_string()),
                service: "http://y:1".to_string(),
                path: None,
            },
        ],
    };

    let parsed = parse_ingress_rules(&registry, &config);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].hostname, "ok.example.com");
}

#[test]
fn test_parse_ingress_rules_apex() {
    let registry = ZoneRegistry::from_config_str("z1:example.com");
    let config = TunnelConfig {
        ingress: vec![IngressRule {
            hostname: Some("example.com".to_string()),
            service: "http://x:1".to_string(),
            path: None,
        }],
    };

    let parsed = parse_ingress_rules(&registry, &config);
    assert_eq!(parsed[0].subdomain, "");
}
