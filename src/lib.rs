// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # tunneldeck - Cloudflare tunnel, DNS and Access management service
//!
//! tunneldeck is a backend service over the Cloudflare REST API that manages
//! DNS records, cloudflared tunnels and Access applications/policies for a
//! statically configured set of zones.
//!
//! ## Overview
//!
//! The interesting part is the ingress/DNS reconciliation routine in
//! [`tunnels`]: when a tunnel's routing rules change, the service pushes the
//! new ingress configuration and then converges DNS CNAME records across
//! every allowed zone so exactly the hostnames implied by the rules point at
//! the tunnel - creating missing records, deleting stale ones, and never
//! touching records it does not own.
//!
//! ## Modules
//!
//! - [`zones`] - static zone allow-list registry and hostname resolution
//! - [`tunnels`] - tunnel CRUD and the ingress/DNS reconciler
//! - [`dns`] - zone-gated DNS record CRUD
//! - [`access`] - Access application and policy CRUD
//! - [`provider`] - the provider RPC boundary and its reqwest implementation
//! - [`errors`] - service error taxonomy
//! - [`http_api`] - axum routing and the error envelope
//!
//! ## Example
//!
//! ```rust
//! use tunneldeck::types::IngressRuleInput;
//! use tunneldeck::zones::ZoneRegistry;
//! use tunneldeck::tunnels::build_ingress;
//!
//! let registry = ZoneRegistry::from_config_str("z1:example.com");
//! let rules = vec![IngressRuleInput {
//!     zone_id: "z1".to_string(),
//!     subdomain: "app".to_string(),
//!     service: "http://localhost:8080".to_string(),
//!     path: None,
//! }];
//!
//! let (ingress, desired) = build_ingress(&registry, &rules).unwrap();
//! assert_eq!(ingress.last().unwrap().service, "http_status:404");
//! assert_eq!(desired["app.example.com"], "z1");
//! ```

pub mod access;
pub mod config;
pub mod constants;
pub mod dns;
pub mod errors;
pub mod http_api;
pub mod metrics;
pub mod provider;
pub mod tunnels;
pub mod types;
pub mod validation;
pub mod zones;
