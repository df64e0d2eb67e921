// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tunnel management and the ingress/DNS reconciliation core.
//!
//! [`TunnelService::update_ingress`] is the one operation here that is more
//! than provider glue. Given a desired rule set in zone + subdomain form it:
//!
//! 1. validates input and resolves every zone against the allow-list
//!    (failing before any provider call),
//! 2. builds the hostname-based ingress list, appending the mandatory
//!    catch-all,
//! 3. pushes the configuration to the tunnel, and
//! 4. converges DNS CNAMEs across *all* allowed zones so exactly the
//!    desired hostnames point at the tunnel.
//!
//! The DNS pass only ever creates or deletes records whose content is this
//! tunnel's own CNAME target; a record with a colliding name but foreign
//! content is skipped with a warning, never overwritten. A repeat run with
//! the same desired state issues zero create/delete calls.
//!
//! Convergence is best-effort, not transactional: a failure in one zone
//! aborts the run and surfaces the error, but changes already applied to
//! earlier zones stay applied.

use crate::constants::{CATCH_ALL_SERVICE, RECORD_TYPE_CNAME, TTL_AUTO, TUNNEL_CNAME_SUFFIX};
use crate::errors::ServiceError;
use crate::metrics;
use crate::provider::{Provider, ProviderError};
use crate::types::{
    DnsRecordInput, IngressRule, IngressRuleInput, ParsedIngressRule, Tunnel, TunnelConfig,
};
use crate::validation::{validate_ingress_rules, validate_tunnel_name};
use crate::zones::ZoneRegistry;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Tunnel CRUD plus the ingress/DNS reconciler.
#[derive(Clone)]
pub struct TunnelService {
    registry: Arc<ZoneRegistry>,
    provider: Arc<dyn Provider>,
}

/// The CNAME content that marks a DNS record as owned by a tunnel.
#[must_use]
pub fn tunnel_cname(tunnel_id: &str) -> String {
    format!("{tunnel_id}.{TUNNEL_CNAME_SUFFIX}")
}

/// Translate desired rules into the provider ingress list and the
/// hostname-to-zone map driving DNS reconciliation.
///
/// The ingress list preserves input order and always ends with exactly one
/// catch-all entry; caller input is never trusted to include it. The
/// returned map excludes the catch-all (it has no hostname).
///
/// # Errors
///
/// `ZoneNotAllowed` as soon as any rule references a zone outside the
/// registry. No partial output escapes on failure.
pub fn build_ingress(
    registry: &ZoneRegistry,
    rules: &[IngressRuleInput],
) -> Result<(Vec<IngressRule>, HashMap<String, String>), ServiceError> {
    let mut ingress = Vec::with_capacity(rules.len() + 1);
    let mut desired = HashMap::with_capacity(rules.len());

    for rule in rules {
        let zone = registry
            .get(&rule.zone_id)
            .ok_or_else(|| ServiceError::ZoneNotAllowed {
                zone_id: rule.zone_id.clone(),
            })?;
        let hostname = if rule.subdomain.is_empty() {
            zone.name.clone()
        } else {
            format!("{}.{}", rule.subdomain, zone.name)
        };
        ingress.push(IngressRule {
            hostname: Some(hostname.clone()),
            service: rule.service.clone(),
            path: rule.path.clone(),
        });
        desired.insert(hostname, zone.id.clone());
    }

    ingress.push(IngressRule {
        hostname: None,
        service: CATCH_ALL_SERVICE.to_string(),
        path: None,
    });

    Ok((ingress, desired))
}

/// Resolve provider-level ingress back to zone + subdomain form for display.
///
/// The catch-all entry and any rule whose hostname does not resolve to an
/// allowed zone are dropped.
#[must_use]
pub fn parse_ingress_rules(registry: &ZoneRegistry, config: &TunnelConfig) -> Vec<ParsedIngressRule> {
    let mut parsed = Vec::new();

    for rule in &config.ingress {
        let Some(hostname) = rule.hostname.as_deref() else {
            continue;
        };
        let Some(matched) = registry.parse_hostname(hostname) else {
            continue;
        };
        let Some(zone) = registry.get(&matched.zone_id) else {
            continue;
        };
        parsed.push(ParsedIngressRule {
            zone_id: matched.zone_id.clone(),
            zone_name: zone.name.clone(),
            subdomain: matched.subdomain,
            service: rule.service.clone(),
            path: rule.path.clone(),
            hostname: hostname.to_string(),
        });
    }

    parsed
}

impl TunnelService {
    /// Build a service over the given registry and provider.
    #[must_use]
    pub fn new(registry: Arc<ZoneRegistry>, provider: Arc<dyn Provider>) -> Self {
        Self { registry, provider }
    }

    /// List tunnels visible to this deployment.
    ///
    /// A tunnel is hidden when any hostname in its ingress configuration
    /// falls outside the zone allow-list. Tunnels with no configuration,
    /// an empty ingress list, or a configuration we fail to retrieve are
    /// included: visibility fails open, mutation never does.
    pub async fn list(&self) -> Result<Vec<Tunnel>, ServiceError> {
        let tunnels = self.provider.list_tunnels().await?;
        let mut visible = Vec::with_capacity(tunnels.len());

        for tunnel in tunnels {
            match self.provider.get_tunnel_config(&tunnel.id).await {
                Ok(Some(config)) => {
                    let disallowed = config.ingress.iter().any(|rule| {
                        rule.hostname
                            .as_deref()
                            .is_some_and(|h| self.registry.parse_hostname(h).is_none())
                    });
                    if disallowed {
                        debug!(
                            tunnel = %tunnel.id,
                            "Hiding tunnel with ingress outside the zone allow-list"
                        );
                    } else {
                        visible.push(tunnel);
                    }
                }
                Ok(None) => visible.push(tunnel),
                Err(e) => {
                    debug!(
                        tunnel = %tunnel.id,
                        error = %e,
                        "Could not fetch tunnel config; including tunnel anyway"
                    );
                    visible.push(tunnel);
                }
            }
        }

        Ok(visible)
    }

    /// Fetch a single tunnel by id.
    pub async fn get(&self, tunnel_id: &str) -> Result<Tunnel, ServiceError> {
        Ok(self.provider.get_tunnel(tunnel_id).await?)
    }

    /// Create a remote-configured tunnel with a generated 32-byte secret.
    pub async fn create(&self, name: &str) -> Result<Tunnel, ServiceError> {
        validate_tunnel_name(name)?;

        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        let secret_b64 = BASE64_STANDARD.encode(secret);

        let tunnel = self.provider.create_tunnel(name, &secret_b64).await?;
        info!(tunnel = %tunnel.id, name, "Created tunnel");
        Ok(tunnel)
    }

    /// Delete a tunnel by id.
    pub async fn delete(&self, tunnel_id: &str) -> Result<(), ServiceError> {
        self.provider.delete_tunnel(tunnel_id).await?;
        info!(tunnel = tunnel_id, "Deleted tunnel");
        Ok(())
    }

    /// Fetch the cloudflared run token for a tunnel.
    pub async fn token(&self, tunnel_id: &str) -> Result<String, ServiceError> {
        Ok(self.provider.tunnel_token(tunnel_id).await?)
    }

    /// Fetch a tunnel's raw configuration; absent config is an empty one.
    pub async fn get_config(&self, tunnel_id: &str) -> Result<TunnelConfig, ServiceError> {
        Ok(self
            .provider
            .get_tunnel_config(tunnel_id)
            .await?
            .unwrap_or_default())
    }

    /// Resolve a tunnel's provider-level ingress back to zone + subdomain
    /// form for display.
    #[must_use]
    pub fn parse_ingress_rules(&self, config: &TunnelConfig) -> Vec<ParsedIngressRule> {
        parse_ingress_rules(&self.registry, config)
    }

    /// Push a new desired ingress rule set and converge DNS to match.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] for malformed input, before any
    ///   provider call;
    /// - [`ServiceError::ZoneNotAllowed`] if any rule references a zone
    ///   outside the allow-list, before any provider call;
    /// - [`ServiceError::ResourceNotFound`] if the tunnel is unknown; the
    ///   DNS pass is then skipped entirely;
    /// - any provider error from the DNS pass, in which case changes
    ///   already applied to earlier zones remain in place.
    pub async fn update_ingress(
        &self,
        tunnel_id: &str,
        rules: &[IngressRuleInput],
    ) -> Result<(), ServiceError> {
        let started = Instant::now();
        let result = self.update_ingress_inner(tunnel_id, rules).await;

        match &result {
            Ok(()) => metrics::record_reconciliation_success(started.elapsed()),
            Err(_) => metrics::record_reconciliation_error(started.elapsed()),
        }
        result
    }

    async fn update_ingress_inner(
        &self,
        tunnel_id: &str,
        rules: &[IngressRuleInput],
    ) -> Result<(), ServiceError> {
        validate_ingress_rules(rules)?;
        let (ingress, desired) = build_ingress(&self.registry, rules)?;

        info!(
            tunnel = tunnel_id,
            rules = rules.len(),
            "Pushing ingress configuration"
        );
        self.provider
            .update_tunnel_config(tunnel_id, &TunnelConfig { ingress })
            .await
            .map_err(|e| match e {
                ProviderError::NotFound(_) => ServiceError::not_found("tunnel"),
                other => other.into(),
            })?;

        self.sync_dns(tunnel_id, &desired).await
    }

    /// Converge DNS CNAMEs across every allowed zone.
    ///
    /// The full allow-list is walked, not just the zones the desired rules
    /// reference: a previous desired state may have left records in a zone
    /// no longer mentioned. Zones are processed sequentially, deletions
    /// before creations within each zone.
    async fn sync_dns(
        &self,
        tunnel_id: &str,
        desired: &HashMap<String, String>,
    ) -> Result<(), ServiceError> {
        let cname_target = tunnel_cname(tunnel_id);

        for zone in self.registry.list_allowed() {
            let records = self.provider.list_dns_records(&zone.id).await?;

            let owned: Vec<_> = records
                .iter()
                .filter(|r| r.record_type == RECORD_TYPE_CNAME && r.content == cname_target)
                .collect();

            // Deletion pass: owned CNAMEs whose hostname left the desired set
            for record in &owned {
                if !desired.contains_key(&record.name) {
                    self.provider.delete_dns_record(&zone.id, &record.id).await?;
                    metrics::record_dns_deleted();
                    info!(
                        tunnel = tunnel_id,
                        zone = %zone.name,
                        hostname = %record.name,
                        "Deleted stale tunnel CNAME"
                    );
                }
            }

            // Creation pass: desired hostnames mapped to this zone
            for (hostname, zone_id) in desired {
                if *zone_id != zone.id {
                    continue;
                }
                if owned.iter().any(|r| &r.name == hostname) {
                    debug!(
                        tunnel = tunnel_id,
                        zone = %zone.name,
                        hostname = %hostname,
                        "Tunnel CNAME already present"
                    );
                    continue;
                }
                if records.iter().any(|r| &r.name == hostname) {
                    // Never overwrite a record this tunnel does not own,
                    // even though the hostname stays unrouted by DNS.
                    metrics::record_dns_skipped();
                    warn!(
                        tunnel = tunnel_id,
                        zone = %zone.name,
                        hostname = %hostname,
                        "A different record already exists for this hostname; skipping CNAME creation"
                    );
                    continue;
                }

                self.provider
                    .create_dns_record(
                        &zone.id,
                        &DnsRecordInput {
                            record_type: RECORD_TYPE_CNAME.to_string(),
                            name: hostname.clone(),
                            content: cname_target.clone(),
                            ttl: Some(TTL_AUTO),
                            proxied: Some(true),
                            priority: None,
                        },
                    )
                    .await?;
                metrics::record_dns_created();
                info!(
                    tunnel = tunnel_id,
                    zone = %zone.name,
                    hostname = %hostname,
                    "Created tunnel CNAME"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tunnels_tests.rs"]
mod tunnels_tests;
