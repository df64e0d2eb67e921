// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared test fixtures.
//!
//! [`FakeProvider`] is an in-memory [`Provider`] with per-zone record
//! stores and call counters, so the reconciliation suites can assert not
//! just the final DNS state but how many mutations it took to get there.

// Not every suite uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tunneldeck::provider::{Provider, ProviderError};
use tunneldeck::types::{
    AccessAppInput, AccessApplication, AccessPolicy, AccessPolicyInput, DnsRecord, DnsRecordInput,
    Tunnel, TunnelConfig,
};

/// Mutation/read counters, snapshotted via [`FakeProvider::calls`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_dns: usize,
    pub create_dns: usize,
    pub delete_dns: usize,
    pub update_config: usize,
}

#[derive(Default)]
struct State {
    records: HashMap<String, Vec<DnsRecord>>,
    tunnels: HashMap<String, Tunnel>,
    configs: HashMap<String, TunnelConfig>,
    apps: HashMap<String, AccessApplication>,
    policies: HashMap<String, AccessPolicy>,
    fail_list_zones: HashSet<String>,
    next_id: u64,
    calls: CallCounts,
}

impl State {
    fn mint_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// In-memory provider double.
#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<State>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tunnel (with an empty config) so ingress pushes find it.
    pub fn seed_tunnel(&self, tunnel_id: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.tunnels.insert(
            tunnel_id.to_string(),
            Tunnel {
                id: tunnel_id.to_string(),
                name: name.to_string(),
                status: Some("healthy".to_string()),
                created_at: None,
                deleted_at: None,
                connections: None,
                remote_config: Some(true),
            },
        );
        state
            .configs
            .insert(tunnel_id.to_string(), TunnelConfig::default());
    }

    /// Seed a pre-existing DNS record in a zone.
    pub fn seed_record(&self, zone_id: &str, record_type: &str, name: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.mint_id("rec");
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(DnsRecord {
                id,
                record_type: record_type.to_string(),
                name: name.to_string(),
                content: content.to_string(),
                ttl: Some(1),
                proxied: Some(false),
                priority: None,
                created_on: None,
                modified_on: None,
            });
    }

    /// Make `list_dns_records` fail for the given zone with a transport
    /// error, for partial-failure scenarios.
    pub fn fail_listing_zone(&self, zone_id: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_list_zones
            .insert(zone_id.to_string());
    }

    /// Snapshot of the current DNS records in a zone.
    pub fn records_in(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of the stored config for a tunnel.
    pub fn config_of(&self, tunnel_id: &str) -> Option<TunnelConfig> {
        self.state.lock().unwrap().configs.get(tunnel_id).cloned()
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls
    }

    /// Zero the call counters, keeping the stored state.
    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls = CallCounts::default();
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.list_dns += 1;
        if state.fail_list_zones.contains(zone_id) {
            return Err(ProviderError::Transport("connection reset".to_string()));
        }
        Ok(state.records.get(zone_id).cloned().unwrap_or_default())
    }

    async fn get_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> Result<DnsRecord, ProviderError> {
        let state = self.state.lock().unwrap();
        state
            .records
            .get(zone_id)
            .and_then(|records| records.iter().find(|r| r.id == record_id))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound("DNS record".to_string()))
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_dns += 1;
        let id = state.mint_id("rec");
        let record = DnsRecord {
            id,
            record_type: input.record_type.clone(),
            name: input.name.clone(),
            content: input.content.clone(),
            ttl: input.ttl,
            proxied: input.proxied,
            priority: input.priority,
            created_on: None,
            modified_on: None,
        };
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let record = state
            .records
            .get_mut(zone_id)
            .and_then(|records| records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| ProviderError::NotFound("DNS record".to_string()))?;
        record.record_type = input.record_type.clone();
        record.name = input.name.clone();
        record.content = input.content.clone();
        record.ttl = input.ttl;
        record.proxied = input.proxied;
        record.priority = input.priority;
        Ok(record.clone())
    }

    async fn delete_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.delete_dns += 1;
        let records = state
            .records
            .get_mut(zone_id)
            .ok_or_else(|| ProviderError::NotFound("DNS record".to_string()))?;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(ProviderError::NotFound("DNS record".to_string()));
        }
        Ok(())
    }

    async fn list_tunnels(&self) -> Result<Vec<Tunnel>, ProviderError> {
        let state = self.state.lock().unwrap();
        let mut tunnels: Vec<_> = state.tunnels.values().cloned().collect();
        tunnels.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tunnels)
    }

    async fn get_tunnel(&self, tunnel_id: &str) -> Result<Tunnel, ProviderError> {
        self.state
            .lock()
            .unwrap()
            .tunnels
            .get(tunnel_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound("tunnel".to_string()))
    }

    async fn create_tunnel(&self, name: &str, _secret_b64: &str) -> Result<Tunnel, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let id = state.mint_id("tun");
        let tunnel = Tunnel {
            id: id.clone(),
            name: name.to_string(),
            status: Some("inactive".to_string()),
            created_at: None,
            deleted_at: None,
            connections: None,
            remote_config: Some(true),
        };
        state.tunnels.insert(id.clone(), tunnel.clone());
        state.configs.insert(id, TunnelConfig::default());
        Ok(tunnel)
    }

    async fn delete_tunnel(&self, tunnel_id: &str) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state
            .tunnels
            .remove(tunnel_id)
            .ok_or_else(|| ProviderError::NotFound("tunnel".to_string()))?;
        state.configs.remove(tunnel_id);
        Ok(())
    }

    async fn tunnel_token(&self, tunnel_id: &str) -> Result<String, ProviderError> {
        let state = self.state.lock().unwrap();
        if !state.tunnels.contains_key(tunnel_id) {
            return Err(ProviderError::NotFound("tunnel".to_string()));
        }
        Ok(format!("token-{tunnel_id}"))
    }

    async fn get_tunnel_config(
        &self,
        tunnel_id: &str,
    ) -> Result<Option<TunnelConfig>, ProviderError> {
        let state = self.state.lock().unwrap();
        if !state.tunnels.contains_key(tunnel_id) {
            return Err(ProviderError::NotFound("tunnel".to_string()));
        }
        Ok(state.configs.get(tunnel_id).cloned())
    }

    async fn update_tunnel_config(
        &self,
        tunnel_id: &str,
        config: &TunnelConfig,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.update_config += 1;
        if !state.tunnels.contains_key(tunnel_id) {
            return Err(ProviderError::NotFound("tunnel".to_string()));
        }
        state.configs.insert(tunnel_id.to_string(), config.clone());
        Ok(())
    }

    async fn list_access_apps(&self) -> Result<Vec<AccessApplication>, ProviderError> {
        let state = self.state.lock().unwrap();
        let mut apps: Vec<_> = state.apps.values().cloned().collect();
        apps.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(apps)
    }

    async fn get_access_app(&self, app_id: &str) -> Result<AccessApplication, ProviderError> {
        self.state
            .lock()
            .unwrap()
            .apps
            .get(app_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound("Access application".to_string()))
    }

    async fn create_access_app(
        &self,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let id = state.mint_id("app");
        let app = AccessApplication {
            id: id.clone(),
            name: input.name.clone(),
            domain: input.domain.clone(),
            app_type: input.app_type.clone(),
            session_duration: input.session_duration.clone(),
            app_launcher_visible: input.app_launcher_visible,
            allowed_idps: input.allowed_idps.clone(),
            aud: None,
            created_at: None,
            updated_at: None,
            policies: input.policies.clone(),
        };
        state.apps.insert(id, app.clone());
        Ok(app)
    }

    async fn update_access_app(
        &self,
        app_id: &str,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let app = state
            .apps
            .get_mut(app_id)
            .ok_or_else(|| ProviderError::NotFound("Access application".to_string()))?;
        app.name = input.name.clone();
        app.domain = input.domain.clone();
        app.app_type = input.app_type.clone();
        app.session_duration = input.session_duration.clone();
        app.app_launcher_visible = input.app_launcher_visible;
        app.allowed_idps = input.allowed_idps.clone();
        app.policies = input.policies.clone();
        Ok(app.clone())
    }

    async fn delete_access_app(&self, app_id: &str) -> Result<(), ProviderError> {
        self.state
            .lock()
            .unwrap()
            .apps
            .remove(app_id)
            .map(|_| ())
            .ok_or_else(|| ProviderError::NotFound("Access application".to_string()))
    }

    async fn list_access_policies(&self) -> Result<Vec<AccessPolicy>, ProviderError> {
        let state = self.state.lock().unwrap();
        let mut policies: Vec<_> = state.policies.values().cloned().collect();
        policies.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(policies)
    }

    async fn get_access_policy(&self, policy_id: &str) -> Result<AccessPolicy, ProviderError> {
        self.state
            .lock()
            .unwrap()
            .policies
            .get(policy_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound("Access policy".to_string()))
    }

    async fn create_access_policy(
        &self,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let id = state.mint_id("pol");
        let policy = AccessPolicy {
            id: id.clone(),
            name: input.name.clone(),
            precedence: input.precedence,
            decision: input.decision.clone(),
            include: input.include.clone(),
            exclude: input.exclude.clone(),
            require: input.require.clone(),
            session_duration: input.session_duration.clone(),
            approval_required: input.approval_required,
            created_at: None,
            updated_at: None,
            app_count: None,
        };
        state.policies.insert(id, policy.clone());
        Ok(policy)
    }

    async fn update_access_policy(
        &self,
        policy_id: &str,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let policy = state
            .policies
            .get_mut(policy_id)
            .ok_or_else(|| ProviderError::NotFound("Access policy".to_string()))?;
        policy.name = input.name.clone();
        policy.precedence = input.precedence;
        policy.decision = input.decision.clone();
        policy.include = input.include.clone();
        policy.exclude = input.exclude.clone();
        policy.require = input.require.clone();
        policy.session_duration = input.session_duration.clone();
        policy.approval_required = input.approval_required;
        Ok(policy.clone())
    }

    async fn delete_access_policy(&self, policy_id: &str) -> Result<(), ProviderError> {
        self.state
            .lock()
            .unwrap()
            .policies
            .remove(policy_id)
            .map(|_| ())
            .ok_or_else(|| ProviderError::NotFound("Access policy".to_string()))
    }
}
