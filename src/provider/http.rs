// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloudflare v4 REST API client.
//!
//! Implements [`Provider`] over HTTPS. Every response is wrapped in the v4
//! envelope (`success`/`errors`/`result`/`result_info`); list endpoints are
//! drained page by page before returning, so callers always see complete
//! result sets.

use super::{Provider, ProviderError};
use crate::constants::LIST_PAGE_SIZE;
use crate::types::{
    AccessAppInput, AccessApplication, AccessPolicy, AccessPolicyInput, DnsRecord, DnsRecordInput,
    Tunnel, TunnelConfig,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Cloudflare v4 response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

/// One entry of the envelope's `errors` array.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Pagination block of the envelope.
#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default = "one")]
    page: u32,
    #[serde(default = "one")]
    total_pages: u32,
}

fn one() -> u32 {
    1
}

/// Shape of the tunnel configurations endpoint's `result`.
#[derive(Debug, Serialize, Deserialize)]
struct TunnelConfigResult {
    config: Option<TunnelConfig>,
}

/// HTTP client for the Cloudflare v4 API.
#[derive(Debug, Clone)]
pub struct CloudflareClient {
    http: reqwest::Client,
    base: String,
    account_id: String,
    api_token: String,
}

impl CloudflareClient {
    /// Build a client for the given API base, account and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base: &str, account_id: &str, api_token: &str) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn account_path(&self, suffix: &str) -> String {
        format!("/accounts/{}{}", self.account_id, suffix)
    }

    /// Send a request and decode the envelope.
    ///
    /// `resource` is the noun used in `NotFound` errors, e.g. "tunnel".
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        resource: &str,
    ) -> Result<Envelope<T>, ProviderError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.api_token);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            404 => return Err(ProviderError::NotFound(resource.to_string())),
            429 => return Err(ProviderError::RateLimited),
            401 | 403 => {
                let detail = response.text().await.unwrap_or_default();
                return Err(ProviderError::Unauthorized(detail));
            }
            _ => {}
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to decode response: {e}")))?;

        if !envelope.success {
            return Err(classify_envelope_errors(envelope.errors, resource));
        }
        Ok(envelope)
    }

    /// Unwrap the `result` field, treating an absent result as transport
    /// corruption (the API always populates it on success).
    fn expect_result<T>(envelope: Envelope<T>, resource: &str) -> Result<T, ProviderError> {
        envelope
            .result
            .ok_or_else(|| ProviderError::Transport(format!("missing result for {resource}")))
    }

    /// Drain a paginated list endpoint to completion.
    ///
    /// Pages are fetched sequentially; the loop restarts cleanly from page
    /// one on every call, so a consumer always observes a full pass.
    async fn list_paginated<T>(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
        resource: &str,
    ) -> Result<Vec<T>, ProviderError>
    where
        T: DeserializeOwned,
    {
        let mut items: Vec<T> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("page", page.to_string()),
                ("per_page", LIST_PAGE_SIZE.to_string()),
            ];
            query.extend(extra_query.iter().cloned());

            let envelope: Envelope<Vec<T>> = self
                .send(Method::GET, path, &query, None::<&()>, resource)
                .await?;

            let batch = envelope.result.unwrap_or_default();
            debug!(
                path,
                page,
                items_in_page = batch.len(),
                total_items = items.len() + batch.len(),
                "Fetched page from provider API"
            );
            items.extend(batch);

            match envelope.result_info {
                Some(info) if info.page < info.total_pages => page = info.page + 1,
                _ => break,
            }
        }

        Ok(items)
    }
}

/// Map the envelope's `errors` array to a [`ProviderError`].
///
/// Code 10000 is the provider's "authentication error"; other conditions
/// are only distinguishable by message text.
fn classify_envelope_errors(errors: Vec<ApiMessage>, resource: &str) -> ProviderError {
    let Some(first) = errors.into_iter().next() else {
        return ProviderError::Api {
            code: 0,
            message: "provider reported failure without detail".to_string(),
        };
    };

    let lowered = first.message.to_lowercase();
    if first.code == 10000 || lowered.contains("authentication error") {
        return ProviderError::Unauthorized(first.message);
    }
    if lowered.contains("rate limit") {
        return ProviderError::RateLimited;
    }
    if lowered.contains("not found") || lowered.contains("could not find") {
        return ProviderError::NotFound(resource.to_string());
    }
    ProviderError::Api {
        code: first.code,
        message: first.message,
    }
}

#[async_trait]
impl Provider for CloudflareClient {
    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError> {
        self.list_paginated(&format!("/zones/{zone_id}/dns_records"), &[], "DNS record")
            .await
    }

    async fn get_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> Result<DnsRecord, ProviderError> {
        let envelope = self
            .send(
                Method::GET,
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                &[],
                None::<&()>,
                "DNS record",
            )
            .await?;
        Self::expect_result(envelope, "DNS record")
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ProviderError> {
        let envelope = self
            .send(
                Method::POST,
                &format!("/zones/{zone_id}/dns_records"),
                &[],
                Some(input),
                "DNS record",
            )
            .await?;
        Self::expect_result(envelope, "DNS record")
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ProviderError> {
        let envelope = self
            .send(
                Method::PUT,
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                &[],
                Some(input),
                "DNS record",
            )
            .await?;
        Self::expect_result(envelope, "DNS record")
    }

    async fn delete_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> Result<(), ProviderError> {
        self.send::<serde_json::Value, ()>(
            Method::DELETE,
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            &[],
            None,
            "DNS record",
        )
        .await?;
        Ok(())
    }

    async fn list_tunnels(&self) -> Result<Vec<Tunnel>, ProviderError> {
        self.list_paginated(
            &self.account_path("/cfd_tunnel"),
            &[("is_deleted", "false".to_string())],
            "tunnel",
        )
        .await
    }

    async fn get_tunnel(&self, tunnel_id: &str) -> Result<Tunnel, ProviderError> {
        let envelope = self
            .send(
                Method::GET,
                &self.account_path(&format!("/cfd_tunnel/{tunnel_id}")),
                &[],
                None::<&()>,
                "tunnel",
            )
            .await?;
        Self::expect_result(envelope, "tunnel")
    }

    async fn create_tunnel(&self, name: &str, secret_b64: &str) -> Result<Tunnel, ProviderError> {
        let body = json!({
            "name": name,
            "tunnel_secret": secret_b64,
            // Remote-managed configuration; required for the ingress API
            "config_src": "cloudflare",
        });
        let envelope = self
            .send(
                Method::POST,
                &self.account_path("/cfd_tunnel"),
                &[],
                Some(&body),
                "tunnel",
            )
            .await?;
        Self::expect_result(envelope, "tunnel")
    }

    async fn delete_tunnel(&self, tunnel_id: &str) -> Result<(), ProviderError> {
        self.send::<serde_json::Value, ()>(
            Method::DELETE,
            &self.account_path(&format!("/cfd_tunnel/{tunnel_id}")),
            &[],
            None,
            "tunnel",
        )
        .await?;
        Ok(())
    }

    async fn tunnel_token(&self, tunnel_id: &str) -> Result<String, ProviderError> {
        let envelope = self
            .send(
                Method::GET,
                &self.account_path(&format!("/cfd_tunnel/{tunnel_id}/token")),
                &[],
                None::<&()>,
                "tunnel",
            )
            .await?;
        Self::expect_result(envelope, "tunnel token")
    }

    async fn get_tunnel_config(
        &self,
        tunnel_id: &str,
    ) -> Result<Option<TunnelConfig>, ProviderError> {
        let result = self
            .send::<TunnelConfigResult, ()>(
                Method::GET,
                &self.account_path(&format!("/cfd_tunnel/{tunnel_id}/configurations")),
                &[],
                None,
                "tunnel",
            )
            .await;

        match result {
            Ok(envelope) => Ok(envelope.result.and_then(|r| r.config)),
            // A tunnel with no remote configuration yet reports not-found;
            // callers treat that the same as an empty configuration.
            Err(ProviderError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_tunnel_config(
        &self,
        tunnel_id: &str,
        config: &TunnelConfig,
    ) -> Result<(), ProviderError> {
        let body = json!({ "config": config });
        self.send::<serde_json::Value, serde_json::Value>(
            Method::PUT,
            &self.account_path(&format!("/cfd_tunnel/{tunnel_id}/configurations")),
            &[],
            Some(&body),
            "tunnel",
        )
        .await?;
        Ok(())
    }

    async fn list_access_apps(&self) -> Result<Vec<AccessApplication>, ProviderError> {
        self.list_paginated(&self.account_path("/access/apps"), &[], "Access application")
            .await
    }

    async fn get_access_app(&self, app_id: &str) -> Result<AccessApplication, ProviderError> {
        let envelope = self
            .send(
                Method::GET,
                &self.account_path(&format!("/access/apps/{app_id}")),
                &[],
                None::<&()>,
                "Access application",
            )
            .await?;
        Self::expect_result(envelope, "Access application")
    }

    async fn create_access_app(
        &self,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ProviderError> {
        let envelope = self
            .send(
                Method::POST,
                &self.account_path("/access/apps"),
                &[],
                Some(input),
                "Access application",
            )
            .await?;
        Self::expect_result(envelope, "Access application")
    }

    async fn update_access_app(
        &self,
        app_id: &str,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ProviderError> {
        let envelope = self
            .send(
                Method::PUT,
                &self.account_path(&format!("/access/apps/{app_id}")),
                &[],
                Some(input),
                "Access application",
            )
            .await?;
        Self::expect_result(envelope, "Access application")
    }

    async fn delete_access_app(&self, app_id: &str) -> Result<(), ProviderError> {
        self.send::<serde_json::Value, ()>(
            Method::DELETE,
            &self.account_path(&format!("/access/apps/{app_id}")),
            &[],
            None,
            "Access application",
        )
        .await?;
        Ok(())
    }

    async fn list_access_policies(&self) -> Result<Vec<AccessPolicy>, ProviderError> {
        self.list_paginated(&self.account_path("/access/policies"), &[], "Access policy")
            .await
    }

    async fn get_access_policy(&self, policy_id: &str) -> Result<AccessPolicy, ProviderError> {
        let envelope = self
            .send(
                Method::GET,
                &self.account_path(&format!("/access/policies/{policy_id}")),
                &[],
                None::<&()>,
                "Access policy",
            )
            .await?;
        Self::expect_result(envelope, "Access policy")
    }

    async fn create_access_policy(
        &self,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ProviderError> {
        let envelope = self
            .send(
                Method::POST,
                &self.account_path("/access/policies"),
                &[],
                Some(input),
                "Access policy",
            )
            .await?;
        Self::expect_result(envelope, "Access policy")
    }

    async fn update_access_policy(
        &self,
        policy_id: &str,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ProviderError> {
        let envelope = self
            .send(
                Method::PUT,
                &self.account_path(&format!("/access/policies/{policy_id}")),
                &[],
                Some(input),
                "Access policy",
            )
            .await?;
        Self::expect_result(envelope, "Access policy")
    }

    async fn delete_access_policy(&self, policy_id: &str) -> Result<(), ProviderError> {
        self.send::<serde_json::Value, ()>(
            Method::DELETE,
            &self.account_path(&format!("/access/policies/{policy_id}")),
            &[],
            None,
            "Access policy",
        )
        .await?;
        Ok(())
    }
}
