// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP API surface.
//!
//! A thin axum layer over the services: routing, JSON extraction and the
//! standard error envelope. Errors serialize as
//! `{"error": {"code", "message"}}` with the status given by
//! [`ServiceError::http_status`].

use crate::access::AccessService;
use crate::dns::DnsService;
use crate::constants::METRICS_PATH;
use crate::errors::ServiceError;
use crate::metrics::gather_metrics;
use crate::tunnels::TunnelService;
use crate::types::{AccessAppInput, AccessPolicyInput, DnsRecordInput, IngressRuleInput};
use crate::zones::ZoneRegistry;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ZoneRegistry>,
    pub dns: DnsService,
    pub tunnels: TunnelService,
    pub access: AccessService,
}

/// Wrapper turning [`ServiceError`] into the standard error envelope.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": {
                "code": self.0.code(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

#[derive(Deserialize)]
struct TunnelCreateBody {
    name: String,
}

#[derive(Deserialize)]
struct IngressUpdateBody {
    rules: Vec<IngressRuleInput>,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(METRICS_PATH, get(metrics))
        .route("/api/zones", get(list_zones))
        .route("/api/dns/{zone_id}", get(list_records).post(create_record))
        .route(
            "/api/dns/{zone_id}/{record_id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/api/tunnels", get(list_tunnels).post(create_tunnel))
        .route(
            "/api/tunnels/{tunnel_id}",
            get(get_tunnel).delete(delete_tunnel),
        )
        .route("/api/tunnels/{tunnel_id}/token", get(tunnel_token))
        .route(
            "/api/tunnels/{tunnel_id}/config",
            get(get_tunnel_config).put(update_tunnel_config),
        )
        .route("/api/access/apps", get(list_apps).post(create_app))
        .route(
            "/api/access/apps/{app_id}",
            get(get_app).put(update_app).delete(delete_app),
        )
        .route(
            "/api/access/policies",
            get(list_policies).post(create_policy),
        )
        .route(
            "/api/access/policies/{policy_id}",
            get(get_policy).put(update_policy).delete(delete_policy),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics() -> Response {
    match gather_metrics() {
        Ok(text) => text.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to gather metrics: {e}"),
        )
            .into_response(),
    }
}

async fn list_zones(State(state): State<AppState>) -> ApiResult {
    Ok(Json(json!({ "zones": state.registry.list_allowed() })))
}

// ---------------------------------------------------------------------------
// DNS records
// ---------------------------------------------------------------------------

async fn list_records(State(state): State<AppState>, Path(zone_id): Path<String>) -> ApiResult {
    let records = state.dns.list(&zone_id).await?;
    Ok(Json(json!({ "records": records })))
}

async fn get_record(
    State(state): State<AppState>,
    Path((zone_id, record_id)): Path<(String, String)>,
) -> ApiResult {
    let record = state.dns.get(&zone_id, &record_id).await?;
    Ok(Json(json!({ "record": record })))
}

async fn create_record(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
    Json(input): Json<DnsRecordInput>,
) -> ApiResult {
    let record = state.dns.create(&zone_id, &input).await?;
    Ok(Json(json!({ "record": record })))
}

async fn update_record(
    State(state): State<AppState>,
    Path((zone_id, record_id)): Path<(String, String)>,
    Json(input): Json<DnsRecordInput>,
) -> ApiResult {
    let record = state.dns.update(&zone_id, &record_id, &input).await?;
    Ok(Json(json!({ "record": record })))
}

async fn delete_record(
    State(state): State<AppState>,
    Path((zone_id, record_id)): Path<(String, String)>,
) -> ApiResult {
    state.dns.delete(&zone_id, &record_id).await?;
    Ok(Json(json!({ "deleted": record_id })))
}

// ---------------------------------------------------------------------------
// Tunnels
// ---------------------------------------------------------------------------

async fn list_tunnels(State(state): State<AppState>) -> ApiResult {
    let tunnels = state.tunnels.list().await?;
    Ok(Json(json!({ "tunnels": tunnels })))
}

async fn get_tunnel(State(state): State<AppState>, Path(tunnel_id): Path<String>) -> ApiResult {
    let tunnel = state.tunnels.get(&tunnel_id).await?;
    Ok(Json(json!({ "tunnel": tunnel })))
}

async fn create_tunnel(
    State(state): State<AppState>,
    Json(body): Json<TunnelCreateBody>,
) -> ApiResult {
    let tunnel = state.tunnels.create(&body.name).await?;
    Ok(Json(json!({ "tunnel": tunnel })))
}

async fn delete_tunnel(State(state): State<AppState>, Path(tunnel_id): Path<String>) -> ApiResult {
    state.tunnels.delete(&tunnel_id).await?;
    Ok(Json(json!({ "deleted": tunnel_id })))
}

async fn tunnel_token(State(state): State<AppState>, Path(tunnel_id): Path<String>) -> ApiResult {
    let token = state.tunnels.token(&tunnel_id).await?;
    Ok(Json(json!({ "token": token })))
}

async fn get_tunnel_config(
    State(state): State<AppState>,
    Path(tunnel_id): Path<String>,
) -> ApiResult {
    let config = state.tunnels.get_config(&tunnel_id).await?;
    let parsed_rules = state.tunnels.parse_ingress_rules(&config);
    Ok(Json(json!({ "config": config, "parsed_rules": parsed_rules })))
}

async fn update_tunnel_config(
    State(state): State<AppState>,
    Path(tunnel_id): Path<String>,
    Json(body): Json<IngressUpdateBody>,
) -> ApiResult {
    state.tunnels.update_ingress(&tunnel_id, &body.rules).await?;

    let config = state.tunnels.get_config(&tunnel_id).await?;
    let parsed_rules = state.tunnels.parse_ingress_rules(&config);
    Ok(Json(json!({ "config": config, "parsed_rules": parsed_rules })))
}

// ---------------------------------------------------------------------------
// Access applications and policies
// ---------------------------------------------------------------------------

async fn list_apps(State(state): State<AppState>) -> ApiResult {
    let apps = state.access.list_apps().await?;
    Ok(Json(json!({ "apps": apps })))
}

async fn get_app(State(state): State<AppState>, Path(app_id): Path<String>) -> ApiResult {
    let app = state.access.get_app(&app_id).await?;
    Ok(Json(json!({ "app": app })))
}

async fn create_app(
    State(state): State<AppState>,
    Json(input): Json<AccessAppInput>,
) -> ApiResult {
    let app = state.access.create_app(&input).await?;
    Ok(Json(json!({ "app": app })))
}

async fn update_app(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    Json(input): Json<AccessAppInput>,
) -> ApiResult {
    let app = state.access.update_app(&app_id, &input).await?;
    Ok(Json(json!({ "app": app })))
}

async fn delete_app(State(state): State<AppState>, Path(app_id): Path<String>) -> ApiResult {
    state.access.delete_app(&app_id).await?;
    Ok(Json(json!({ "deleted": app_id })))
}

async fn list_policies(State(state): State<AppState>) -> ApiResult {
    let policies = state.access.list_policies().await?;
    Ok(Json(json!({ "policies": policies })))
}

async fn get_policy(State(state): State<AppState>, Path(policy_id): Path<String>) -> ApiResult {
    let policy = state.access.get_policy(&policy_id).await?;
    Ok(Json(json!({ "policy": policy })))
}

async fn create_policy(
    State(state): State<AppState>,
    Json(input): Json<AccessPolicyInput>,
) -> ApiResult {
    let policy = state.access.create_policy(&input).await?;
    Ok(Json(json!({ "policy": policy })))
}

async fn update_policy(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
    Json(input): Json<AccessPolicyInput>,
) -> ApiResult {
    let policy = state.access.update_policy(&policy_id, &input).await?;
    Ok(Json(json!({ "policy": policy })))
}

async fn delete_policy(State(state): State<AppState>, Path(policy_id): Path<String>) -> ApiResult {
    state.access.delete_policy(&policy_id).await?;
    Ok(Json(json!({ "deleted": policy_id })))
}
