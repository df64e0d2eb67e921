// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Input validation for caller-supplied data.
//!
//! Validation runs before any network call so that malformed input fails
//! fast with zero side effects. The rules match what the provider itself
//! enforces for tunnel names, DNS labels, ingress service targets and
//! path patterns.

use crate::constants::{MAX_DNS_LABEL_LEN, MAX_TUNNEL_NAME_LEN, SERVICE_PREFIXES};
use crate::errors::ServiceError;
use crate::types::IngressRuleInput;

/// Validate a tunnel name: 1-253 characters of `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] describing the first violation.
pub fn validate_tunnel_name(name: &str) -> Result<(), ServiceError> {
    if name.is_empty() {
        return Err(ServiceError::validation("tunnel name is required"));
    }
    if name.len() > MAX_TUNNEL_NAME_LEN {
        return Err(ServiceError::validation(format!(
            "tunnel name must be at most {MAX_TUNNEL_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ServiceError::validation(
            "tunnel name may only contain letters, numbers, hyphens and underscores",
        ));
    }
    Ok(())
}

/// Validate a subdomain: empty (zone apex) or dot-separated DNS labels.
///
/// Each label must be 1-63 characters, alphanumeric with interior hyphens.
fn validate_subdomain(subdomain: &str) -> Result<(), ServiceError> {
    if subdomain.is_empty() {
        return Ok(());
    }
    for label in subdomain.split('.') {
        if label.is_empty() || label.len() > MAX_DNS_LABEL_LEN {
            return Err(ServiceError::validation(format!(
                "invalid subdomain label '{label}': must be 1-{MAX_DNS_LABEL_LEN} characters"
            )));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ServiceError::validation(format!(
                "invalid subdomain label '{label}': only letters, numbers and hyphens allowed"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ServiceError::validation(format!(
                "invalid subdomain label '{label}': must not start or end with a hyphen"
            )));
        }
    }
    Ok(())
}

/// Validate an ingress service target.
///
/// Accepted forms: `http://`, `https://`, `tcp://`, `ssh://`, `rdp://` and
/// `unix://` URIs, plus the `http_status:<code>` sentinel. URI-shaped
/// targets must additionally parse as URLs.
fn validate_service(service: &str) -> Result<(), ServiceError> {
    if service.is_empty() {
        return Err(ServiceError::validation("service is required"));
    }
    if !SERVICE_PREFIXES
        .iter()
        .any(|prefix| service.starts_with(prefix))
    {
        return Err(ServiceError::validation(format!(
            "invalid service '{service}': must start with one of {SERVICE_PREFIXES:?}"
        )));
    }
    if let Some(code) = service.strip_prefix("http_status:") {
        if code.parse::<u16>().is_err() {
            return Err(ServiceError::validation(format!(
                "invalid service '{service}': http_status requires a numeric code"
            )));
        }
        return Ok(());
    }
    // unix:// sockets carry a filesystem path, not an authority
    if !service.starts_with("unix://") && url::Url::parse(service).is_err() {
        return Err(ServiceError::validation(format!(
            "invalid service '{service}': not a valid URL"
        )));
    }
    Ok(())
}

/// Validate a full desired ingress rule set.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for the first offending rule.
/// Zone membership is deliberately not checked here; that is the zone
/// registry's job and yields `ZoneNotAllowed` instead.
pub fn validate_ingress_rules(rules: &[IngressRuleInput]) -> Result<(), ServiceError> {
    for (index, rule) in rules.iter().enumerate() {
        if rule.zone_id.is_empty() {
            return Err(ServiceError::validation(format!(
                "rule {index}: zone is required"
            )));
        }
        validate_subdomain(&rule.subdomain)
            .map_err(|e| prefix_rule_error(index, &e))?;
        validate_service(&rule.service).map_err(|e| prefix_rule_error(index, &e))?;
        if let Some(path) = &rule.path {
            if !path.starts_with('/') {
                return Err(ServiceError::validation(format!(
                    "rule {index}: path must start with '/'"
                )));
            }
        }
    }
    Ok(())
}

fn prefix_rule_error(index: usize, err: &ServiceError) -> ServiceError {
    let reason = match err {
        ServiceError::Validation { reason } => reason.clone(),
        other => other.to_string(),
    };
    ServiceError::validation(format!("rule {index}: {reason}"))
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod validation_tests;
