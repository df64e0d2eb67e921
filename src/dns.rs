// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record CRUD, gated on the zone allow-list.
//!
//! Every operation checks the registry before touching the provider; a
//! request for a zone outside the allow-list fails with `ZoneNotAllowed`
//! and performs no network I/O.

use crate::constants::TTL_AUTO;
use crate::errors::ServiceError;
use crate::provider::Provider;
use crate::types::{DnsRecord, DnsRecordInput};
use crate::zones::ZoneRegistry;
use std::sync::Arc;
use tracing::info;

/// Zone-gated DNS record operations.
#[derive(Clone)]
pub struct DnsService {
    registry: Arc<ZoneRegistry>,
    provider: Arc<dyn Provider>,
}

impl DnsService {
    /// Build a service over the given registry and provider.
    #[must_use]
    pub fn new(registry: Arc<ZoneRegistry>, provider: Arc<dyn Provider>) -> Self {
        Self { registry, provider }
    }

    fn check_zone(&self, zone_id: &str) -> Result<(), ServiceError> {
        if self.registry.is_allowed(zone_id) {
            Ok(())
        } else {
            Err(ServiceError::ZoneNotAllowed {
                zone_id: zone_id.to_string(),
            })
        }
    }

    /// Apply provider defaults the same way on create and update: TTL
    /// "auto" and unproxied unless the caller says otherwise.
    fn with_defaults(input: &DnsRecordInput) -> DnsRecordInput {
        DnsRecordInput {
            ttl: Some(input.ttl.unwrap_or(TTL_AUTO)),
            proxied: Some(input.proxied.unwrap_or(false)),
            ..input.clone()
        }
    }

    /// List all records in an allowed zone.
    ///
    /// # Errors
    ///
    /// `ZoneNotAllowed` for zones outside the allow-list; provider errors
    /// otherwise.
    pub async fn list(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ServiceError> {
        self.check_zone(zone_id)?;
        Ok(self.provider.list_dns_records(zone_id).await?)
    }

    /// Fetch one record by id.
    pub async fn get(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord, ServiceError> {
        self.check_zone(zone_id)?;
        Ok(self.provider.get_dns_record(zone_id, record_id).await?)
    }

    /// Create a record in an allowed zone.
    pub async fn create(
        &self,
        zone_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ServiceError> {
        self.check_zone(zone_id)?;
        let record = self
            .provider
            .create_dns_record(zone_id, &Self::with_defaults(input))
            .await?;
        info!(
            zone = zone_id,
            record = %record.name,
            record_type = %record.record_type,
            "Created DNS record"
        );
        Ok(record)
    }

    /// Overwrite a record by id.
    pub async fn update(
        &self,
        zone_id: &str,
        record_id: &str,
        input: &DnsRecordInput,
    ) -> Result<DnsRecord, ServiceError> {
        self.check_zone(zone_id)?;
        let record = self
            .provider
            .update_dns_record(zone_id, record_id, &Self::with_defaults(input))
            .await?;
        info!(
            zone = zone_id,
            record = %record.name,
            record_type = %record.record_type,
            "Updated DNS record"
        );
        Ok(record)
    }

    /// Delete a record by id.
    pub async fn delete(&self, zone_id: &str, record_id: &str) -> Result<(), ServiceError> {
        self.check_zone(zone_id)?;
        self.provider.delete_dns_record(zone_id, record_id).await?;
        info!(zone = zone_id, record_id, "Deleted DNS record");
        Ok(())
    }
}
