// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Access application and reusable policy CRUD.
//!
//! Thin delegation to the provider: input shape translation and error
//! taxonomy mapping only, no business logic. Zone gating does not apply
//! here; Access resources are account-scoped.

use crate::errors::ServiceError;
use crate::provider::Provider;
use crate::types::{AccessAppInput, AccessApplication, AccessPolicy, AccessPolicyInput};
use std::sync::Arc;
use tracing::info;

/// Application type kept by the list filter; other Access app types are
/// not managed by this service.
const SELF_HOSTED: &str = "self_hosted";

/// Account-level Access operations.
#[derive(Clone)]
pub struct AccessService {
    provider: Arc<dyn Provider>,
}

impl AccessService {
    /// Build a service over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// List self-hosted Access applications.
    pub async fn list_apps(&self) -> Result<Vec<AccessApplication>, ServiceError> {
        let apps = self.provider.list_access_apps().await?;
        Ok(apps
            .into_iter()
            .filter(|app| app.app_type == SELF_HOSTED)
            .collect())
    }

    /// Fetch one Access application by id.
    pub async fn get_app(&self, app_id: &str) -> Result<AccessApplication, ServiceError> {
        Ok(self.provider.get_access_app(app_id).await?)
    }

    /// Create an Access application.
    pub async fn create_app(
        &self,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ServiceError> {
        let app = self.provider.create_access_app(input).await?;
        info!(app = %app.id, name = %app.name, "Created Access application");
        Ok(app)
    }

    /// Update an Access application by id.
    pub async fn update_app(
        &self,
        app_id: &str,
        input: &AccessAppInput,
    ) -> Result<AccessApplication, ServiceError> {
        let app = self.provider.update_access_app(app_id, input).await?;
        info!(app = %app.id, "Updated Access application");
        Ok(app)
    }

    /// Delete an Access application by id.
    pub async fn delete_app(&self, app_id: &str) -> Result<(), ServiceError> {
        self.provider.delete_access_app(app_id).await?;
        info!(app = app_id, "Deleted Access application");
        Ok(())
    }

    /// List reusable policies.
    pub async fn list_policies(&self) -> Result<Vec<AccessPolicy>, ServiceError> {
        Ok(self.provider.list_access_policies().await?)
    }

    /// Fetch one reusable policy by id.
    pub async fn get_policy(&self, policy_id: &str) -> Result<AccessPolicy, ServiceError> {
        Ok(self.provider.get_access_policy(policy_id).await?)
    }

    /// Create a reusable policy.
    pub async fn create_policy(
        &self,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ServiceError> {
        let policy = self.provider.create_access_policy(input).await?;
        info!(policy = %policy.id, name = %policy.name, "Created Access policy");
        Ok(policy)
    }

    /// Update a reusable policy by id.
    pub async fn update_policy(
        &self,
        policy_id: &str,
        input: &AccessPolicyInput,
    ) -> Result<AccessPolicy, ServiceError> {
        let policy = self.provider.update_access_policy(policy_id, input).await?;
        info!(policy = %policy.id, "Updated Access policy");
        Ok(policy)
    }

    /// Delete a reusable policy by id.
    pub async fn delete_policy(&self, policy_id: &str) -> Result<(), ServiceError> {
        self.provider.delete_access_policy(policy_id).await?;
        info!(policy = policy_id, "Deleted Access policy");
        Ok(())
    }
}
