use async_trait::async_trait;

use crate::{
    DeploymentData, DeploymentFilter, DeploymentUpdate, ResourceCreate, ResourceData,
    ResourceFilter,
};

/// Persistence interface for deployment and resource records. Implementations
/// own id assignment and write ordering; every call is a synchronous
/// round-trip and the returned record is the authoritative state.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn deployment_create(
        &self,
        attrs: &DeploymentUpdate,
    ) -> Result<DeploymentData, anyhow::Error>;
    async fn deployment_get(&self, uuid: &str) -> Result<Option<DeploymentData>, anyhow::Error>;
    async fn deployment_update(
        &self,
        uuid: &str,
        attrs: &DeploymentUpdate,
    ) -> Result<DeploymentData, anyhow::Error>;
    async fn deployment_delete(&self, uuid: &str) -> Result<(), anyhow::Error>;
    async fn deployment_list(
        &self,
        filter: &DeploymentFilter,
    ) -> Result<Vec<DeploymentData>, anyhow::Error>;
    async fn resource_create(
        &self,
        resource: &ResourceCreate,
    ) -> Result<ResourceData, anyhow::Error>;
    async fn resource_get(&self, id: i64) -> Result<Option<ResourceData>, anyhow::Error>;
    async fn resource_get_all(
        &self,
        deployment_uuid: &str,
        filter: &ResourceFilter,
    ) -> Result<Vec<ResourceData>, anyhow::Error>;
    async fn resource_delete(&self, id: i64) -> Result<(), anyhow::Error>;
}
