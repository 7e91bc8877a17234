use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use bench_defs::{
    DeploymentData, DeploymentFilter, DeploymentUpdate, RecordStore, ResourceCreate, ResourceData,
    ResourceFilter,
};
use chrono::Utc;
use uuid::Uuid;

/// In-memory record store. Backs the test suites and lets embedding callers
/// run without external infrastructure; not durable.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    deployments: HashMap<String, DeploymentData>,
    resources: BTreeMap<i64, ResourceData>,
    next_resource_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply(data: &mut DeploymentData, attrs: &DeploymentUpdate) {
    if let Some(ref name) = attrs.name {
        data.name = name.clone();
    }
    if let Some(ref config) = attrs.config {
        data.config = config.clone();
    }
    if let Some(ref credentials) = attrs.credentials {
        data.credentials = credentials.clone();
    }
    if let Some(status) = attrs.status {
        data.status = status;
    }
    if let Some(ref parent_uuid) = attrs.parent_uuid {
        data.parent_uuid = Some(parent_uuid.clone());
    }
    if let Some(at) = attrs.started_at {
        data.started_at = Some(at);
    }
    if let Some(at) = attrs.completed_at {
        data.completed_at = Some(at);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn deployment_create(
        &self,
        attrs: &DeploymentUpdate,
    ) -> Result<DeploymentData, anyhow::Error> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let mut data = DeploymentData {
            uuid: Uuid::new_v4().to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            ..Default::default()
        };
        apply(&mut data, attrs);
        inner.deployments.insert(data.uuid.clone(), data.clone());
        Ok(data)
    }

    async fn deployment_get(&self, uuid: &str) -> Result<Option<DeploymentData>, anyhow::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.deployments.get(uuid).cloned())
    }

    async fn deployment_update(
        &self,
        uuid: &str,
        attrs: &DeploymentUpdate,
    ) -> Result<DeploymentData, anyhow::Error> {
        let mut inner = self.inner.lock().unwrap();
        let data = inner
            .deployments
            .get_mut(uuid)
            .ok_or_else(|| anyhow!("deployment {} does not exist", uuid))?;
        apply(data, attrs);
        data.updated_at = Some(Utc::now());
        Ok(data.clone())
    }

    async fn deployment_delete(&self, uuid: &str) -> Result<(), anyhow::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .deployments
            .remove(uuid)
            .ok_or_else(|| anyhow!("deployment {} does not exist", uuid))?;
        Ok(())
    }

    async fn deployment_list(
        &self,
        filter: &DeploymentFilter,
    ) -> Result<Vec<DeploymentData>, anyhow::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .deployments
            .values()
            .filter(|deployment| filter.matches(deployment))
            .cloned()
            .collect())
    }

    async fn resource_create(
        &self,
        resource: &ResourceCreate,
    ) -> Result<ResourceData, anyhow::Error> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.deployments.contains_key(&resource.deployment_uuid) {
            return Err(anyhow!(
                "deployment {} does not exist",
                resource.deployment_uuid
            ));
        }
        inner.next_resource_id += 1;
        let data = ResourceData {
            id: inner.next_resource_id,
            deployment_uuid: resource.deployment_uuid.clone(),
            provider_name: resource.provider_name.clone(),
            r#type: resource.r#type.clone(),
            info: resource.info.clone(),
        };
        inner.resources.insert(data.id, data.clone());
        Ok(data)
    }

    async fn resource_get(&self, id: i64) -> Result<Option<ResourceData>, anyhow::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.resources.get(&id).cloned())
    }

    async fn resource_get_all(
        &self,
        deployment_uuid: &str,
        filter: &ResourceFilter,
    ) -> Result<Vec<ResourceData>, anyhow::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .resources
            .values()
            .filter(|resource| resource.deployment_uuid == deployment_uuid)
            .filter(|resource| filter.matches(resource))
            .cloned()
            .collect())
    }

    async fn resource_delete(&self, id: i64) -> Result<(), anyhow::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .resources
            .remove(&id)
            .ok_or_else(|| anyhow!("resource {} does not exist", id))?;
        Ok(())
    }
}
