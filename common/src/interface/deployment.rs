use std::sync::Arc;

use bench_defs::{
    Credential, Credentials, DeployStatus, DeploymentData, DeploymentError, DeploymentFilter,
    DeploymentUpdate, RecordStore, ResourceCreate, ResourceData, ResourceFilter,
};
use bench_utils::{format_timestamp, validate_credentials, Clock, SystemClock};
use log::{debug, info};
use serde_json::Value;

use super::credentials::{CredentialRegistry, LEGACY_PROVIDER};

/// Credential instances resolved for one provider, split by role.
#[derive(Debug)]
pub struct ResolvedCredentials {
    pub admin: Option<Box<dyn Credential>>,
    pub users: Vec<Box<dyn Credential>>,
}

/// One tracked deployment. Wraps the persisted record and forwards every
/// mutation to the injected record store; the in-memory copy is replaced by
/// the store's return value, so a failed write never leaves partial state
/// behind.
pub struct Deployment {
    data: DeploymentData,
    store: Arc<dyn RecordStore>,
    registry: Arc<CredentialRegistry>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The injected dependencies are trait objects without `Debug`; only the
        // persisted record is printable.
        f.debug_struct("Deployment")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl Deployment {
    /// Mint a new record from a partial attribute set. Exactly one store
    /// round-trip; the store assigns the uuid.
    pub async fn create(
        store: Arc<dyn RecordStore>,
        attrs: DeploymentUpdate,
    ) -> Result<Self, DeploymentError> {
        let data = store.deployment_create(&attrs).await?;
        info!("Created deployment {}", data.uuid);
        Ok(Self::load(store, data))
    }

    /// Wrap an already-persisted record without contacting the store.
    pub fn load(store: Arc<dyn RecordStore>, data: DeploymentData) -> Self {
        Deployment {
            data,
            store,
            registry: Arc::new(CredentialRegistry::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Fetch the record for `uuid` from the store.
    pub async fn get(store: Arc<dyn RecordStore>, uuid: &str) -> Result<Self, DeploymentError> {
        match store.deployment_get(uuid).await? {
            Some(data) => Ok(Self::load(store, data)),
            None => Err(DeploymentError::NotFound(uuid.to_string())),
        }
    }

    /// List deployments matching `filter`, in store order.
    pub async fn list(
        store: Arc<dyn RecordStore>,
        filter: &DeploymentFilter,
    ) -> Result<Vec<Self>, DeploymentError> {
        let records = store.deployment_list(filter).await?;
        Ok(records
            .into_iter()
            .map(|data| Self::load(store.clone(), data))
            .collect())
    }

    pub fn with_credential_registry(mut self, registry: Arc<CredentialRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.data.uuid
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn status(&self) -> DeployStatus {
        self.data.status
    }

    pub fn config(&self) -> &Value {
        &self.data.config
    }

    pub fn parent_uuid(&self) -> Option<&str> {
        self.data.parent_uuid.as_deref()
    }

    pub fn data(&self) -> &DeploymentData {
        &self.data
    }

    /// Persist a partial update and adopt the store's returned record as the
    /// new in-memory state.
    pub async fn update(&mut self, attrs: DeploymentUpdate) -> Result<(), DeploymentError> {
        let updated = self.store.deployment_update(&self.data.uuid, &attrs).await?;
        self.data = updated;
        Ok(())
    }

    pub async fn update_name(&mut self, name: &str) -> Result<(), DeploymentError> {
        debug!("Renaming deployment {} to {:?}", self.data.uuid, name);
        self.update(DeploymentUpdate::name_update(name)).await
    }

    pub async fn update_config(&mut self, config: Value) -> Result<(), DeploymentError> {
        self.update(DeploymentUpdate::config_update(config)).await
    }

    /// Validate and persist a new credentials mapping. A payload that fails
    /// the schema never reaches the store.
    pub async fn update_credentials(
        &mut self,
        credentials: Credentials,
    ) -> Result<(), DeploymentError> {
        let payload = serde_json::to_value(&credentials).unwrap();
        if let Err(error) = validate_credentials(&payload) {
            return Err(DeploymentError::InvalidCredentials(error.to_string()));
        }
        self.update(DeploymentUpdate::credentials_update(credentials))
            .await
    }

    pub async fn update_status(&mut self, status: DeployStatus) -> Result<(), DeploymentError> {
        info!("Deployment {} status -> {}", self.data.uuid, status);
        self.update(DeploymentUpdate::status_update(status)).await
    }

    /// Record the start of the deployment: status and start stamp in a single
    /// store write. Always sets the status, whatever the current one is.
    pub async fn set_started(&mut self) -> Result<(), DeploymentError> {
        self.update(DeploymentUpdate::started_update(self.clock.now()))
            .await
    }

    /// Record completion: status and completion stamp in a single store write.
    pub async fn set_completed(&mut self) -> Result<(), DeploymentError> {
        self.update(DeploymentUpdate::completed_update(self.clock.now()))
            .await
    }

    /// Resolve the stored credential groups for `provider_name` into concrete
    /// credential instances. The admin comes from the first group that has
    /// one; user credentials are concatenated across groups in order.
    pub fn credentials_for(
        &self,
        provider_name: &str,
    ) -> Result<ResolvedCredentials, DeploymentError> {
        let groups = self
            .data
            .credentials
            .get(provider_name)
            .ok_or_else(|| DeploymentError::NoCredentialsForProvider(provider_name.to_string()))?;
        let constructor = self
            .registry
            .constructor_for(provider_name)
            .ok_or_else(|| DeploymentError::UnknownCredentialType(provider_name.to_string()))?;

        let mut admin = None;
        let mut users = Vec::new();
        for group in groups {
            if admin.is_none() {
                if let Some(payload) = &group.admin {
                    admin = Some(constructor(payload)?);
                }
            }
            for payload in &group.users {
                users.push(constructor(payload)?);
            }
        }
        Ok(ResolvedCredentials { admin, users })
    }

    #[deprecated(note = "resolve per provider with `credentials_for` instead")]
    pub fn admin(&self) -> Result<Option<Box<dyn Credential>>, DeploymentError> {
        Ok(self.credentials_for(LEGACY_PROVIDER)?.admin)
    }

    #[deprecated(note = "resolve per provider with `credentials_for` instead")]
    pub fn users(&self) -> Result<Vec<Box<dyn Credential>>, DeploymentError> {
        Ok(self.credentials_for(LEGACY_PROVIDER)?.users)
    }

    /// Snapshot of all attributes with the timestamp fields rendered in the
    /// fixed format; everything else is left as stored.
    pub fn to_value(&self) -> Value {
        let mut snapshot = serde_json::to_value(&self.data).unwrap();
        let timestamps = [
            ("created_at", self.data.created_at),
            ("updated_at", self.data.updated_at),
            ("started_at", self.data.started_at),
            ("completed_at", self.data.completed_at),
        ];
        for (field, stamp) in timestamps {
            snapshot[field] = match stamp {
                Some(at) => Value::String(format_timestamp(&at)),
                None => Value::Null,
            };
        }
        snapshot
    }

    /// Register a provisioned artifact under this deployment.
    pub async fn add_resource(
        &self,
        provider_name: &str,
        r#type: &str,
        info: Value,
    ) -> Result<ResourceData, DeploymentError> {
        let resource = ResourceCreate {
            deployment_uuid: self.data.uuid.clone(),
            provider_name: provider_name.to_string(),
            r#type: r#type.to_string(),
            info,
        };
        let created = self.store.resource_create(&resource).await?;
        debug!(
            "Registered resource {} for deployment {}",
            created.id, self.data.uuid
        );
        Ok(created)
    }

    /// Resources tied to this deployment, optionally narrowed by provider
    /// and/or type. Order is whatever the store returns.
    pub async fn get_resources(
        &self,
        filter: &ResourceFilter,
    ) -> Result<Vec<ResourceData>, DeploymentError> {
        Ok(self
            .store
            .resource_get_all(&self.data.uuid, filter)
            .await?)
    }

    /// Delete one resource by id. Needs no deployment loaded; resources are
    /// removed individually, independent of their parent's lifecycle.
    pub async fn delete_resource(
        store: &dyn RecordStore,
        id: i64,
    ) -> Result<(), DeploymentError> {
        Ok(store.resource_delete(id).await?)
    }

    /// Delete this record from the store. Consumes the object; the in-memory
    /// copy would be stale afterwards.
    pub async fn delete(self) -> Result<(), DeploymentError> {
        info!("Deleting deployment {}", self.data.uuid);
        Ok(self.store.deployment_delete(&self.data.uuid).await?)
    }

    /// Delete a record by uuid without loading it first.
    pub async fn delete_by_uuid(
        store: &dyn RecordStore,
        uuid: &str,
    ) -> Result<(), DeploymentError> {
        Ok(store.deployment_delete(uuid).await?)
    }
}
