use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::Credentials;

/// Lifecycle status of a deployment. Transitions are recorded, not enforced;
/// callers report failures by setting the matching status directly.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeployStatus {
    #[default]
    Init,
    Started,
    Finished,
    Failed,
    Inconsistent,
    CleanupStarted,
    CleanupFinished,
    CleanupFailed,
}

impl DeployStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStatus::Init => "init",
            DeployStatus::Started => "started",
            DeployStatus::Finished => "finished",
            DeployStatus::Failed => "failed",
            DeployStatus::Inconsistent => "inconsistent",
            DeployStatus::CleanupStarted => "cleanup_started",
            DeployStatus::CleanupFinished => "cleanup_finished",
            DeployStatus::CleanupFailed => "cleanup_failed",
        }
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "init" => Some(DeployStatus::Init),
            "started" => Some(DeployStatus::Started),
            "finished" => Some(DeployStatus::Finished),
            "failed" => Some(DeployStatus::Failed),
            "inconsistent" => Some(DeployStatus::Inconsistent),
            "cleanup_started" => Some(DeployStatus::CleanupStarted),
            "cleanup_finished" => Some(DeployStatus::CleanupFinished),
            "cleanup_failed" => Some(DeployStatus::CleanupFailed),
            _ => None,
        }
    }

    /// True once no further lifecycle progress is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeployStatus::Finished
                | DeployStatus::Failed
                | DeployStatus::CleanupFinished
                | DeployStatus::CleanupFailed
        )
    }
}

impl std::fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted representation of one deployment. The `uuid` is assigned by
/// the record store on creation and never changes afterwards.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DeploymentData {
    pub uuid: String,
    pub name: String,
    pub config: serde_json::Value,
    pub credentials: Credentials,
    pub status: DeployStatus,
    pub parent_uuid: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for DeploymentData {
    fn default() -> Self {
        DeploymentData {
            uuid: String::new(),
            name: String::new(),
            config: serde_json::Value::Object(serde_json::Map::new()),
            credentials: Credentials::new(),
            status: DeployStatus::Init,
            parent_uuid: None,
            created_at: None,
            updated_at: None,
            started_at: None,
            completed_at: None,
        }
    }
}

/// Partial attribute set handed to the record store for create and update
/// calls. Absent fields are left untouched by the store.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct DeploymentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeployStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DeploymentUpdate {
    pub fn name_update(name: &str) -> Self {
        DeploymentUpdate {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn config_update(config: serde_json::Value) -> Self {
        DeploymentUpdate {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn credentials_update(credentials: Credentials) -> Self {
        DeploymentUpdate {
            credentials: Some(credentials),
            ..Default::default()
        }
    }

    pub fn status_update(status: DeployStatus) -> Self {
        DeploymentUpdate {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Status and start stamp travel in one update so the store sees a single
    /// write per transition.
    pub fn started_update(at: DateTime<Utc>) -> Self {
        DeploymentUpdate {
            status: Some(DeployStatus::Started),
            started_at: Some(at),
            ..Default::default()
        }
    }

    pub fn completed_update(at: DateTime<Utc>) -> Self {
        DeploymentUpdate {
            status: Some(DeployStatus::Finished),
            completed_at: Some(at),
            ..Default::default()
        }
    }
}

/// Filter options for listing deployments. Store-side filtering; every field
/// left as `None` matches all records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeploymentFilter {
    pub status: Option<DeployStatus>,
    pub parent_uuid: Option<String>,
    pub name: Option<String>,
}

impl DeploymentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: DeployStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_parent(mut self, parent_uuid: &str) -> Self {
        self.parent_uuid = Some(parent_uuid.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn matches(&self, deployment: &DeploymentData) -> bool {
        if let Some(status) = self.status {
            if deployment.status != status {
                return false;
            }
        }
        if let Some(ref parent_uuid) = self.parent_uuid {
            if deployment.parent_uuid.as_deref() != Some(parent_uuid.as_str()) {
                return false;
            }
        }
        if let Some(ref name) = self.name {
            if deployment.name != *name {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            DeployStatus::Init,
            DeployStatus::Started,
            DeployStatus::Finished,
            DeployStatus::Failed,
            DeployStatus::Inconsistent,
            DeployStatus::CleanupStarted,
            DeployStatus::CleanupFinished,
            DeployStatus::CleanupFailed,
        ] {
            assert_eq!(DeployStatus::try_parse(status.as_str()), Some(status));
        }
        assert_eq!(DeployStatus::try_parse("running"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!DeployStatus::Init.is_terminal());
        assert!(!DeployStatus::Started.is_terminal());
        assert!(!DeployStatus::Inconsistent.is_terminal());
        assert!(DeployStatus::Finished.is_terminal());
        assert!(DeployStatus::Failed.is_terminal());
        assert!(DeployStatus::CleanupFailed.is_terminal());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_value(DeployStatus::CleanupStarted).unwrap();
        assert_eq!(json, serde_json::json!("cleanup_started"));
    }

    #[test]
    fn test_started_update_carries_both_fields() {
        let at = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap();
        let update = DeploymentUpdate::started_update(at);
        assert_eq!(update.status, Some(DeployStatus::Started));
        assert_eq!(update.started_at, Some(at));
        assert_eq!(update.completed_at, None);
        assert_eq!(update.name, None);
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = DeploymentUpdate::name_update("sandbox");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "sandbox"}));
    }

    #[test]
    fn test_filter_matches() {
        let deployment = DeploymentData {
            uuid: "d1".to_string(),
            name: "smoke".to_string(),
            status: DeployStatus::Started,
            parent_uuid: Some("p1".to_string()),
            ..Default::default()
        };

        assert!(DeploymentFilter::new().matches(&deployment));
        assert!(DeploymentFilter::new()
            .with_status(DeployStatus::Started)
            .with_parent("p1")
            .with_name("smoke")
            .matches(&deployment));
        assert!(!DeploymentFilter::new()
            .with_status(DeployStatus::Finished)
            .matches(&deployment));
        assert!(!DeploymentFilter::new().with_parent("p2").matches(&deployment));
        assert!(!DeploymentFilter::new().with_name("other").matches(&deployment));
    }
}
