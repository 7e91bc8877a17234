use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Credential sets keyed by provider name. Each provider carries an ordered
/// sequence of groups so a deployment can hold several credential sets for
/// the same backend.
pub type Credentials = BTreeMap<String, Vec<CredentialGroup>>;

/// One admin/users grouping of opaque credential payloads. The payloads are
/// provider-specific and only interpreted by the matching credential
/// constructor.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct CredentialGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<serde_json::Value>,
}

/// Common interface over resolved provider credentials. Concrete types are
/// produced by the constructor registered for the provider.
pub trait Credential: std::fmt::Debug + Send + Sync {
    fn provider_name(&self) -> &str;
    fn to_value(&self) -> serde_json::Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_group_serializes_without_absent_roles() {
        let group = CredentialGroup::default();
        assert_eq!(serde_json::to_value(&group).unwrap(), json!({}));

        let group = CredentialGroup {
            admin: Some(json!({"username": "root"})),
            users: vec![],
        };
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({"admin": {"username": "root"}})
        );
    }

    #[test]
    fn test_credentials_deserialize() {
        let credentials: Credentials = serde_json::from_value(json!({
            "openstack": [{"admin": {"username": "root"}, "users": [{"username": "worker"}]}]
        }))
        .unwrap();

        let groups = &credentials["openstack"];
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].admin, Some(json!({"username": "root"})));
        assert_eq!(groups[0].users, vec![json!({"username": "worker"})]);
    }
}
