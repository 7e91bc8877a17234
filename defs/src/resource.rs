use serde::{Deserialize, Serialize};

/// A provisioned artifact tied to one deployment. Resources are created and
/// deleted individually; removing the owning deployment does not cascade.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ResourceData {
    pub id: i64,
    pub deployment_uuid: String,
    pub provider_name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub info: serde_json::Value,
}

/// Attributes for minting a new resource record; the store assigns the id.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ResourceCreate {
    pub deployment_uuid: String,
    pub provider_name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub info: serde_json::Value,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceFilter {
    pub provider_name: Option<String>,
    pub r#type: Option<String>,
}

impl ResourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider_name: &str) -> Self {
        self.provider_name = Some(provider_name.to_string());
        self
    }

    pub fn with_type(mut self, r#type: &str) -> Self {
        self.r#type = Some(r#type.to_string());
        self
    }

    pub fn matches(&self, resource: &ResourceData) -> bool {
        if let Some(ref provider_name) = self.provider_name {
            if resource.provider_name != *provider_name {
                return false;
            }
        }
        if let Some(ref r#type) = self.r#type {
            if resource.r#type != *r#type {
                return false;
            }
        }
        true
    }
}
