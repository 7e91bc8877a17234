use std::collections::HashMap;
use std::sync::Arc;

use bench_defs::Credential;
use serde_json::Value;

/// Provider key used by the deprecated `admin`/`users` accessors, kept for
/// callers that predate multi-provider credential sets.
pub const LEGACY_PROVIDER: &str = "openstack";

/// Builds one credential instance from an opaque payload.
pub type CredentialConstructor =
    Arc<dyn Fn(&Value) -> Result<Box<dyn Credential>, anyhow::Error> + Send + Sync>;

/// Capability-keyed registry mapping provider names to credential
/// constructors. The default registry only knows the legacy provider;
/// embedding callers register their own backends on top.
#[derive(Clone)]
pub struct CredentialRegistry {
    constructors: HashMap<String, CredentialConstructor>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        CredentialRegistry {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, provider_name: &str, constructor: CredentialConstructor) {
        self.constructors
            .insert(provider_name.to_string(), constructor);
    }

    pub fn constructor_for(&self, provider_name: &str) -> Option<CredentialConstructor> {
        self.constructors.get(provider_name).cloned()
    }

    pub fn is_registered(&self, provider_name: &str) -> bool {
        self.constructors.contains_key(provider_name)
    }
}

impl Default for CredentialRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(
            LEGACY_PROVIDER,
            GenericCredential::constructor(LEGACY_PROVIDER),
        );
        registry
    }
}

/// Provider-tagged credential that keeps its payload opaque. Used for
/// backends without a dedicated credential type.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericCredential {
    provider_name: String,
    fields: Value,
}

impl GenericCredential {
    pub fn new(provider_name: &str, fields: Value) -> Self {
        GenericCredential {
            provider_name: provider_name.to_string(),
            fields,
        }
    }

    pub fn constructor(provider_name: &str) -> CredentialConstructor {
        let provider_name = provider_name.to_string();
        Arc::new(move |fields| {
            Ok(Box::new(GenericCredential::new(&provider_name, fields.clone()))
                as Box<dyn Credential>)
        })
    }
}

impl Credential for GenericCredential {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn to_value(&self) -> Value {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_registry_knows_legacy_provider() {
        let registry = CredentialRegistry::default();
        assert!(registry.is_registered(LEGACY_PROVIDER));
        assert!(!registry.is_registered("aws"));
    }

    #[test]
    fn test_registered_constructor_builds_instances() {
        let mut registry = CredentialRegistry::new();
        registry.register("aws", GenericCredential::constructor("aws"));

        let constructor = registry.constructor_for("aws").unwrap();
        let credential = constructor(&json!({"access_key": "AK"})).unwrap();
        assert_eq!(credential.provider_name(), "aws");
        assert_eq!(credential.to_value(), json!({"access_key": "AK"}));
    }

    #[test]
    fn test_unregistered_provider_has_no_constructor() {
        let registry = CredentialRegistry::new();
        assert!(registry.constructor_for("aws").is_none());
    }
}
