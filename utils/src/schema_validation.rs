use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::Value;

static CREDENTIALS_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema_yaml_value: serde_yaml::Value = serde_yaml::from_str(CREDENTIALS_SCHEMA_MANIFEST)
        .expect("credentials schema manifest is valid yaml");
    let schema_json_value =
        serde_json::to_value(&schema_yaml_value).expect("credentials schema converts to json");

    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema_json_value)
        .expect("Invalid JSON Schema")
});

/// Validate a serialized credentials mapping before it is persisted. An empty
/// mapping, an empty group list, or a group carrying neither `admin` nor
/// `users` all fail.
pub fn validate_credentials(payload: &Value) -> Result<(), anyhow::Error> {
    match CREDENTIALS_SCHEMA.validate(payload) {
        Ok(()) => Ok(()),
        Err(errors) => {
            let messages: Vec<String> = errors.map(|error| error.to_string()).collect();
            Err(anyhow::anyhow!(messages.join("; ")))
        }
    }
}

const CREDENTIALS_SCHEMA_MANIFEST: &str = r#"
type: object
minProperties: 1
additionalProperties:
  type: array
  minItems: 1
  items:
    type: object
    properties:
      admin:
        type: object
      users:
        type: array
        items:
          type: object
    additionalProperties: false
    anyOf:
      - required:
          - admin
      - required:
          - users
"#;
