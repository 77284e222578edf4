//! # Schema Validator Factory
//!
//! Builds [`SchemaItemValidator`]s from declarative configurations of the
//! form `{"schema": <JSON Schema>}`. Shared schemas registered with
//! [`SchemaValidatorFactory::with_schema`] are available to every compiled
//! schema through `$ref`.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use polyset_core::{FactoryError, ItemValidator, ValidatorFactory};

use crate::item::{SchemaError, SchemaItemValidator};

/// Configuration key holding the item schema.
pub const SCHEMA_KEY: &str = "schema";

/// Factory compiling JSON Schemas into item validators.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidatorFactory {
    shared: HashMap<String, Value>,
}

impl SchemaValidatorFactory {
    /// A factory with no shared schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `schema` resolvable through `$ref` by its full `uri` or by the
    /// URI's last path segment.
    pub fn with_schema(mut self, uri: impl Into<String>, schema: Value) -> Self {
        let uri = uri.into();
        if let Some(filename) = uri.rsplit('/').next() {
            if filename != uri && !filename.is_empty() {
                self.shared.insert(filename.to_string(), schema.clone());
            }
        }
        self.shared.insert(uri, schema);
        self
    }

    /// Number of registered shared schemas, counting every alias.
    pub fn shared_len(&self) -> usize {
        self.shared.len()
    }

    /// Compile `schema` against the shared schemas.
    ///
    /// # Errors
    ///
    /// [`SchemaError`] if the schema is malformed or references a schema
    /// that is not registered.
    pub fn build(&self, schema: &Value) -> Result<SchemaItemValidator, SchemaError> {
        SchemaItemValidator::with_shared(schema, &self.shared)
    }
}

impl ValidatorFactory for SchemaValidatorFactory {
    fn create(&self, config: &Value) -> Result<Arc<dyn ItemValidator>, FactoryError> {
        let schema = config.get(SCHEMA_KEY).ok_or_else(|| {
            FactoryError::InvalidConfig(format!("missing \"{SCHEMA_KEY}\" key"))
        })?;
        let validator = self.build(schema)?;
        debug!(
            properties = ?validator.declared_properties(),
            "compiled schema item validator"
        );
        Ok(Arc::new(validator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyset_core::Item;
    use serde_json::json;

    fn item(v: Value) -> Item {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_from_config() {
        let factory = SchemaValidatorFactory::new();
        let validator = factory
            .create(&json!({"schema": {"type": "object", "properties": {"v": {"type": "integer"}}}}))
            .unwrap();
        assert!(validator.validate(&item(json!({"v": 1})), None).valid);
        assert!(!validator.validate(&item(json!({"v": "one"})), None).valid);
    }

    #[test]
    fn test_missing_schema_key() {
        let err = SchemaValidatorFactory::new()
            .create(&json!({"type": "object"}))
            .err()
            .expect("config without a schema is rejected");
        assert!(matches!(err, FactoryError::InvalidConfig(_)));
        assert!(err.to_string().contains("schema"));
    }

    #[test]
    fn test_non_object_schema_is_invalid_config() {
        let err = SchemaValidatorFactory::new()
            .create(&json!({"schema": [1, 2]}))
            .err()
            .expect("array schema is rejected");
        assert!(matches!(err, FactoryError::InvalidConfig(_)));
    }

    #[test]
    fn test_compile_failure_is_build_error() {
        let err = SchemaValidatorFactory::new()
            .create(&json!({"schema": {"minimum": "zero"}}))
            .err()
            .expect("malformed schema is rejected");
        assert!(matches!(err, FactoryError::Build(_)));
    }

    #[test]
    fn test_shared_schema_resolves_by_uri_and_filename() {
        let positive = json!({"type": "integer", "minimum": 1});
        let factory = SchemaValidatorFactory::new()
            .with_schema("https://polyset.invalid/schemas/positive.schema.json", positive);
        assert_eq!(factory.shared_len(), 2);

        let by_uri = factory
            .build(&json!({
                "type": "object",
                "properties": {
                    "n": {"$ref": "https://polyset.invalid/schemas/positive.schema.json"}
                }
            }))
            .unwrap();
        assert!(by_uri.validate(&item(json!({"n": 3})), None).valid);

        let outcome = by_uri.validate(&item(json!({"n": 0})), None);
        assert!(!outcome.valid);
        assert!(outcome.messages.contains_key("n"));
    }

    #[test]
    fn test_bare_name_registers_once() {
        let factory = SchemaValidatorFactory::new().with_schema("positive", json!({"minimum": 1}));
        assert_eq!(factory.shared_len(), 1);
    }
}
