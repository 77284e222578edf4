//! # Declarative Configuration
//!
//! A whole collection validator described as a JSON or YAML document:
//!
//! ```yaml
//! discriminator: type
//! required: true
//! filter_missing_invalid: true
//! validators:
//!   address:
//!     schema: { type: object, properties: { street: { type: string } } }
//!   phone:
//!     schema: { type: object, required: [number] }
//! ```
//!
//! Policy flags sit at the top level next to `discriminator`. Each entry of
//! `validators` is a declarative configuration handed to the
//! [`ValidatorFactory`] given to [`CollectionValidatorConfig::build`].
//! A top-level key that names no setting rejects the whole document.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use polyset_core::{ConfigError, PolysetError, ValidatorFactory};

use crate::policy::{CollectionPolicy, ValidationGroups};
use crate::registry::ValidatorRegistry;
use crate::validator::CollectionValidator;

/// Configuration document for a [`CollectionValidator`].
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionValidatorConfig {
    /// Field holding each item's type.
    pub discriminator: String,
    /// Policy flags.
    #[serde(flatten)]
    pub policy: CollectionPolicy,
    /// Discriminator value to declarative validator configuration.
    #[serde(default = "empty_mapping")]
    pub validators: Value,
    /// Per-item validation groups.
    #[serde(default)]
    pub validation_groups: Option<ValidationGroups>,
    /// Text domain for translated messages.
    #[serde(default)]
    pub text_domain: Option<String>,
    /// Keys left over after every setting took its own.
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

fn empty_mapping() -> Value {
    Value::Object(serde_json::Map::new())
}

impl CollectionValidatorConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse {
            format: "json",
            reason: e.to_string(),
        })?;
        config.reject_unknown("json")
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s).map_err(|e| ConfigError::Parse {
            format: "yaml",
            reason: e.to_string(),
        })?;
        config.reject_unknown("yaml")
    }

    /// Read a document from disk. Files ending in `.json` are parsed as
    /// JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// [`PolysetError::Io`] if the file cannot be read,
    /// [`PolysetError::Config`] if it does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolysetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "loading collection validator config");
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        Ok(config)
    }

    fn reject_unknown(self, format: &'static str) -> Result<Self, ConfigError> {
        if self.unknown.is_empty() {
            return Ok(self);
        }
        Err(ConfigError::UnknownKeys {
            format,
            keys: self.unknown.into_keys().collect(),
        })
    }

    /// Build the collection validator, registering every declared
    /// validator through `factory`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Registry`] if the `validators` mapping is not keyed by
    /// strings or any entry is rejected by the factory.
    pub fn build(
        self,
        factory: Arc<dyn ValidatorFactory>,
    ) -> Result<CollectionValidator, ConfigError> {
        let mut registry = ValidatorRegistry::with_factory(factory);
        registry.register_mapping(&self.validators)?;

        let mut validator = CollectionValidator::new(self.discriminator)
            .with_registry(registry)
            .with_policy(self.policy);
        if let Some(groups) = self.validation_groups {
            validator = validator.with_validation_groups(groups);
        }
        if let Some(text_domain) = self.text_domain {
            validator = validator.with_text_domain(text_domain);
        }
        Ok(validator)
    }
}
