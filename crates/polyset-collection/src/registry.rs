//! # Validator Registry
//!
//! Maps discriminator values to item validators. A registration is either
//! a ready validator handle or a declarative configuration, which the
//! registry's [`ValidatorFactory`] turns into a validator at registration
//! time. Registration fails fast; nothing is deferred to validation time.
//!
//! Bulk registrations are all-or-nothing: every entry is resolved before
//! any entry is inserted, so a rejected entry leaves the registry as it was.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use polyset_core::error::json_type_name;
use polyset_core::{ItemValidator, RegistryError, ValidatorFactory};

/// What can be registered under a discriminator value.
#[derive(Clone)]
pub enum ValidatorSpec {
    /// A ready item validator.
    Validator(Arc<dyn ItemValidator>),
    /// A declarative configuration for the registry's factory.
    Config(Value),
}

impl ValidatorSpec {
    /// Wrap a concrete item validator.
    pub fn validator(validator: impl ItemValidator + 'static) -> Self {
        Self::Validator(Arc::new(validator))
    }
}

impl From<Arc<dyn ItemValidator>> for ValidatorSpec {
    fn from(validator: Arc<dyn ItemValidator>) -> Self {
        Self::Validator(validator)
    }
}

impl From<Value> for ValidatorSpec {
    fn from(config: Value) -> Self {
        Self::Config(config)
    }
}

impl fmt::Debug for ValidatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validator(_) => f.write_str("Validator(..)"),
            Self::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

/// Discriminator value to item validator mapping.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn ItemValidator>>,
    factory: Option<Arc<dyn ValidatorFactory>>,
}

impl ValidatorRegistry {
    /// An empty registry without a factory. Only ready validators can be
    /// registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry that builds declarative registrations with `factory`.
    pub fn with_factory(factory: Arc<dyn ValidatorFactory>) -> Self {
        Self {
            validators: HashMap::new(),
            factory: Some(factory),
        }
    }

    /// Install or replace the factory used for declarative registrations.
    pub fn set_factory(&mut self, factory: Arc<dyn ValidatorFactory>) {
        self.factory = Some(factory);
    }

    /// Register a validator under `discriminator`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidValidatorType`] if `spec` is a configuration
    /// that is not a JSON object, no factory is installed, or the factory
    /// rejects it.
    pub fn register(
        &mut self,
        discriminator: impl Into<String>,
        spec: impl Into<ValidatorSpec>,
    ) -> Result<(), RegistryError> {
        let discriminator = discriminator.into();
        let validator = self.resolve(&discriminator, spec.into())?;
        self.validators.insert(discriminator, validator);
        Ok(())
    }

    /// Register every entry, or none of them.
    ///
    /// # Errors
    ///
    /// The first [`RegistryError`] raised while resolving an entry.
    pub fn register_all<I, K, S>(&mut self, entries: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<ValidatorSpec>,
    {
        let resolved = entries
            .into_iter()
            .map(|(discriminator, spec)| {
                let discriminator = discriminator.into();
                let validator = self.resolve(&discriminator, spec.into())?;
                Ok((discriminator, validator))
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        self.validators.extend(resolved);
        Ok(())
    }

    /// Register every entry of an untyped mapping of discriminator to
    /// declarative configuration, or none of them.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidKeyType`] if `mapping` is not keyed by
    ///   strings (a non-empty array, or a scalar).
    /// - [`RegistryError::InvalidValidatorType`] if any configuration is
    ///   rejected.
    pub fn register_mapping(&mut self, mapping: &Value) -> Result<(), RegistryError> {
        match mapping {
            Value::Object(entries) => self.register_all(
                entries
                    .iter()
                    .map(|(discriminator, config)| (discriminator.clone(), config.clone())),
            ),
            Value::Array(items) if items.is_empty() => Ok(()),
            Value::Array(_) => Err(RegistryError::InvalidKeyType {
                key: "0 (array index)".to_string(),
            }),
            other => Err(RegistryError::InvalidKeyType {
                key: format!("<none: mapping is a {}>", json_type_name(other)),
            }),
        }
    }

    /// Look up the validator registered under `discriminator`.
    pub fn lookup(&self, discriminator: &str) -> Option<&Arc<dyn ItemValidator>> {
        self.validators.get(discriminator)
    }

    /// Whether a validator is registered under `discriminator`.
    pub fn contains(&self, discriminator: &str) -> bool {
        self.validators.contains_key(discriminator)
    }

    /// Number of registered discriminators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Registered discriminator values, sorted.
    pub fn discriminators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    fn resolve(
        &self,
        discriminator: &str,
        spec: ValidatorSpec,
    ) -> Result<Arc<dyn ItemValidator>, RegistryError> {
        let config = match spec {
            ValidatorSpec::Validator(validator) => return Ok(validator),
            ValidatorSpec::Config(config) => config,
        };

        if !config.is_object() {
            return Err(RegistryError::InvalidValidatorType {
                discriminator: discriminator.to_string(),
                reason: format!(
                    "expected an item validator or a configuration object, got {}",
                    json_type_name(&config)
                ),
            });
        }

        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| RegistryError::InvalidValidatorType {
                discriminator: discriminator.to_string(),
                reason: "no validator factory configured for declarative validators".to_string(),
            })?;

        factory.create(&config).map_err(|e| {
            warn!(discriminator, error = %e, "validator factory rejected configuration");
            RegistryError::InvalidValidatorType {
                discriminator: discriminator.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("discriminators", &self.discriminators())
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}
