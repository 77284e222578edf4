//! # Error Types
//!
//! Configuration errors raised by polyset. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Configuration errors are returned at call time and abort the call.
//!   The call leaves previously accepted state untouched.
//! - Validation *failures* (an item violating its rules, a collection that
//!   is required but empty) are never errors. They are reported through the
//!   collection report returned by a validation run.

use thiserror::Error;

use crate::key::ItemKey;

/// Top-level error type for polyset.
#[derive(Error, Debug)]
pub enum PolysetError {
    /// Registering an item validator failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The collection could not be accepted or processed.
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),

    /// A declarative validator configuration was rejected by a factory.
    #[error("factory error: {0}")]
    Factory(#[from] FactoryError),

    /// A collection validator configuration document could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error reading a configuration document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error while registering item validators.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registered object could not be turned into an item validator.
    #[error("invalid validator for discriminator {discriminator:?}: {reason}")]
    InvalidValidatorType {
        /// Discriminator value the validator was registered under.
        discriminator: String,
        /// Why the registration was rejected.
        reason: String,
    },

    /// A bulk registration was keyed by something other than strings.
    #[error("validator mappings must be keyed by discriminator strings, found key {key}")]
    InvalidKeyType {
        /// Description of the offending key.
        key: String,
    },
}

/// Error while accepting or processing a collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The input is not a collection (JSON array or object).
    #[error("expected a collection (array or object), got {found}")]
    InvalidCollectionType {
        /// JSON type name of the rejected input.
        found: &'static str,
    },

    /// An item of the collection is not an associative structure.
    #[error("item at key {key} must be an object, got {found}")]
    InvalidItemType {
        /// Key of the first offending item.
        key: ItemKey,
        /// JSON type name of the offending item.
        found: &'static str,
    },

    /// An operation needed collection data but none was accepted.
    #[error("no collection data present")]
    NoDataPresent,

    /// Validation groups are in use but none was configured for this item.
    #[error("no validation group configured for item at key {key}")]
    MissingValidationGroup {
        /// Key of the item lacking a validation group.
        key: ItemKey,
    },
}

/// Error raised by a `ValidatorFactory` while building an item validator.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// The declarative configuration is malformed.
    #[error("invalid validator config: {0}")]
    InvalidConfig(String),

    /// The configuration is well-formed but could not be compiled.
    #[error("validator build failed: {0}")]
    Build(String),
}

/// Error while loading a collection validator configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be parsed.
    #[error("cannot parse {format} config: {reason}")]
    Parse {
        /// Document format ("json" or "yaml").
        format: &'static str,
        /// Parser error message.
        reason: String,
    },

    /// The document has top-level keys no setting is named after.
    #[error("unknown {format} config keys: {}", keys.join(", "))]
    UnknownKeys {
        /// Document format ("json" or "yaml").
        format: &'static str,
        /// The unrecognized keys, sorted.
        keys: Vec<String>,
    },

    /// A validator declared in the document could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Returns the JSON type name of a value, used in error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
