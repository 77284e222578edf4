//! # Schema Item Validator
//!
//! An [`ItemValidator`] backed by a compiled JSON Schema (Draft 2020-12).
//!
//! ## Mapping Schema Results onto Item Outcomes
//!
//! - Violations are grouped by the top-level field they concern and keyed
//!   by the schema keyword that failed: `{"v": {"minimum": "..."}}`.
//!   `required` and `additionalProperties` failures are attributed to the
//!   missing or unexpected property. Violations not attributable to a
//!   field are grouped under the empty field name.
//! - Sanitized values keep only the fields declared under `properties`.
//!   A schema without `properties` keeps every field.
//! - Unrecognized fields are the item's fields not declared under
//!   `properties`. A schema without `properties` recognizes everything.
//! - A validation group restricts both the reported violations and the
//!   sanitized values to the listed fields.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use thiserror::Error;

use polyset_core::{FactoryError, Item, ItemOutcome, ItemValidator, ValidationGroup};

use crate::retriever::LocalSchemaRetriever;

/// Field name used for violations that concern the item as a whole.
pub const ROOT_FIELD: &str = "";

/// Error while compiling a schema into an item validator.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema is not a JSON object or boolean.
    #[error("schema must be an object or a boolean, got {0}")]
    NotASchema(&'static str),

    /// The schema could not be compiled.
    #[error("schema compile error: {reason}")]
    Compile {
        /// Compiler error message.
        reason: String,
    },
}

impl From<SchemaError> for FactoryError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::NotASchema(_) => FactoryError::InvalidConfig(e.to_string()),
            SchemaError::Compile { .. } => FactoryError::Build(e.to_string()),
        }
    }
}

/// A single schema violation, attributed to a top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Top-level field concerned, or [`ROOT_FIELD`].
    pub field: String,
    /// Schema keyword that failed (`minimum`, `required`, ...).
    pub keyword: String,
    /// JSON Pointer path to the violating value in the item.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "(root) [{}]: {}", self.keyword, self.message)
        } else {
            write!(f, "{} [{}]: {}", self.field, self.keyword, self.message)
        }
    }
}

/// Item validator backed by a compiled JSON Schema.
pub struct SchemaItemValidator {
    validator: Validator,
    properties: Option<BTreeSet<String>>,
}

impl SchemaItemValidator {
    /// Compile `schema` with no cross-schema references available.
    ///
    /// # Errors
    ///
    /// [`SchemaError`] if the schema is malformed or references an unknown
    /// schema.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        Self::compile(schema, LocalSchemaRetriever::default())
    }

    pub(crate) fn with_shared(
        schema: &Value,
        shared: &HashMap<String, Value>,
    ) -> Result<Self, SchemaError> {
        Self::compile(schema, LocalSchemaRetriever::new(shared.clone()))
    }

    fn compile(schema: &Value, retriever: LocalSchemaRetriever) -> Result<Self, SchemaError> {
        if !(schema.is_object() || schema.is_boolean()) {
            return Err(SchemaError::NotASchema(json_type(schema)));
        }

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(retriever)
            .build(schema)
            .map_err(|e| SchemaError::Compile {
                reason: e.to_string(),
            })?;

        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect());

        Ok(Self {
            validator,
            properties,
        })
    }

    /// Properties declared by the schema, if it declares any.
    pub fn declared_properties(&self) -> Option<&BTreeSet<String>> {
        self.properties.as_ref()
    }

    /// All violations of `item`, in schema evaluation order.
    pub fn violations(&self, item: &Item) -> Vec<Violation> {
        let instance = Value::Object(item.clone());
        self.validator
            .iter_errors(&instance)
            .flat_map(|e| attribute(&e))
            .collect()
    }

    fn sanitize(&self, item: &Item, group: Option<&ValidationGroup>) -> Item {
        item.iter()
            .filter(|(field, _)| {
                self.properties
                    .as_ref()
                    .map_or(true, |props| props.contains(*field))
            })
            .filter(|(field, _)| in_group(group, field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}

impl ItemValidator for SchemaItemValidator {
    fn validate(&self, item: &Item, group: Option<&ValidationGroup>) -> ItemOutcome {
        let mut outcome = ItemOutcome::valid(self.sanitize(item, group), item.clone());

        for violation in self.violations(item) {
            if !in_group(group, &violation.field) {
                continue;
            }
            if let Some(raw) = item.get(&violation.field) {
                outcome
                    .invalid_input
                    .insert(violation.field.clone(), raw.clone());
            }
            outcome.add_message(&violation.field, &violation.keyword, violation.message);
        }

        outcome
    }

    fn unrecognized_fields(&self, item: &Item) -> BTreeSet<String> {
        match &self.properties {
            Some(props) => item
                .keys()
                .filter(|field| !props.contains(*field))
                .cloned()
                .collect(),
            None => BTreeSet::new(),
        }
    }
}

impl fmt::Debug for SchemaItemValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaItemValidator")
            .field("properties", &self.properties)
            .finish()
    }
}

fn in_group(group: Option<&ValidationGroup>, field: &str) -> bool {
    group.map_or(true, |fields| fields.iter().any(|f| f == field))
}

/// Split one schema error into per-field violations.
fn attribute(error: &ValidationError<'_>) -> Vec<Violation> {
    let instance_path = error.instance_path.to_string();
    let schema_path = error.schema_path.to_string();
    let keyword = schema_path
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    let message = error.to_string();

    let fields: Vec<String> = match &error.kind {
        ValidationErrorKind::Required { property } if instance_path.is_empty() => {
            vec![property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string())]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } if instance_path.is_empty() => {
            unexpected.clone()
        }
        _ => vec![top_level_field(&instance_path)],
    };

    fields
        .into_iter()
        .map(|field| Violation {
            field,
            keyword: keyword.clone(),
            instance_path: instance_path.clone(),
            message: message.clone(),
        })
        .collect()
}

/// First segment of a JSON Pointer, unescaped. Empty for the root.
fn top_level_field(pointer: &str) -> String {
    pointer
        .strip_prefix('/')
        .and_then(|rest| rest.split('/').next())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .unwrap_or_else(|| ROOT_FIELD.to_string())
}

fn json_type(value: &Value) -> &'static str {
    polyset_core::error::json_type_name(value)
}
