//! Local `$ref` resolution.
//!
//! Schemas compiled by this crate never touch the network. Cross-schema
//! `$ref` URIs resolve against schemas registered in memory, by full URI
//! or by the URI's last path segment; anything else fails compilation.

use std::collections::HashMap;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

/// Resolves `$ref` URIs to schemas held in memory.
#[derive(Debug, Clone, Default)]
pub(crate) struct LocalSchemaRetriever {
    /// Map from URI (or bare file name) to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl LocalSchemaRetriever {
    pub(crate) fn new(schemas_by_uri: HashMap<String, Value>) -> Self {
        Self { schemas_by_uri }
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Err(format!("schema {uri_str} is not registered; remote references are not fetched").into())
    }
}
