//! # Capability Traits
//!
//! The external collaborators of a collection validator, expressed as
//! traits. A type that implements [`ItemValidator`] can be registered under
//! a discriminator value; conformance is checked by the compiler rather
//! than by inspecting objects at registration time.
//!
//! All traits require `Send + Sync` so that a configured collection
//! validator can be shared across threads. Implementations must not keep
//! per-call state: every call receives the item it works on.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use crate::collection::Item;
use crate::error::FactoryError;
use crate::outcome::ItemOutcome;

/// Field names an item validator should restrict itself to.
pub type ValidationGroup = Vec<String>;

/// Validates one collection item.
pub trait ItemValidator: Send + Sync {
    /// Validate `item`, optionally restricted to the fields in `group`.
    fn validate(&self, item: &Item, group: Option<&ValidationGroup>) -> ItemOutcome;

    /// Names of the fields of `item` this validator does not know about.
    fn unrecognized_fields(&self, item: &Item) -> BTreeSet<String>;
}

/// Builds item validators from declarative configuration.
pub trait ValidatorFactory: Send + Sync {
    /// Construct an item validator from `config`.
    fn create(&self, config: &Value) -> Result<Arc<dyn ItemValidator>, FactoryError>;
}

/// Renders message templates in a text domain.
pub trait MessageTranslator: Send + Sync {
    /// Translate `template` within `text_domain`.
    fn translate(&self, template: &str, text_domain: &str) -> String;
}

impl<T: ItemValidator + ?Sized> ItemValidator for Arc<T> {
    fn validate(&self, item: &Item, group: Option<&ValidationGroup>) -> ItemOutcome {
        (**self).validate(item, group)
    }

    fn unrecognized_fields(&self, item: &Item) -> BTreeSet<String> {
        (**self).unrecognized_fields(item)
    }
}
