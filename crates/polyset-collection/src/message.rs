//! # Messages
//!
//! Failure codes and message rendering for conditions the collection
//! validator reports itself. Item-level rule messages come from the item
//! validators and are passed through untouched.

use serde_json::Value;

use polyset_core::{Item, MessageTranslator};

/// Collection-level code: the collection is required but empty.
pub const IS_EMPTY: &str = "isEmpty";

/// Untranslated template for [`IS_EMPTY`].
pub const IS_EMPTY_TEMPLATE: &str = "Value is required and can't be empty";

/// Text domain used when none is configured.
pub const DEFAULT_TEXT_DOMAIN: &str = "default";

/// Item-level code: the item has no discriminator field.
pub const MISSING_NAME_KEY: &str = "missingNameKey";

/// Item-level code: no validator is registered for the item's discriminator.
pub const MISSING_FILTER: &str = "missingFilter";

/// Render the required-but-empty message, translated when a translator
/// is available.
pub fn required_empty_message(
    translator: Option<&dyn MessageTranslator>,
    text_domain: &str,
) -> String {
    match translator {
        Some(translator) => translator.translate(IS_EMPTY_TEMPLATE, text_domain),
        None => IS_EMPTY_TEMPLATE.to_string(),
    }
}

pub(crate) fn missing_name_key(field: &str) -> Item {
    single(
        MISSING_NAME_KEY,
        format!("Item is missing discriminator field \"{field}\""),
    )
}

pub(crate) fn missing_filter(field: &str, discriminator: &Value) -> Item {
    single(
        MISSING_FILTER,
        format!("No validator registered for {field} {discriminator}"),
    )
}

fn single(code: &str, message: String) -> Item {
    let mut item = Item::new();
    item.insert(code.to_string(), Value::String(message));
    item
}
