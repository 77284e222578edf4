//! # Collection Validator
//!
//! Validates a heterogeneous collection by routing each item to the item
//! validator registered for its discriminator value, then aggregating the
//! per-item outcomes under the item's original key.
//!
//! ## Run
//!
//! ```text
//! required check ──▶ count check ──▶ empty? ──yes──▶ done
//!                                      │
//!                                      no
//!                                      ▼
//!            ┌──── for each item, in collection order ────┐
//!            │ classify ──▶ execute ──▶ aggregate at key  │
//!            └────────────────────────────────────────────┘
//! ```
//!
//! Classification has three outcomes. An item without the discriminator
//! field, or with a discriminator nobody registered, is either *recorded*
//! (run invalid, message at its key) or *skipped* (contributes nothing),
//! depending on the policy flag for that case. Both paths are explicit.
//!
//! ## Concurrency
//!
//! Registry and policy are read-only during a run and every run returns a
//! fresh [`CollectionReport`], so `validate_collection` can be called from
//! several threads on a shared validator.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use polyset_core::{
    Collection, CollectionError, Item, ItemKey, ItemValidator, MessageTranslator, ValidationGroup,
};

use crate::message::{self, DEFAULT_TEXT_DOMAIN, IS_EMPTY};
use crate::policy::{CollectionPolicy, ValidationGroups};
use crate::registry::ValidatorRegistry;
use crate::report::{CollectionReport, Unrecognized, UnrecognizedReport};

/// Result of classifying one item against the registry.
pub(crate) enum Classification<'a> {
    /// The item has no discriminator field.
    MissingNameKey,
    /// The discriminator has no registered validator.
    MissingFilter(&'a Value),
    /// The item is routed to this validator.
    Matched(&'a Arc<dyn ItemValidator>),
}

/// What the run does with an item that could not be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Invalidate the run and record a message at the item's key.
    Record,
    /// Leave the item out of every aggregation.
    Skip,
}

impl Disposition {
    fn from_flag(invalid: bool) -> Self {
        if invalid {
            Self::Record
        } else {
            Self::Skip
        }
    }
}

/// Validates heterogeneous collections by discriminator.
pub struct CollectionValidator {
    discriminator: String,
    registry: ValidatorRegistry,
    policy: CollectionPolicy,
    validation_groups: Option<ValidationGroups>,
    translator: Option<Arc<dyn MessageTranslator>>,
    text_domain: String,
    data: Option<Arc<Collection>>,
}

impl CollectionValidator {
    /// A validator reading each item's type from the `discriminator` field.
    pub fn new(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            registry: ValidatorRegistry::new(),
            policy: CollectionPolicy::default(),
            validation_groups: None,
            translator: None,
            text_domain: DEFAULT_TEXT_DOMAIN.to_string(),
            data: None,
        }
    }

    /// Use `registry` for classification.
    pub fn with_registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Apply `policy` to every run.
    pub fn with_policy(mut self, policy: CollectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Restrict each item's validation to the group configured for its key.
    pub fn with_validation_groups(mut self, groups: ValidationGroups) -> Self {
        self.validation_groups = Some(groups);
        self
    }

    /// Translate the required-but-empty message with `translator`.
    pub fn with_translator(mut self, translator: Arc<dyn MessageTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Text domain passed to the translator.
    pub fn with_text_domain(mut self, text_domain: impl Into<String>) -> Self {
        self.text_domain = text_domain.into();
        self
    }

    /// The discriminator field name.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// The validator registry.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for registering validators.
    pub fn registry_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.registry
    }

    /// The policy flags.
    pub fn policy(&self) -> &CollectionPolicy {
        &self.policy
    }

    /// Mutable access to the policy flags.
    pub fn policy_mut(&mut self) -> &mut CollectionPolicy {
        &mut self.policy
    }

    /// Configured validation groups, if any.
    pub fn validation_groups(&self) -> Option<&ValidationGroups> {
        self.validation_groups.as_ref()
    }

    /// Accept `data` as the collection for [`validate`](Self::validate) and
    /// [`list_unrecognized`](Self::list_unrecognized).
    ///
    /// # Errors
    ///
    /// [`CollectionError::InvalidCollectionType`] or
    /// [`CollectionError::InvalidItemType`]. On error the previously
    /// accepted collection is kept.
    pub fn set_data(&mut self, data: Value) -> Result<(), CollectionError> {
        let collection = Collection::from_value(data)?;
        self.data = Some(Arc::new(collection));
        Ok(())
    }

    /// Accept an already-built collection. Shared, never copied.
    pub fn set_collection(&mut self, collection: impl Into<Arc<Collection>>) {
        self.data = Some(collection.into());
    }

    /// The accepted collection, if any.
    pub fn data(&self) -> Option<&Arc<Collection>> {
        self.data.as_ref()
    }

    /// Validate the accepted collection. Without accepted data this
    /// validates an empty collection.
    ///
    /// # Errors
    ///
    /// See [`validate_collection`](Self::validate_collection).
    pub fn validate(&self) -> Result<CollectionReport, CollectionError> {
        match &self.data {
            Some(collection) => self.validate_collection(collection),
            None => self.validate_collection(&Collection::new()),
        }
    }

    /// Validate `collection` and return the aggregated report.
    ///
    /// # Errors
    ///
    /// [`CollectionError::MissingValidationGroup`] if validation groups are
    /// configured and a routed item has none. Validation failures are
    /// reported through the returned report, never as errors.
    pub fn validate_collection(
        &self,
        collection: &Collection,
    ) -> Result<CollectionReport, CollectionError> {
        let mut report = CollectionReport::default();
        let actual = collection.len();
        let expected = self.policy.effective_count(actual);

        debug!(
            discriminator = %self.discriminator,
            items = actual,
            expected,
            "validating collection"
        );

        if self.policy.required && expected < 1 {
            report.valid = false;
            report.collection_messages.insert(
                IS_EMPTY.to_string(),
                Value::String(message::required_empty_message(
                    self.translator.as_deref(),
                    &self.text_domain,
                )),
            );
        }

        // Silent: no message accompanies a short collection.
        if actual < expected {
            report.valid = false;
        }

        if collection.is_empty() {
            report.clear_values();
            report.clear_raw_values();
            debug!(valid = report.valid, "empty collection");
            return Ok(report);
        }

        for (key, item) in collection.iter() {
            let validator = match self.classify(item) {
                Classification::Matched(validator) => validator,
                Classification::MissingNameKey => {
                    let disposition = Disposition::from_flag(self.policy.name_key_missing_invalid);
                    trace!(%key, ?disposition, "item has no discriminator field");
                    if disposition == Disposition::Record {
                        report.valid = false;
                        report
                            .messages
                            .insert(key.clone(), message::missing_name_key(&self.discriminator));
                    }
                    continue;
                }
                Classification::MissingFilter(value) => {
                    let disposition = Disposition::from_flag(self.policy.filter_missing_invalid);
                    trace!(%key, %value, ?disposition, "no validator for discriminator");
                    if disposition == Disposition::Record {
                        report.valid = false;
                        report.messages.insert(
                            key.clone(),
                            message::missing_filter(&self.discriminator, value),
                        );
                    }
                    continue;
                }
            };

            let group = self.group_for(key)?;
            let outcome = validator.validate(item, group);
            trace!(%key, valid = outcome.valid, "item validated");

            if !outcome.valid {
                report.valid = false;
                report.messages.insert(key.clone(), outcome.messages);
                report.invalid_input.insert(key.clone(), outcome.invalid_input);
            }
            report.values.insert(key.clone(), outcome.values);
            report.raw_values.insert(key.clone(), outcome.raw_values);
        }

        debug!(valid = report.valid, "collection validated");
        Ok(report)
    }

    /// Report unrecognized fields of the accepted collection.
    ///
    /// # Errors
    ///
    /// [`CollectionError::NoDataPresent`] if no collection was accepted.
    pub fn list_unrecognized(&self) -> Result<UnrecognizedReport, CollectionError> {
        let collection = self.data.as_ref().ok_or(CollectionError::NoDataPresent)?;
        Ok(self.unrecognized_in(collection))
    }

    /// Report unrecognized fields of `collection`, per item.
    ///
    /// Items missing the discriminator or routed nowhere are always listed,
    /// whatever the policy says. Items whose validator knows every field are
    /// omitted.
    pub fn unrecognized_in(&self, collection: &Collection) -> UnrecognizedReport {
        let mut report = UnrecognizedReport::new();
        for (key, item) in collection.iter() {
            let entry = match self.classify(item) {
                Classification::MissingNameKey => Unrecognized::MissingNameKey,
                Classification::MissingFilter(_) => Unrecognized::MissingFilter,
                Classification::Matched(validator) => {
                    let fields = validator.unrecognized_fields(item);
                    if fields.is_empty() {
                        continue;
                    }
                    Unrecognized::Fields(fields)
                }
            };
            report.insert(key.clone(), entry);
        }
        report
    }

    pub(crate) fn classify<'a>(&'a self, item: &'a Item) -> Classification<'a> {
        let Some(value) = item.get(&self.discriminator) else {
            return Classification::MissingNameKey;
        };
        let validator = match value {
            Value::String(s) => self.registry.lookup(s),
            Value::Number(n) => self.registry.lookup(&n.to_string()),
            _ => None,
        };
        match validator {
            Some(validator) => Classification::Matched(validator),
            None => Classification::MissingFilter(value),
        }
    }

    fn group_for(&self, key: &ItemKey) -> Result<Option<&ValidationGroup>, CollectionError> {
        match &self.validation_groups {
            None => Ok(None),
            Some(groups) => groups
                .get(key)
                .map(Some)
                .ok_or_else(|| CollectionError::MissingValidationGroup { key: key.clone() }),
        }
    }
}

impl fmt::Debug for CollectionValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionValidator")
            .field("discriminator", &self.discriminator)
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("validation_groups", &self.validation_groups)
            .field("has_translator", &self.translator.is_some())
            .field("text_domain", &self.text_domain)
            .field("items", &self.data.as_ref().map(|c| c.len()))
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::registry::ValidatorSpec;
    use polyset_core::ItemOutcome;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    /// Valid when `v` is even.
    struct Even;

    impl ItemValidator for Even {
        fn validate(&self, item: &Item, _group: Option<&ValidationGroup>) -> ItemOutcome {
            let mut outcome = ItemOutcome::valid(item.clone(), item.clone());
            if item.get("v").and_then(Value::as_i64).map_or(true, |v| v % 2 != 0) {
                outcome.add_message("v", "notEven", "v must be even");
            }
            outcome
        }

        fn unrecognized_fields(&self, _item: &Item) -> BTreeSet<String> {
            BTreeSet::new()
        }
    }

    fn validator(policy: CollectionPolicy) -> CollectionValidator {
        let mut registry = ValidatorRegistry::new();
        registry.register("even", ValidatorSpec::validator(Even)).unwrap();
        CollectionValidator::new("kind")
            .with_registry(registry)
            .with_policy(policy)
    }

    /// Items that are routed, unmapped, or missing the discriminator.
    fn item() -> impl Strategy<Value = Item> {
        (0u8..3, any::<i16>()).prop_map(|(shape, v)| {
            let mut item = Item::new();
            item.insert("v".to_string(), Value::from(v));
            match shape {
                0 => {
                    item.insert("kind".to_string(), Value::from("even"));
                }
                1 => {
                    item.insert("kind".to_string(), Value::from("odd"));
                }
                _ => {}
            }
            item
        })
    }

    fn sparse_collection() -> impl Strategy<Value = Collection> {
        prop::collection::btree_map(0usize..1000, item(), 0..16)
            .prop_map(|m| Collection::from_items(m.into_iter()))
    }

    fn policy() -> impl Strategy<Value = CollectionPolicy> {
        (any::<bool>(), any::<bool>(), any::<bool>(), prop::option::of(0usize..20)).prop_map(
            |(name_key, filter, required, expected)| CollectionPolicy {
                name_key_missing_invalid: name_key,
                filter_missing_invalid: filter,
                required,
                expected_count: expected,
            },
        )
    }

    proptest! {
        /// Two runs over the same data and policy produce identical reports.
        #[test]
        fn validate_is_idempotent(c in sparse_collection(), p in policy()) {
            let v = validator(p);
            prop_assert_eq!(v.validate_collection(&c).unwrap(), v.validate_collection(&c).unwrap());
        }

        /// Every aggregated key is one of the collection's keys.
        #[test]
        fn keys_are_preserved(c in sparse_collection(), p in policy()) {
            let report = validator(p).validate_collection(&c).unwrap();
            let keys: BTreeSet<&ItemKey> = c.keys().collect();
            for k in report.values().keys()
                .chain(report.raw_values().keys())
                .chain(report.messages().keys())
            {
                prop_assert!(keys.contains(k), "unexpected key {}", k);
            }
        }

        /// Aggregations follow collection order.
        #[test]
        fn report_follows_collection_order(c in sparse_collection(), p in policy()) {
            let report = validator(p).validate_collection(&c).unwrap();
            let order: Vec<&ItemKey> = c.keys().collect();
            let position = |k: &ItemKey| order.iter().position(|o| *o == k);
            let positions: Vec<_> = report.raw_values().keys().map(position).collect();
            let mut sorted = positions.clone();
            sorted.sort();
            prop_assert_eq!(positions, sorted);
        }

        /// Only routed items produce values.
        #[test]
        fn only_routed_items_have_values(c in sparse_collection(), p in policy()) {
            let report = validator(p).validate_collection(&c).unwrap();
            let routed = c.iter()
                .filter(|(_, item)| item.get("kind") == Some(&Value::from("even")))
                .count();
            prop_assert_eq!(report.values().len(), routed);
            prop_assert_eq!(report.raw_values().len(), routed);
        }

        /// An empty collection that is not required is always valid.
        #[test]
        fn empty_not_required_is_valid(
            name_key in any::<bool>(),
            filter in any::<bool>(),
        ) {
            let p = CollectionPolicy::default()
                .name_key_missing_invalid(name_key)
                .filter_missing_invalid(filter);
            let report = validator(p).validate_collection(&Collection::new()).unwrap();
            prop_assert!(report.is_valid());
            prop_assert!(report.values().is_empty());
            prop_assert!(report.raw_values().is_empty());
        }

        /// A collection shorter than the expected count is invalid and the
        /// shortfall itself adds no collection message.
        #[test]
        fn shortfall_always_invalid(c in sparse_collection(), extra in 1usize..5) {
            prop_assume!(!c.is_empty());
            let p = CollectionPolicy::default().expected_count(c.len() + extra);
            let report = validator(p).validate_collection(&c).unwrap();
            prop_assert!(!report.is_valid());
            prop_assert!(report.collection_messages().is_empty());
        }
    }
}
