//! # polyset-collection: Heterogeneous Collection Validation
//!
//! Validates collections whose items carry their own type. Each item names
//! its type in a discriminator field; the [`CollectionValidator`] looks that
//! value up in a [`ValidatorRegistry`], runs the matching item validator,
//! and aggregates the per-item outcomes into a [`CollectionReport`] keyed by
//! the items' original keys.
//!
//! ```text
//! [{type: "a", v: 1}, {type: "b", v: -1}]
//!        │                   │
//!   registry["a"]       registry["b"]
//!        ▼                   ▼
//!   values[0] = {v: 1}  messages[1] = {v: {...}}
//! ```
//!
//! ## Edge Cases
//!
//! Three situations are governed by [`CollectionPolicy`]: an item without
//! the discriminator field, a discriminator with no registered validator,
//! and a collection that is required but empty (or shorter than an
//! expected count).
//!
//! ## Errors
//!
//! Configuration problems (a rejected registration, malformed input, a
//! missing validation group) are `Err` values from `polyset_core::error`.
//! Validation failures are not errors: they are recorded in the report.

pub mod config;
pub mod message;
pub mod policy;
pub mod registry;
pub mod report;
pub mod validator;

pub use config::CollectionValidatorConfig;
pub use message::{IS_EMPTY, MISSING_FILTER, MISSING_NAME_KEY};
pub use policy::{CollectionPolicy, ValidationGroups};
pub use registry::{ValidatorRegistry, ValidatorSpec};
pub use report::{CollectionReport, Unrecognized, UnrecognizedReport};
pub use validator::CollectionValidator;
