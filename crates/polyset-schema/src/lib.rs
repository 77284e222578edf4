//! # polyset-schema: JSON Schema Item Validators
//!
//! Declarative item validation for polyset collections. A JSON Schema
//! (Draft 2020-12) is compiled once into a [`SchemaItemValidator`], which
//! then serves as the item validator for one discriminator value.
//!
//! [`SchemaValidatorFactory`] is the [`polyset_core::ValidatorFactory`]
//! for configurations of the form `{"schema": {...}}`, so a whole
//! collection validator can be described in a configuration document.
//!
//! ## Crate Policy
//!
//! - Depends only on `polyset-core` internally.
//! - `$ref` never reaches the network: only schemas registered with the
//!   factory resolve.

pub mod factory;
pub mod item;
mod retriever;

pub use factory::{SchemaValidatorFactory, SCHEMA_KEY};
pub use item::{SchemaError, SchemaItemValidator, Violation, ROOT_FIELD};
