//! # polyset-core: Foundational Types
//!
//! Types shared by every polyset crate. A heterogeneous collection is an
//! ordered set of items whose validator is chosen by a discriminator field
//! inside each item; this crate defines the vocabulary for that:
//!
//! - [`ItemKey`] and [`Collection`]: the accepted, keyed form of the input.
//!   Acceptance is atomic: one malformed item rejects the whole input.
//! - [`KeyedMap`]: insertion-ordered map by item key, used for collections
//!   and per-item aggregations.
//! - [`ItemOutcome`]: what one item validator reports for one item.
//! - [`ItemValidator`], [`ValidatorFactory`], [`MessageTranslator`]: the
//!   capability traits of the external collaborators.
//! - [`error`]: the configuration error taxonomy. Validation failures are
//!   never errors; they are reported through outcomes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `polyset-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod collection;
pub mod error;
pub mod key;
pub mod keyed;
pub mod outcome;
pub mod traits;

pub use collection::{Collection, Item};
pub use error::{CollectionError, ConfigError, FactoryError, PolysetError, RegistryError};
pub use key::ItemKey;
pub use keyed::KeyedMap;
pub use outcome::ItemOutcome;
pub use traits::{ItemValidator, MessageTranslator, ValidationGroup, ValidatorFactory};
