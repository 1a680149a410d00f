//! Named, typed, unit-tagged field storage.
//!
//! This module is the model-side half of the exchange:
//!
//! - [`FieldLayout`] / [`FieldTag`]: dimension tags, extents, grid
//!   validation, packing-aware sizing
//! - [`Unit`]: SI dimension tags
//! - [`Field`] / [`FieldIntent`]: the storage block plus producer intent
//! - [`FieldCatalog`]: the name → field registry the coupling layer
//!   validates against
//!
//! The coupling registries only ever ask a catalog whether a name exists,
//! whether it is allocated, and how its columns are laid out; the exchange
//! engines read and write field data through it.

mod catalog;
mod error;
mod field;
mod layout;
mod units;

pub use catalog::{FieldCatalog, FieldId};
pub use error::FieldError;
pub use field::{Field, FieldIntent};
pub use layout::{FieldLayout, FieldTag};
pub use units::Unit;
