//! Strongly-typed domain types for safer APIs.
//!
//! This module provides index newtypes to make APIs self-documenting and
//! prevent parameter mix-ups between the four index spaces this crate deals
//! with: grid columns, coupler slots, vertical levels, and vector components.
//!
//! All newtypes are `#[repr(transparent)]` wrappers around `usize`.
//!
//! # Example
//!
//! ```
//! use surface_coupling::types::{ColumnIndex, SlotIndex};
//!
//! let col = ColumnIndex::new(3);
//! let slot = SlotIndex::new(7);
//!
//! // A column index cannot be passed where a slot index is expected.
//! assert_eq!(col.get(), 3);
//! assert_eq!(slot.get(), 7);
//! ```

mod indices;

pub use indices::{ColumnIndex, ComponentIndex, LevelIndex, SlotIndex};
