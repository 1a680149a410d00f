//! Error types for registration and exchange.
//!
//! Every variant is detected synchronously at the call that introduces it
//! and is fatal to setup: there is no partial registration, no truncation,
//! and no degraded mode. The surrounding driver decides whether a failure
//! aborts the run.

use thiserror::Error;

use crate::field::FieldError;
use crate::types::SlotIndex;

use super::registry::ExchangeDirection;

/// Errors from coupling registration and per-step exchange.
#[derive(Error, Debug)]
pub enum CouplingError {
    /// Capacity declared a second time.
    #[error("{direction} registry is already open with capacity {capacity}")]
    AlreadyOpen {
        direction: ExchangeDirection,
        capacity: usize,
    },

    /// Operation needs an open registry but capacity was never declared.
    #[error("{direction} registry is not open; declare capacity first")]
    NotOpen { direction: ExchangeDirection },

    /// Operation needs an open registry but registration already closed.
    #[error("{direction} registry is already closed")]
    AlreadyClosed { direction: ExchangeDirection },

    /// Exchange attempted while registration is still possible.
    #[error("{direction} pass requires a closed registry")]
    RegistryNotClosed { direction: ExchangeDirection },

    /// Coupler declared a different column count than the grid owns.
    #[error("coupler declared {declared} columns but grid '{grid}' has {expected}")]
    ColumnMismatch {
        declared: usize,
        expected: usize,
        grid: String,
    },

    /// Every declared slot already carries a registration.
    #[error("{direction} capacity exhausted: all {capacity} slots are registered")]
    CapacityExhausted {
        direction: ExchangeDirection,
        capacity: usize,
    },

    /// Slot index at or beyond the declared capacity.
    #[error("slot {slot} is out of range for {direction} capacity {capacity}")]
    SlotOutOfRange {
        slot: SlotIndex,
        direction: ExchangeDirection,
        capacity: usize,
    },

    /// No field with this name exists.
    #[error("cannot register unknown field '{name}'")]
    UnknownField { name: String },

    /// Field exists but has no storage yet.
    #[error("field '{name}' is not allocated; allocate before registering")]
    FieldNotAllocated { name: String },

    /// Slot already registered in this direction.
    #[error("slot {slot} is already registered to field '{existing}'")]
    DuplicateSlot { slot: SlotIndex, existing: String },

    /// Requested vector component does not exist in the field's layout.
    #[error("component {component} out of range for field '{name}' with {count} component(s)")]
    ComponentOutOfRange {
        name: String,
        component: usize,
        count: usize,
    },

    /// Descriptor would address past the end of the field's allocation.
    #[error(
        "descriptor for '{name}' spans {required} elements but the field \
         allocates only {len}"
    )]
    SpanOutOfBounds {
        name: String,
        required: usize,
        len: usize,
    },

    /// Coupler buffer length disagrees with the declared shape.
    #[error(
        "coupler buffer holds {len} values but {columns} columns × {slots} \
         slots require {expected}"
    )]
    CouplerSizeMismatch {
        len: usize,
        expected: usize,
        columns: usize,
        slots: usize,
    },

    /// Field storage failure during an exchange pass.
    #[error(transparent)]
    Field(#[from] FieldError),
}
