//! Surface coupling: registration protocol, descriptors, and the per-step
//! exchange engines.
//!
//! - [`SlotTable`] / [`SlotSpec`]: the coupler's per-slot metadata, decoded
//!   once at the setup boundary
//! - [`ColumnSpan`] / [`ColumnExchange`]: bounds-checked strided addressing
//!   into field storage, one descriptor per registered slot
//! - [`CouplingRegistry`]: the Clean/Open/Closed registration state machine
//! - [`DeviceMirror`]: the owned device-side image of the coupler buffer
//! - [`SurfaceExporter`] / [`SurfaceImporter`]: the once-per-step engines
//!
//! Setup order is fixed: decode the slot tables, open each engine with the
//! coupler's declared shape, register every slot, close, then call the
//! engines' `run` once per step in whatever order the driver enforces.

mod error;
mod export;
mod import;
mod mirror;
mod registry;
mod slots;
mod span;

pub use error::CouplingError;
pub use export::SurfaceExporter;
pub use import::SurfaceImporter;
pub use mirror::DeviceMirror;
pub use registry::{
    CouplingRegistry, ExchangeDirection, INVERTED_SIGN_FIELDS, RegistryState,
};
pub use slots::{NAME_RECORD_LEN, SlotDecodeError, SlotSpec, SlotTable};
pub use span::{ColumnExchange, ColumnSpan, StridedColumns, StridedColumnsMut};
