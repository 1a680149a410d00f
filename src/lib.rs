//! # surface-coupling
//!
//! Surface coupling data-exchange layer for column-based atmosphere models.
//!
//! The crate marshals per-column physical-field data between a model's
//! named, packed field storage and an external coupler's flat
//! [columns × slots] buffer:
//!
//! - Field layouts, units and the field catalog (named allocated storage)
//! - A scratch arena carved into packed views with byte-exact sizing
//! - The Clean/Open/Closed coupling registry and its exchange descriptors
//! - Per-step import/export engines with explicit host/device mirroring
//!
//! ## Setup and stepping
//!
//! ```
//! use surface_coupling::{
//!     ColumnGrid, CouplingConfig, Field, FieldCatalog, FieldIntent, FieldLayout,
//!     SlotIndex, SurfaceImporter, Unit,
//! };
//!
//! let grid = ColumnGrid::new("physics", 4, 72);
//! let mut catalog = FieldCatalog::new();
//! let mut t_2m = Field::new(
//!     "T_2m",
//!     FieldLayout::surface_scalar("physics", 4, Unit::KELVIN),
//!     FieldIntent::Required,
//!     1,
//! );
//! t_2m.allocate();
//! catalog.insert(t_2m).unwrap();
//!
//! let mut importer = SurfaceImporter::new(grid, CouplingConfig::default());
//! importer.open(4, 2).unwrap();
//! importer.register(&catalog, "T_2m", SlotIndex::new(0), None, 1.0).unwrap();
//! importer.register(&catalog, "unused", SlotIndex::new(1), None, 1.0).unwrap();
//! importer.close().unwrap();
//!
//! let coupler = vec![280.0, 0.0, 281.0, 0.0, 282.0, 0.0, 283.0, 0.0];
//! importer.run(&mut catalog, &coupler).unwrap();
//! assert_eq!(catalog.get("T_2m").unwrap().data().unwrap()[2], 282.0);
//! ```

pub mod buffer;
pub mod config;
pub mod coupling;
pub mod field;
pub mod grid;
pub mod types;

// Re-export main types for convenience
pub use buffer::{ArenaError, ArenaLayout, PackedViewMut, ScratchViews, pack_count, padded_len};
pub use config::CouplingConfig;
pub use coupling::{
    ColumnExchange, ColumnSpan, CouplingError, CouplingRegistry, DeviceMirror, ExchangeDirection,
    INVERTED_SIGN_FIELDS, NAME_RECORD_LEN, RegistryState, SlotDecodeError, SlotSpec, SlotTable,
    SurfaceExporter, SurfaceImporter,
};
pub use field::{Field, FieldCatalog, FieldError, FieldId, FieldIntent, FieldLayout, FieldTag, Unit};
pub use grid::ColumnGrid;
pub use types::{ColumnIndex, ComponentIndex, LevelIndex, SlotIndex};
