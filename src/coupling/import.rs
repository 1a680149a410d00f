//! The import engine: coupler → model, once per step.
//!
//! `SurfaceImporter` wraps the import-direction registry and the device
//! mirror. Each pass first pulls the coupler's buffer into the mirror (the
//! model must only ever consume a fully transferred image), then scatters
//! each descriptor's slot column-by-column into model storage, applying the
//! descriptor's sign/scale. Unlike the exporter there is no initialization
//! gating: imported quantities are produced by the surface components and
//! are valid from the first pass on.

use crate::config::CouplingConfig;
use crate::field::FieldCatalog;
use crate::grid::ColumnGrid;
use crate::types::{ComponentIndex, SlotIndex};

use super::error::CouplingError;
use super::mirror::DeviceMirror;
use super::registry::{CouplingRegistry, ExchangeDirection};
use super::slots::SlotTable;
use super::span::ColumnExchange;

/// Registry and mirror, born together at `open`: a closed registry always
/// comes with a mirror of the declared shape.
#[derive(Debug)]
struct OpenImporter {
    registry: CouplingRegistry,
    mirror: DeviceMirror,
}

/// Per-step import engine (coupler → model).
///
/// # Example
///
/// ```
/// use surface_coupling::config::CouplingConfig;
/// use surface_coupling::coupling::SurfaceImporter;
/// use surface_coupling::field::{Field, FieldCatalog, FieldIntent, FieldLayout, Unit};
/// use surface_coupling::grid::ColumnGrid;
/// use surface_coupling::types::SlotIndex;
///
/// let grid = ColumnGrid::new("physics", 4, 72);
/// let mut catalog = FieldCatalog::new();
/// let mut t_2m = Field::new(
///     "T_2m",
///     FieldLayout::surface_scalar("physics", 4, Unit::KELVIN),
///     FieldIntent::Required,
///     1,
/// );
/// t_2m.allocate();
/// catalog.insert(t_2m).unwrap();
///
/// let mut importer = SurfaceImporter::new(grid, CouplingConfig::default());
/// importer.open(4, 1).unwrap();
/// importer.register(&catalog, "T_2m", SlotIndex::new(0), None, 1.0).unwrap();
/// importer.close().unwrap();
///
/// let coupler = vec![281.0, 282.0, 283.0, 284.0];
/// importer.run(&mut catalog, &coupler).unwrap();
/// assert_eq!(catalog.get("T_2m").unwrap().data().unwrap()[3], 284.0);
/// ```
#[derive(Debug)]
pub struct SurfaceImporter {
    grid: ColumnGrid,
    config: CouplingConfig,
    opened: Option<OpenImporter>,
}

impl SurfaceImporter {
    /// An engine for the given grid, with no capacity declared yet.
    pub fn new(grid: ColumnGrid, config: CouplingConfig) -> Self {
        Self {
            grid,
            config,
            opened: None,
        }
    }

    /// Declare the coupler's import shape: starts the registration window
    /// and allocates the mirror to match.
    pub fn open(&mut self, n_columns: usize, n_slots: usize) -> Result<(), CouplingError> {
        if let Some(open) = self.opened.as_mut() {
            // Opening twice is a protocol error; the registry names which.
            return open.registry.declare_capacity(n_columns, n_slots);
        }
        let mut registry = CouplingRegistry::new(ExchangeDirection::Import, self.grid.clone());
        registry.declare_capacity(n_columns, n_slots)?;
        self.opened = Some(OpenImporter {
            registry,
            mirror: DeviceMirror::new(n_columns, n_slots),
        });
        if self.config.verbose {
            println!("surface import: open for {n_slots} slots over {n_columns} columns");
        }
        Ok(())
    }

    fn opened_mut(&mut self) -> Result<&mut OpenImporter, CouplingError> {
        self.opened.as_mut().ok_or(CouplingError::NotOpen {
            direction: ExchangeDirection::Import,
        })
    }

    /// Register one import slot. See [`CouplingRegistry::register`].
    pub fn register(
        &mut self,
        catalog: &FieldCatalog,
        field_name: &str,
        slot: SlotIndex,
        component: Option<ComponentIndex>,
        multiple: f64,
    ) -> Result<(), CouplingError> {
        self.opened_mut()?
            .registry
            .register(catalog, field_name, slot, component, multiple)
    }

    /// Register every slot of a decoded table, in slot order.
    pub fn register_all(
        &mut self,
        catalog: &FieldCatalog,
        table: &SlotTable,
    ) -> Result<(), CouplingError> {
        for (slot, spec) in table.iter() {
            self.register(catalog, spec.name(), slot, spec.component(), spec.multiple())?;
        }
        Ok(())
    }

    /// End registration. No further slots accepted afterward.
    pub fn close(&mut self) -> Result<(), CouplingError> {
        let open = self.opened_mut()?;
        open.registry.close()?;
        let registered = open.registry.registered_count();
        if self.config.verbose {
            println!("surface import: closed with {registered} registered descriptor(s)");
        }
        Ok(())
    }

    /// Number of successful non-sentinel registrations.
    pub fn registered_count(&self) -> usize {
        self.opened
            .as_ref()
            .map_or(0, |open| open.registry.registered_count())
    }

    /// The descriptor table, read-only.
    pub fn descriptors(&self) -> &[ColumnExchange] {
        match &self.opened {
            Some(open) => open.registry.descriptors(),
            None => &[],
        }
    }

    /// Run one import pass: `coupler` → model storage.
    ///
    /// Only callable once the registry is closed. Pulls the coupler buffer
    /// into the mirror first, then writes each descriptor's scaled column
    /// scalars into its field. Fields and field elements no descriptor
    /// addresses are never touched.
    pub fn run(&mut self, catalog: &mut FieldCatalog, coupler: &[f64]) -> Result<(), CouplingError> {
        let Some(open) = self.opened.as_mut() else {
            return Err(CouplingError::RegistryNotClosed {
                direction: ExchangeDirection::Import,
            });
        };
        open.registry.require_closed()?;

        // The model must only consume a complete host → device transfer.
        open.mirror.pull_from_host(coupler)?;
        let mirror = &open.mirror;

        // Descriptors address disjoint fields' storage; within one
        // descriptor the columns fan out in parallel.
        for d in open.registry.descriptors() {
            let slot = d.slot();
            let scale = d.scale();
            let data = catalog.data_mut(d.field())?;
            d.span()
                .bind_mut(data)
                .scatter(move |col| scale * mirror.get(col, slot));
        }
        Ok(())
    }
}
