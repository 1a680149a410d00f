//! The export engine: model → coupler, once per step.
//!
//! `SurfaceExporter` wraps the export-direction registry, the device mirror
//! of the coupler buffer, and the per-step pass. The pass itself is a pure
//! fan-out over columns: every registered descriptor contributes exactly one
//! scalar per column, scaled, into that column's slot row of the mirror.
//! Synchronization brackets the pass: the mirror is refreshed from the
//! coupler before it (so unregistered and init-skipped slots keep the
//! coupler's own values) and pushed back whole after it.
//!
//! The very first `run` of a run is the initialization pass: descriptors for
//! model-computed quantities are skipped, because their storage still holds
//! the invalid sentinel until the first step's physics has produced them.

use crate::buffer::ArenaLayout;
use crate::config::CouplingConfig;
use crate::field::FieldCatalog;
use crate::grid::ColumnGrid;
use crate::types::{ComponentIndex, SlotIndex};

use super::error::CouplingError;
use super::mirror::DeviceMirror;
use super::registry::{CouplingRegistry, ExchangeDirection};
use super::slots::SlotTable;
use super::span::{ColumnExchange, ColumnSpan};

/// Registry and mirror, born together at `open`: a closed registry always
/// comes with a mirror of the declared shape.
#[derive(Debug)]
struct OpenExporter {
    registry: CouplingRegistry,
    mirror: DeviceMirror,
}

/// One descriptor resolved against live field storage for a single pass.
struct ResolvedExport<'a> {
    data: &'a [f64],
    span: ColumnSpan,
    slot: SlotIndex,
    scale: f64,
}

/// Per-step export engine (model → coupler).
///
/// # Example
///
/// ```
/// use surface_coupling::config::CouplingConfig;
/// use surface_coupling::coupling::SurfaceExporter;
/// use surface_coupling::field::{Field, FieldCatalog, FieldIntent, FieldLayout, Unit};
/// use surface_coupling::grid::ColumnGrid;
/// use surface_coupling::types::SlotIndex;
///
/// let grid = ColumnGrid::new("physics", 2, 72);
/// let mut catalog = FieldCatalog::new();
/// let mut t_2m = Field::new(
///     "T_2m",
///     FieldLayout::surface_scalar("physics", 2, Unit::KELVIN),
///     FieldIntent::Updated,
///     1,
/// );
/// t_2m.allocate();
/// t_2m.fill(280.0).unwrap();
/// catalog.insert(t_2m).unwrap();
///
/// let mut exporter = SurfaceExporter::new(grid, CouplingConfig::default());
/// exporter.open(2, 1).unwrap();
/// exporter.register(&catalog, "T_2m", SlotIndex::new(0), None, 1.0).unwrap();
/// exporter.close().unwrap();
///
/// let mut coupler = vec![0.0; 2];
/// exporter.run(&catalog, &mut coupler).unwrap();
/// assert_eq!(coupler, vec![280.0, 280.0]);
/// ```
#[derive(Debug)]
pub struct SurfaceExporter {
    grid: ColumnGrid,
    config: CouplingConfig,
    opened: Option<OpenExporter>,
    initial_pass_done: bool,
}

impl SurfaceExporter {
    /// An engine for the given grid, with no capacity declared yet.
    pub fn new(grid: ColumnGrid, config: CouplingConfig) -> Self {
        Self {
            grid,
            config,
            opened: None,
            initial_pass_done: false,
        }
    }

    /// Declare the coupler's export shape: starts the registration window
    /// and allocates the mirror to match.
    pub fn open(&mut self, n_columns: usize, n_slots: usize) -> Result<(), CouplingError> {
        if let Some(open) = self.opened.as_mut() {
            // Opening twice is a protocol error; the registry names which.
            return open.registry.declare_capacity(n_columns, n_slots);
        }
        let mut registry = CouplingRegistry::new(ExchangeDirection::Export, self.grid.clone());
        registry.declare_capacity(n_columns, n_slots)?;
        self.opened = Some(OpenExporter {
            registry,
            mirror: DeviceMirror::new(n_columns, n_slots),
        });
        if self.config.verbose {
            println!("surface export: open for {n_slots} slots over {n_columns} columns");
        }
        Ok(())
    }

    fn opened_mut(&mut self) -> Result<&mut OpenExporter, CouplingError> {
        self.opened.as_mut().ok_or(CouplingError::NotOpen {
            direction: ExchangeDirection::Export,
        })
    }

    /// Register one export slot. See [`CouplingRegistry::register`].
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
            println!("surface export: closed with {registered} registered descriptor(s)");
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

    /// Whether the initialization pass has already happened.
    #[inline]
    pub fn initial_pass_done(&self) -> bool {
        self.initial_pass_done
    }

    /// Scratch plan for the derived vertical quantities the export-side
    /// producer fills (layer thickness and mid/interface heights), one
    /// packed [columns × levels] view each.
    ///
    /// The caller owns the memory; partition it with
    /// [`ArenaLayout::partition`] and hand the views to the producer.
    pub fn scratch_layout(&self) -> ArenaLayout {
        ArenaLayout::new(self.grid.n_columns(), self.config.pack_width)
            .with_view("dz", self.grid.n_levels())
            .with_view("z_mid", self.grid.n_levels())
            .with_view("z_int", self.grid.n_interfaces())
    }

    /// Run one export pass: model storage → `coupler`.
    ///
    /// Only callable once the registry is closed. The first call is the
    /// initialization pass and skips descriptors whose quantity the model
    /// has not computed yet; every later call exports all descriptors.
    /// Slots with no eligible descriptor keep the value `coupler` held on
    /// entry.
    pub fn run(&mut self, catalog: &FieldCatalog, coupler: &mut [f64]) -> Result<(), CouplingError> {
        let init_pass = !self.initial_pass_done;
        let Some(open) = self.opened.as_mut() else {
            return Err(CouplingError::RegistryNotClosed {
                direction: ExchangeDirection::Export,
            });
        };
        open.registry.require_closed()?;

        let mut entries = Vec::with_capacity(open.registry.registered_count());
        for d in open.registry.descriptors() {
            if init_pass && !d.export_during_init() {
                continue;
            }
            entries.push(ResolvedExport {
                data: catalog.data(d.field())?,
                span: d.span(),
                slot: d.slot(),
                scale: d.scale(),
            });
        }

        // Bring the device image up to date before overwriting owned slots.
        open.mirror.pull_from_host(coupler)?;
        let n_slots = open.mirror.n_slots();
        if n_slots > 0 {
            export_pass(open.mirror.as_mut_slice(), n_slots, &entries);
        }
        // The parallel pass has fully joined here; publish device → host.
        open.mirror.push_to_host(coupler)?;

        self.initial_pass_done = true;
        Ok(())
    }
}

/// Scatter every descriptor's scalars into the mirror's slot rows.
#[cfg(feature = "parallel")]
fn export_pass(mirror: &mut [f64], n_slots: usize, entries: &[ResolvedExport<'_>]) {
    use rayon::prelude::*;

    use crate::types::ColumnIndex;

    mirror
        .par_chunks_mut(n_slots)
        .enumerate()
        .for_each(|(c, row)| {
            let col = ColumnIndex::new(c);
            for entry in entries {
                row[entry.slot.get()] = entry.scale * entry.data[entry.span.element(col)];
            }
        });
}

/// Scatter every descriptor's scalars into the mirror's slot rows.
#[cfg(not(feature = "parallel"))]
fn export_pass(mirror: &mut [f64], n_slots: usize, entries: &[ResolvedExport<'_>]) {
    use crate::types::ColumnIndex;

    for (c, row) in mirror.chunks_mut(n_slots).enumerate() {
        let col = ColumnIndex::new(c);
        for entry in entries {
            row[entry.slot.get()] = entry.scale * entry.data[entry.span.element(col)];
        }
    }
}
