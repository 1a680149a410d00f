//! The coupling registry: a three-state registration protocol.
//!
//! Each exchange direction owns one registry. The registry starts `Clean`,
//! opens when the coupler declares its capacity, accepts registrations while
//! `Open`, and closes once setup is done; the descriptor table it builds is
//! immutable from then on. Transitions are one-directional for the life of
//! the run: there is no reopen, and a fresh run rebuilds the registry from
//! scratch.
//!
//! Registration is setup-time bookkeeping, not a hot path: the duplicate
//! slot check is a linear scan over prior registrations, and every check
//! fails fast with a distinct error variant so a miswired driver is
//! diagnosable from the message alone.

use std::fmt;

use crate::field::FieldCatalog;
use crate::grid::ColumnGrid;
use crate::types::{ComponentIndex, SlotIndex};

use super::error::CouplingError;
use super::span::{ColumnExchange, ColumnSpan};

/// Which way a registry moves data across the surface boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeDirection {
    /// Coupler → model.
    Import,
    /// Model → coupler.
    Export,
}

impl ExchangeDirection {
    /// Reserved slot name meaning "no model field; skip this slot."
    ///
    /// The name differs per direction by external convention: an unused
    /// import slot is literally `unused`, while an export slot with no
    /// producer is `set_zero` (the coupler zeroes it itself).
    #[inline]
    pub fn sentinel(self) -> &'static str {
        match self {
            ExchangeDirection::Import => "unused",
            ExchangeDirection::Export => "set_zero",
        }
    }
}

impl fmt::Display for ExchangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExchangeDirection::Import => "import",
            ExchangeDirection::Export => "export",
        };
        write!(f, "{name}")
    }
}

/// Registration protocol state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryState {
    /// No capacity declared yet; registration not started.
    Clean,
    /// Capacity declared; registrations accepted.
    Open {
        /// Declared slot count for this direction.
        capacity: usize,
    },
    /// Registration ended; the descriptor table is frozen.
    Closed,
}

/// Flux-like quantities whose direction convention is inverted between the
/// model and the coupler. Exact-match; a fixed physical convention, not
/// configuration.
pub const INVERTED_SIGN_FIELDS: [&str; 4] = [
    "surf_mom_flux",
    "surf_sens_flux",
    "surf_latent_flux",
    "surf_lw_flux_up",
];

/// Registration state machine and descriptor table for one direction.
///
/// # Example
///
/// ```
/// use surface_coupling::coupling::{CouplingRegistry, ExchangeDirection};
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
/// let mut registry = CouplingRegistry::new(ExchangeDirection::Import, grid);
/// registry.declare_capacity(4, 2).unwrap();
/// registry.register(&catalog, "T_2m", SlotIndex::new(0), None, 1.0).unwrap();
/// registry.close().unwrap();
/// assert_eq!(registry.registered_count(), 1);
/// ```
#[derive(Debug)]
pub struct CouplingRegistry {
    direction: ExchangeDirection,
    grid: ColumnGrid,
    state: RegistryState,
    entries: Vec<ColumnExchange>,
}

impl CouplingRegistry {
    /// A clean registry for one direction on the given grid.
    pub fn new(direction: ExchangeDirection, grid: ColumnGrid) -> Self {
        Self {
            direction,
            grid,
            state: RegistryState::Clean,
            entries: Vec::new(),
        }
    }

    /// Exchange direction.
    #[inline]
    pub fn direction(&self) -> ExchangeDirection {
        self.direction
    }

    /// Grid this registry validates against.
    #[inline]
    pub fn grid(&self) -> &ColumnGrid {
        &self.grid
    }

    /// Current protocol state.
    #[inline]
    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// Number of successful non-sentinel registrations.
    #[inline]
    pub fn registered_count(&self) -> usize {
        self.entries.len()
    }

    /// The frozen descriptor table (grows only while `Open`).
    #[inline]
    pub fn descriptors(&self) -> &[ColumnExchange] {
        &self.entries
    }

    /// Declared capacity, if the registry has opened.
    pub fn capacity(&self) -> Option<usize> {
        match self.state {
            RegistryState::Open { capacity } => Some(capacity),
            _ => None,
        }
    }

    /// Clean → Open: declare the coupler's shape for this direction.
    ///
    /// `n_columns` must agree with the grid; `n_slots` becomes the
    /// registration capacity.
    pub fn declare_capacity(
        &mut self,
        n_columns: usize,
        n_slots: usize,
    ) -> Result<(), CouplingError> {
        match self.state {
            RegistryState::Clean => {}
            RegistryState::Open { capacity } => {
                return Err(CouplingError::AlreadyOpen {
                    direction: self.direction,
                    capacity,
                });
            }
            RegistryState::Closed => {
                return Err(CouplingError::AlreadyClosed {
                    direction: self.direction,
                });
            }
        }
        if n_columns != self.grid.n_columns() {
            return Err(CouplingError::ColumnMismatch {
                declared: n_columns,
                expected: self.grid.n_columns(),
                grid: self.grid.name().to_string(),
            });
        }
        self.state = RegistryState::Open { capacity: n_slots };
        self.entries.reserve(n_slots);
        Ok(())
    }

    /// Register one slot while `Open`.
    ///
    /// The sentinel name for this direction is a deliberate no-op: the slot
    /// stays unclaimed and the registered count does not move. For any other
    /// name the call validates capacity, field existence and allocation,
    /// the field's layout against the grid, slot range and uniqueness, and
    /// the component selection, then builds the descriptor. The count
    /// advances only on success.
    ///
    /// `multiple` is the coupler-supplied constant scale; exactly `1.0`
    /// means "no override" and the inverted-sign table decides the sign.
    pub fn register(
        &mut self,
        catalog: &FieldCatalog,
        field_name: &str,
        slot: SlotIndex,
        component: Option<ComponentIndex>,
        multiple: f64,
    ) -> Result<(), CouplingError> {
        // Two separate state checks so the message says which way the
        // protocol was violated.
        let capacity = match self.state {
            RegistryState::Clean => {
                return Err(CouplingError::NotOpen {
                    direction: self.direction,
                });
            }
            RegistryState::Closed => {
                return Err(CouplingError::AlreadyClosed {
                    direction: self.direction,
                });
            }
            RegistryState::Open { capacity } => capacity,
        };

        if field_name == self.direction.sentinel() {
            return Ok(());
        }

        if self.entries.len() == capacity {
            return Err(CouplingError::CapacityExhausted {
                direction: self.direction,
                capacity,
            });
        }

        let id = catalog
            .id_of(field_name)
            .ok_or_else(|| CouplingError::UnknownField {
                name: field_name.to_string(),
            })?;
        let field = catalog.field(id);
        if !field.is_allocated() {
            return Err(CouplingError::FieldNotAllocated {
                name: field_name.to_string(),
            });
        }
        // The stride/offset arithmetic below is only meaningful for a
        // column-led, component-before-vertical layout whose extents agree
        // with the grid; anything else must not produce a descriptor.
        field.layout().validate_against(&self.grid)?;

        if slot.get() >= capacity {
            return Err(CouplingError::SlotOutOfRange {
                slot,
                direction: self.direction,
                capacity,
            });
        }
        // Linear scan; registration is once-per-setup, off the hot path.
        if let Some(prior) = self.entries.iter().find(|e| e.slot() == slot) {
            return Err(CouplingError::DuplicateSlot {
                slot,
                existing: prior.field_name().to_string(),
            });
        }

        let component_count = field.layout().component_count();
        let component_index = match component {
            Some(c) if c.get() >= component_count => {
                return Err(CouplingError::ComponentOutOfRange {
                    name: field_name.to_string(),
                    component: c.get(),
                    count: component_count,
                });
            }
            Some(c) => c.get(),
            None => 0,
        };

        // Stride is the field's full padded per-column run; the offset
        // selects one component's sub-run within it.
        let stride = field.column_stride();
        let offset = component_index * (stride / component_count);
        let span = ColumnSpan::new(self.grid.n_columns(), stride, offset);

        let data_len = field.data()?.len();
        if !span.fits(data_len) {
            return Err(CouplingError::SpanOutOfBounds {
                name: field_name.to_string(),
                required: span.required_len(),
                len: data_len,
            });
        }

        let scale = if multiple != 1.0 {
            multiple
        } else if INVERTED_SIGN_FIELDS.contains(&field_name) {
            -1.0
        } else {
            1.0
        };

        let export_during_init = !field.intent().is_computed();
        self.entries.push(ColumnExchange::new(
            id,
            field_name.to_string(),
            slot,
            span,
            scale,
            export_during_init,
        ));
        Ok(())
    }

    /// Open → Closed: end the registration window.
    pub fn close(&mut self) -> Result<(), CouplingError> {
        match self.state {
            RegistryState::Open { .. } => {
                self.state = RegistryState::Closed;
                Ok(())
            }
            RegistryState::Clean => Err(CouplingError::NotOpen {
                direction: self.direction,
            }),
            RegistryState::Closed => Err(CouplingError::AlreadyClosed {
                direction: self.direction,
            }),
        }
    }

    /// Guard for the per-step engines: only a closed registry may exchange.
    pub fn require_closed(&self) -> Result<(), CouplingError> {
        match self.state {
            RegistryState::Closed => Ok(()),
            _ => Err(CouplingError::RegistryNotClosed {
                direction: self.direction,
            }),
        }
    }
}
