//! Field layout descriptors: the shape, unit and home grid of a quantity.
//!
//! A layout is an ordered list of (dimension tag, extent) pairs. Layouts in
//! this crate are column-major with the vertical dimension fastest, matching
//! the model's packed storage:
//!
//! ```text
//! (column)                      surface scalar, 1 value per column
//! (column, component)           surface vector, e.g. surface stress
//! (column, level)               midpoint profile, e.g. T_mid
//! (column, interface)           interface profile, e.g. p_int
//! (column, component, level)    vector profile, e.g. horiz_winds
//! ```
//!
//! The tags are structural: a vector component dimension is never
//! interchangeable with a vertical dimension even when the extents happen to
//! agree. Validation against a [`ColumnGrid`] checks every extent against
//! the grid's authoritative counts.
//!
//! # Storage layout
//!
//! Allocated storage pads the trailing vertical dimension up to a multiple
//! of the packing width so that per-column slices are whole numbers of SIMD
//! packs. [`FieldLayout::padded_scalars_per_column`] is therefore the column
//! stride of the allocation, which may exceed the logical
//! [`FieldLayout::scalars_per_column`].

use std::fmt;

use crate::buffer::pack_count;
use crate::grid::ColumnGrid;

use super::error::FieldError;
use super::units::Unit;

/// Dimension tag in a field layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldTag {
    /// Horizontal column dimension; always leads.
    Column,
    /// Vector component dimension (e.g. zonal/meridional).
    Component,
    /// Vertical midpoint level dimension; always trails.
    Level,
    /// Vertical interface dimension (midpoints + 1); always trails.
    Interface,
}

impl FieldTag {
    /// Ordering class: column < component < vertical.
    fn class(self) -> u8 {
        match self {
            FieldTag::Column => 0,
            FieldTag::Component => 1,
            FieldTag::Level | FieldTag::Interface => 2,
        }
    }

    /// Whether this tag is a vertical dimension.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, FieldTag::Level | FieldTag::Interface)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldTag::Column => "column",
            FieldTag::Component => "component",
            FieldTag::Level => "level",
            FieldTag::Interface => "interface",
        };
        write!(f, "{name}")
    }
}

/// Shape, physical unit and home grid of a named quantity.
///
/// # Example
///
/// ```
/// use surface_coupling::field::{FieldLayout, Unit};
///
/// let winds = FieldLayout::midpoint_vector("physics", 218, 2, 72, Unit::M_PER_S);
/// assert_eq!(winds.n_columns(), 218);
/// assert_eq!(winds.component_count(), 2);
/// assert_eq!(winds.scalars_per_column(), 2 * 72);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldLayout {
    dims: Vec<(FieldTag, usize)>,
    unit: Unit,
    grid: String,
}

impl FieldLayout {
    /// Build a layout from raw (tag, extent) pairs.
    ///
    /// Prefer the shape-specific constructors; this exists for callers that
    /// assemble layouts programmatically.
    pub fn new(grid: impl Into<String>, dims: Vec<(FieldTag, usize)>, unit: Unit) -> Self {
        Self {
            dims,
            unit,
            grid: grid.into(),
        }
    }

    /// Surface scalar: one value per column.
    pub fn surface_scalar(grid: impl Into<String>, n_columns: usize, unit: Unit) -> Self {
        Self::new(grid, vec![(FieldTag::Column, n_columns)], unit)
    }

    /// Surface vector: `n_components` values per column.
    pub fn surface_vector(
        grid: impl Into<String>,
        n_columns: usize,
        n_components: usize,
        unit: Unit,
    ) -> Self {
        Self::new(
            grid,
            vec![
                (FieldTag::Column, n_columns),
                (FieldTag::Component, n_components),
            ],
            unit,
        )
    }

    /// Midpoint profile: `n_levels` values per column.
    pub fn midpoint_scalar(
        grid: impl Into<String>,
        n_columns: usize,
        n_levels: usize,
        unit: Unit,
    ) -> Self {
        Self::new(
            grid,
            vec![(FieldTag::Column, n_columns), (FieldTag::Level, n_levels)],
            unit,
        )
    }

    /// Interface profile: `n_interfaces` values per column.
    pub fn interface_scalar(
        grid: impl Into<String>,
        n_columns: usize,
        n_interfaces: usize,
        unit: Unit,
    ) -> Self {
        Self::new(
            grid,
            vec![
                (FieldTag::Column, n_columns),
                (FieldTag::Interface, n_interfaces),
            ],
            unit,
        )
    }

    /// Vector profile: `n_components × n_levels` values per column.
    pub fn midpoint_vector(
        grid: impl Into<String>,
        n_columns: usize,
        n_components: usize,
        n_levels: usize,
        unit: Unit,
    ) -> Self {
        Self::new(
            grid,
            vec![
                (FieldTag::Column, n_columns),
                (FieldTag::Component, n_components),
                (FieldTag::Level, n_levels),
            ],
            unit,
        )
    }

    /// The (tag, extent) pairs in storage order.
    #[inline]
    pub fn dims(&self) -> &[(FieldTag, usize)] {
        &self.dims
    }

    /// Physical unit tag.
    #[inline]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Home grid identifier.
    #[inline]
    pub fn grid(&self) -> &str {
        &self.grid
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Extent of the given tag, if present.
    pub fn extent(&self, tag: FieldTag) -> Option<usize> {
        self.dims.iter().find(|(t, _)| *t == tag).map(|(_, e)| *e)
    }

    /// Column extent. Zero for a malformed layout with no column dimension.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.extent(FieldTag::Column).unwrap_or(0)
    }

    /// Vector component count; 1 for scalar layouts.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.extent(FieldTag::Component).unwrap_or(1)
    }

    /// Extent of the vertical dimension (level or interface), if any.
    pub fn vertical_extent(&self) -> Option<usize> {
        self.dims
            .iter()
            .find(|(t, _)| t.is_vertical())
            .map(|(_, e)| *e)
    }

    /// Logical scalar count per column (no padding).
    pub fn scalars_per_column(&self) -> usize {
        self.dims
            .iter()
            .skip(1)
            .map(|(_, extent)| extent)
            .product()
    }

    /// Scalar count per column with the trailing vertical dimension padded
    /// up to a whole number of packs of `pack_width`.
    ///
    /// This is the column stride of an allocation with that packing.
    pub fn padded_scalars_per_column(&self, pack_width: usize) -> usize {
        let mut scalars = 1;
        let last = self.dims.len().saturating_sub(1);
        for (i, (tag, extent)) in self.dims.iter().enumerate().skip(1) {
            scalars *= if i == last && tag.is_vertical() {
                pack_count(*extent, pack_width) * pack_width
            } else {
                *extent
            };
        }
        scalars
    }

    /// Total element count of an allocation with the given packing.
    pub fn alloc_len(&self, pack_width: usize) -> usize {
        self.n_columns() * self.padded_scalars_per_column(pack_width)
    }

    /// Check structure and extents against the grid.
    ///
    /// Rules: the home grid must match; the column dimension leads; at most
    /// one component and one vertical dimension, in column/component/vertical
    /// order; every extent agrees with the grid and is non-zero.
    pub fn validate_against(&self, grid: &ColumnGrid) -> Result<(), FieldError> {
        if self.grid != grid.name() {
            return Err(FieldError::GridMismatch {
                layout_grid: self.grid.clone(),
                grid: grid.name().to_string(),
            });
        }
        match self.dims.first() {
            Some((FieldTag::Column, _)) => {}
            _ => return Err(FieldError::MissingColumnDimension),
        }

        let mut prev_class = 0;
        for (i, &(tag, extent)) in self.dims.iter().enumerate() {
            if extent == 0 {
                return Err(FieldError::ZeroExtent { tag });
            }
            if self.dims.iter().take(i).any(|(t, _)| *t == tag) {
                return Err(FieldError::DuplicateDimension { tag });
            }
            if i > 0 && tag.class() <= prev_class {
                return Err(FieldError::MisplacedDimension { tag });
            }
            prev_class = tag.class();

            let expected = match tag {
                FieldTag::Column => Some(grid.n_columns()),
                FieldTag::Level => Some(grid.n_levels()),
                FieldTag::Interface => Some(grid.n_interfaces()),
                FieldTag::Component => None,
            };
            if let Some(expected) = expected
                && extent != expected
            {
                return Err(FieldError::ExtentMismatch {
                    tag,
                    extent,
                    expected,
                    grid: grid.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (tag, extent)) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tag}[{extent}]")?;
        }
        write!(f, ") [{}] on '{}'", self.unit, self.grid)
    }
}
