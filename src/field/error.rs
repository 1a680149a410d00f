//! Error types for field layout and catalog operations.

use thiserror::Error;

use super::layout::FieldTag;

/// Errors from field layout validation and catalog bookkeeping.
///
/// All of these indicate a configuration mistake made before the first
/// simulation step; none of them is recoverable mid-run.
#[derive(Error, Debug)]
pub enum FieldError {
    /// Layout declares a different home grid than the one validating it.
    #[error("layout belongs to grid '{layout_grid}' but was validated against grid '{grid}'")]
    GridMismatch { layout_grid: String, grid: String },

    /// Layout does not lead with the column dimension.
    #[error("layout must lead with the column dimension")]
    MissingColumnDimension,

    /// A dimension extent disagrees with the grid.
    #[error("{tag} extent {extent} does not match grid '{grid}' (expected {expected})")]
    ExtentMismatch {
        tag: FieldTag,
        extent: usize,
        expected: usize,
        grid: String,
    },

    /// A dimension appears twice in one layout.
    #[error("duplicate {tag} dimension in layout")]
    DuplicateDimension { tag: FieldTag },

    /// Dimensions are not in column/component/level order.
    #[error("{tag} dimension out of order; layouts are column-major with levels fastest")]
    MisplacedDimension { tag: FieldTag },

    /// A dimension has extent zero.
    #[error("{tag} dimension has extent 0")]
    ZeroExtent { tag: FieldTag },

    /// Catalog already holds a field with this name.
    #[error("field '{name}' is already in the catalog")]
    DuplicateField { name: String },

    /// Catalog has no field with this name.
    #[error("no field named '{name}' in the catalog")]
    UnknownField { name: String },

    /// Field exists but its storage has not been allocated.
    #[error("field '{name}' has no allocated storage")]
    NotAllocated { name: String },
}
