//! Column grid: the horizontal/vertical extent of the locally owned domain.
//!
//! Atmosphere physics in this crate is column-oriented: the horizontal
//! domain decomposes into independent columns (one per grid point owned by
//! the local rank), each carrying a stack of vertical levels. Midpoint
//! quantities live on `n_levels` layers; interface quantities live on the
//! `n_levels + 1` surfaces bounding them.
//!
//! The grid is the authority on these counts. Field layouts validate their
//! extents against it, and the coupling registries reject any capacity
//! declaration whose column count disagrees with it.
//!
//! # Example
//!
//! ```
//! use surface_coupling::grid::ColumnGrid;
//!
//! let grid = ColumnGrid::new("physics_gll", 218, 72);
//! assert_eq!(grid.n_columns(), 218);
//! assert_eq!(grid.n_levels(), 72);
//! assert_eq!(grid.n_interfaces(), 73);
//! ```

/// Locally owned column grid: column count plus vertical level counts.
///
/// Columns are indexed `0..n_columns` and each belongs to exactly one rank;
/// this type only ever describes the local rank's share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnGrid {
    /// Grid name, used as the home-grid identifier in field layouts.
    name: String,

    /// Number of columns owned by the local rank.
    n_columns: usize,

    /// Number of vertical midpoint levels.
    n_levels: usize,
}

impl ColumnGrid {
    /// Create a new column grid.
    ///
    /// # Arguments
    ///
    /// * `name` - Grid identifier (e.g. the dynamics or physics grid name)
    /// * `n_columns` - Locally owned column count (≥ 1)
    /// * `n_levels` - Vertical midpoint level count (≥ 1)
    pub fn new(name: impl Into<String>, n_columns: usize, n_levels: usize) -> Self {
        Self {
            name: name.into(),
            n_columns,
            n_levels,
        }
    }

    /// Grid identifier.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of locally owned columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Number of vertical midpoint levels.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Number of vertical interfaces (midpoint levels + 1).
    #[inline]
    pub fn n_interfaces(&self) -> usize {
        self.n_levels + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let grid = ColumnGrid::new("physics", 16, 72);
        assert_eq!(grid.name(), "physics");
        assert_eq!(grid.n_columns(), 16);
        assert_eq!(grid.n_levels(), 72);
        assert_eq!(grid.n_interfaces(), 73);
    }

    #[test]
    fn test_single_column_grid() {
        let grid = ColumnGrid::new("scm", 1, 1);
        assert_eq!(grid.n_columns(), 1);
        assert_eq!(grid.n_interfaces(), 2);
    }
}
