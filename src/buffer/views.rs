//! Packed 2-D views over borrowed scratch memory.
//!
//! A [`PackedViewMut`] is a [columns × padded levels] window into a larger
//! allocation: each column's levels occupy one contiguous padded row. The
//! view knows both its logical level count and its padded row stride, so
//! level indexing is always checked against the logical extent while row
//! access exposes the full padded run for pack-width writers.

use crate::types::{ColumnIndex, LevelIndex};

/// Mutable 2-D packed view: one padded row of levels per column.
#[derive(Debug)]
pub struct PackedViewMut<'a> {
    data: &'a mut [f64],
    n_columns: usize,
    n_levels: usize,
    row_stride: usize,
}

impl<'a> PackedViewMut<'a> {
    /// Wrap borrowed memory as a packed view.
    ///
    /// `data` must hold exactly `n_columns × row_stride` elements with
    /// `row_stride ≥ n_levels`; the constructor asserts both.
    pub fn new(data: &'a mut [f64], n_columns: usize, n_levels: usize, row_stride: usize) -> Self {
        assert!(
            row_stride >= n_levels,
            "row stride {row_stride} shorter than {n_levels} levels"
        );
        assert_eq!(
            data.len(),
            n_columns * row_stride,
            "view memory does not match {n_columns} columns of stride {row_stride}"
        );
        Self {
            data,
            n_columns,
            n_levels,
            row_stride,
        }
    }

    /// Number of columns (rows).
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Logical levels per column.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Padded elements per column.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// One column's padded row.
    #[inline]
    pub fn row(&self, col: ColumnIndex) -> &[f64] {
        let start = col.get() * self.row_stride;
        &self.data[start..start + self.row_stride]
    }

    /// One column's padded row, mutably.
    #[inline]
    pub fn row_mut(&mut self, col: ColumnIndex) -> &mut [f64] {
        let start = col.get() * self.row_stride;
        &mut self.data[start..start + self.row_stride]
    }

    /// Read one (column, level) element.
    #[inline]
    pub fn get(&self, col: ColumnIndex, lev: LevelIndex) -> f64 {
        assert!(lev.get() < self.n_levels, "level {lev} out of range");
        self.data[col.get() * self.row_stride + lev.get()]
    }

    /// Write one (column, level) element.
    #[inline]
    pub fn set(&mut self, col: ColumnIndex, lev: LevelIndex, value: f64) {
        assert!(lev.get() < self.n_levels, "level {lev} out of range");
        self.data[col.get() * self.row_stride + lev.get()] = value;
    }

    /// Fill every element, padding included.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}
