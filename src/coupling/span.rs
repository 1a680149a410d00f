//! Strided per-column addressing into field storage.
//!
//! An exchanged quantity touches exactly one scalar per column. Where that
//! scalar sits depends on the field's packed layout: column `c`'s value
//! lives at `c × stride + offset`, with `stride` the padded per-column
//! scalar count of the whole field and `offset` selecting the vector
//! component (zero for scalars).
//!
//! For a vector profile laid out (column, component, level) with padded
//! per-component run `p`, the stride is `component_count × p` (larger than
//! the single scalar actually exchanged per column) and component `k`
//! starts at offset `k × p`.
//!
//! [`ColumnSpan`] carries the extent and is validated against the owning
//! field's allocation when the registry builds a descriptor, so the raw
//! index arithmetic in the exchange passes can never run past the end of a
//! field.

use crate::field::FieldId;
use crate::types::{ColumnIndex, SlotIndex};

/// Strided view descriptor: `n_columns` scalars at `col × stride + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    n_columns: usize,
    stride: usize,
    offset: usize,
}

impl ColumnSpan {
    /// Build a span. `stride ≥ 1`; `offset < stride`.
    pub fn new(n_columns: usize, stride: usize, offset: usize) -> Self {
        assert!(stride >= 1, "column stride must be at least 1");
        assert!(
            offset < stride,
            "offset {offset} must stay within one column of stride {stride}"
        );
        Self {
            n_columns,
            stride,
            offset,
        }
    }

    /// Number of columns the span addresses.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Element distance between consecutive column starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Element distance from a column start to the exchanged scalar.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Flat element index of one column's scalar.
    #[inline]
    pub fn element(&self, col: ColumnIndex) -> usize {
        col.get() * self.stride + self.offset
    }

    /// Smallest allocation the span fits in: the last column's element,
    /// plus one.
    pub fn required_len(&self) -> usize {
        if self.n_columns == 0 {
            return 0;
        }
        (self.n_columns - 1) * self.stride + self.offset + 1
    }

    /// Whether the span stays within an allocation of `len` elements.
    #[inline]
    pub fn fits(&self, len: usize) -> bool {
        self.required_len() <= len
    }

    /// Bind read-only over field data.
    ///
    /// # Panics
    ///
    /// Panics if the data is shorter than [`ColumnSpan::required_len`]; the
    /// registry validates every descriptor's span at build time, so this
    /// only fires on storage that shrank afterwards.
    pub fn bind<'a>(&self, data: &'a [f64]) -> StridedColumns<'a> {
        assert!(
            self.fits(data.len()),
            "span requires {} elements but data holds {}",
            self.required_len(),
            data.len()
        );
        StridedColumns { data, span: *self }
    }

    /// Bind mutably over field data.
    ///
    /// # Panics
    ///
    /// Same condition as [`ColumnSpan::bind`].
    pub fn bind_mut<'a>(&self, data: &'a mut [f64]) -> StridedColumnsMut<'a> {
        assert!(
            self.fits(data.len()),
            "span requires {} elements but data holds {}",
            self.required_len(),
            data.len()
        );
        StridedColumnsMut { data, span: *self }
    }
}

/// Read-only strided view over one field's exchanged scalars.
#[derive(Debug)]
pub struct StridedColumns<'a> {
    data: &'a [f64],
    span: ColumnSpan,
}

impl StridedColumns<'_> {
    /// The exchanged scalar of one column.
    #[inline]
    pub fn get(&self, col: ColumnIndex) -> f64 {
        self.data[self.span.element(col)]
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.span.n_columns
    }
}

/// Mutable strided view over one field's exchanged scalars.
#[derive(Debug)]
pub struct StridedColumnsMut<'a> {
    data: &'a mut [f64],
    span: ColumnSpan,
}

impl StridedColumnsMut<'_> {
    /// The exchanged scalar of one column.
    #[inline]
    pub fn get(&self, col: ColumnIndex) -> f64 {
        self.data[self.span.element(col)]
    }

    /// Overwrite one column's exchanged scalar.
    #[inline]
    pub fn set(&mut self, col: ColumnIndex, value: f64) {
        self.data[self.span.element(col)] = value;
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.span.n_columns
    }

    /// Write every column's scalar from `source(col)`, in parallel.
    ///
    /// Touches exactly one element per column; the rest of each column's
    /// packed block (other components, other levels, padding) is never
    /// read or written.
    #[cfg(feature = "parallel")]
    pub fn scatter(&mut self, source: impl Fn(ColumnIndex) -> f64 + Sync) {
        use rayon::prelude::*;

        let span = self.span;
        self.data
            .par_chunks_mut(span.stride)
            .take(span.n_columns)
            .enumerate()
            .for_each(|(c, column)| {
                column[span.offset] = source(ColumnIndex::new(c));
            });
    }

    /// Write every column's scalar from `source(col)`.
    #[cfg(not(feature = "parallel"))]
    pub fn scatter(&mut self, source: impl Fn(ColumnIndex) -> f64 + Sync) {
        let span = self.span;
        for (c, column) in self.data.chunks_mut(span.stride).take(span.n_columns).enumerate() {
            column[span.offset] = source(ColumnIndex::new(c));
        }
    }
}

/// One registered exchange: a slot, a strided window into a field, a scale.
///
/// Built by the registry during registration, frozen once the registry
/// closes, and read by the exchange engines every step.
#[derive(Clone, Debug)]
pub struct ColumnExchange {
    field: FieldId,
    field_name: String,
    slot: SlotIndex,
    span: ColumnSpan,
    scale: f64,
    export_during_init: bool,
}

impl ColumnExchange {
    pub(crate) fn new(
        field: FieldId,
        field_name: String,
        slot: SlotIndex,
        span: ColumnSpan,
        scale: f64,
        export_during_init: bool,
    ) -> Self {
        Self {
            field,
            field_name,
            slot,
            span,
            scale,
            export_during_init,
        }
    }

    /// Catalog id of the exchanged field.
    #[inline]
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Name of the exchanged field.
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Coupler slot this exchange owns.
    #[inline]
    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// Strided window into the field's storage.
    #[inline]
    pub fn span(&self) -> ColumnSpan {
        self.span
    }

    /// Sign/scale multiplier applied on every exchange.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether the quantity may be exported before the first step has run.
    #[inline]
    pub fn export_during_init(&self) -> bool {
        self.export_during_init
    }
}
