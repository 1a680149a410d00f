//! Scratch arena: one caller-owned allocation carved into packed views.
//!
//! Derived quantities that only live inside the coupling layer (layer
//! thickness, mid-level and interface heights) do not get ordinary fields;
//! they share one flat scratch allocation supplied by the caller. The
//! [`ArenaLayout`] declares the views up front, reports the exact memory
//! requirement, and carves the caller's buffer in declared order.
//!
//! Two guarantees back the carve:
//!
//! 1. `partition` refuses memory smaller than [`ArenaLayout::requested_size`].
//! 2. After carving, the bytes actually consumed must equal the requested
//!    size exactly; any disagreement between the sizing arithmetic and the
//!    carve loop is a fatal configuration error, not something to round
//!    away.
//!
//! The arena never allocates and never frees: views borrow the caller's
//! memory for exactly as long as the caller lets them.
//!
//! # Example
//!
//! ```
//! use surface_coupling::buffer::ArenaLayout;
//!
//! let plan = ArenaLayout::new(8, 16)
//!     .with_view("dz", 72)
//!     .with_view("z_mid", 72)
//!     .with_view("z_int", 73);
//!
//! let mut memory = vec![0.0_f64; plan.requested_elems()];
//! let views = plan.partition(&mut memory).unwrap();
//! assert_eq!(views.len(), 3);
//! assert_eq!(views.get("z_int").unwrap().n_levels(), 73);
//! ```

use thiserror::Error;

use super::packing::padded_len;
use super::views::PackedViewMut;

/// Errors from arena sizing and partitioning.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// Caller-supplied memory is smaller than the computed requirement.
    #[error("scratch arena needs {requested} bytes but only {supplied} were supplied")]
    TooSmall { requested: usize, supplied: usize },

    /// The carve consumed a different amount than the sizing promised.
    #[error(
        "scratch arena partition consumed {consumed} bytes but sizing requested {requested}; \
         the view plan and the sizing arithmetic disagree"
    )]
    PartitionMismatch { consumed: usize, requested: usize },

    /// Two views share a name; lookups would alias.
    #[error("duplicate scratch view name '{name}'")]
    DuplicateView { name: String },
}

/// One declared sub-view: a [columns × padded levels] packed 2-D array.
#[derive(Clone, Debug)]
pub struct ViewSpec {
    name: String,
    n_levels: usize,
}

impl ViewSpec {
    /// View name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical levels per column.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }
}

/// Declared partition plan for one scratch allocation.
#[derive(Clone, Debug)]
pub struct ArenaLayout {
    n_columns: usize,
    pack_width: usize,
    views: Vec<ViewSpec>,
}

impl ArenaLayout {
    /// Start an empty plan for `n_columns` columns packed at `pack_width`.
    pub fn new(n_columns: usize, pack_width: usize) -> Self {
        Self {
            n_columns,
            pack_width: pack_width.max(1),
            views: Vec::new(),
        }
    }

    /// Declare the next view in carve order: `n_levels` logical levels per
    /// column, padded to whole packs.
    pub fn with_view(mut self, name: impl Into<String>, n_levels: usize) -> Self {
        self.views.push(ViewSpec {
            name: name.into(),
            n_levels,
        });
        self
    }

    /// Number of declared views.
    #[inline]
    pub fn n_views(&self) -> usize {
        self.views.len()
    }

    /// The declared views in carve order.
    #[inline]
    pub fn view_specs(&self) -> &[ViewSpec] {
        &self.views
    }

    /// Packing width of every view.
    #[inline]
    pub fn pack_width(&self) -> usize {
        self.pack_width
    }

    /// Exact element count the plan needs.
    pub fn requested_elems(&self) -> usize {
        self.views
            .iter()
            .map(|v| self.n_columns * padded_len(v.n_levels, self.pack_width))
            .sum()
    }

    /// Exact byte count the plan needs.
    pub fn requested_size(&self) -> usize {
        self.requested_elems() * size_of::<f64>()
    }

    /// Carve `memory` into the declared views, in declared order.
    ///
    /// Fails if `memory` is smaller than the requirement, if two views share
    /// a name, or if the carve consumes anything other than exactly
    /// [`ArenaLayout::requested_size`]. Memory beyond the requirement is
    /// left untouched (the caller may be handing out windows of a larger
    /// pool).
    pub fn partition<'a>(&self, memory: &'a mut [f64]) -> Result<ScratchViews<'a>, ArenaError> {
        let requested = self.requested_size();
        let supplied = size_of_val(memory);
        if supplied < requested {
            return Err(ArenaError::TooSmall {
                requested,
                supplied,
            });
        }
        for (i, spec) in self.views.iter().enumerate() {
            if self.views[..i].iter().any(|v| v.name == spec.name) {
                return Err(ArenaError::DuplicateView {
                    name: spec.name.clone(),
                });
            }
        }

        let mut views = Vec::with_capacity(self.views.len());
        let mut consumed = 0;
        let mut rest = memory;
        for spec in &self.views {
            let row_stride = padded_len(spec.n_levels, self.pack_width);
            let len = self.n_columns * row_stride;
            let (window, tail) = rest.split_at_mut(len);
            consumed += size_of_val(window);
            views.push((
                spec.name.clone(),
                PackedViewMut::new(window, self.n_columns, spec.n_levels, row_stride),
            ));
            rest = tail;
        }

        if consumed != requested {
            return Err(ArenaError::PartitionMismatch {
                consumed,
                requested,
            });
        }
        Ok(ScratchViews { views })
    }
}

/// The carved views, borrowing the caller's memory.
#[derive(Debug)]
pub struct ScratchViews<'a> {
    views: Vec<(String, PackedViewMut<'a>)>,
}

impl<'a> ScratchViews<'a> {
    /// Number of views.
    #[inline]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the plan declared no views.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Look up a view by name.
    pub fn get(&self, name: &str) -> Option<&PackedViewMut<'a>> {
        self.views.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a view by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PackedViewMut<'a>> {
        self.views
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Views in carve order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PackedViewMut<'a>)> {
        self.views.iter_mut().map(|(n, v)| (n.as_str(), v))
    }
}
