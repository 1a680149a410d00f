//! Named, laid-out, allocatable field storage.
//!
//! A [`Field`] owns (once allocated) one contiguous `Vec<f64>` shaped by its
//! [`FieldLayout`] and packing width: column-major, vertical dimension
//! fastest, trailing vertical extent padded to whole packs. Fields start
//! unallocated; the coupling registries refuse to build exchange descriptors
//! against unallocated fields, so allocation order mistakes surface as
//! errors instead of reads of missing storage.

use super::error::FieldError;
use super::layout::FieldLayout;

/// Who produces a field's values, from the coupling layer's point of view.
///
/// The distinction matters once per run: quantities the model itself computes
/// hold garbage until the first step has run, so their export descriptors are
/// not eligible during the initialization pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldIntent {
    /// Read by the model; produced elsewhere (e.g. imported from the coupler).
    Required,
    /// Produced by the model; invalid before the first step completes.
    Computed,
    /// Read and written by the model; carries a valid initial condition.
    Updated,
}

impl FieldIntent {
    /// True for quantities the model itself produces.
    #[inline]
    pub fn is_computed(self) -> bool {
        matches!(self, FieldIntent::Computed)
    }
}

/// A named storage block with layout, intent and optional allocation.
///
/// # Example
///
/// ```
/// use surface_coupling::field::{Field, FieldIntent, FieldLayout, Unit};
///
/// let layout = FieldLayout::midpoint_scalar("physics", 4, 72, Unit::KELVIN);
/// let mut t_mid = Field::new("T_mid", layout, FieldIntent::Updated, 16);
/// assert!(!t_mid.is_allocated());
///
/// t_mid.allocate();
/// assert!(t_mid.is_allocated());
/// assert_eq!(t_mid.column_stride(), 80); // 72 levels padded to 5 packs of 16
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    layout: FieldLayout,
    intent: FieldIntent,
    pack_width: usize,
    data: Option<Vec<f64>>,
}

impl Field {
    /// Reserved sentinel for storage that has never been written.
    ///
    /// NaN propagates through arithmetic and fails ordered comparisons, so a
    /// read of never-written storage is detectable downstream instead of
    /// silently looking like a plausible value.
    pub const INVALID: f64 = f64::NAN;

    /// Describe a field without allocating it.
    ///
    /// `pack_width` is the SIMD packing the allocation will use for the
    /// trailing vertical dimension (1 = unpadded).
    pub fn new(
        name: impl Into<String>,
        layout: FieldLayout,
        intent: FieldIntent,
        pack_width: usize,
    ) -> Self {
        Self {
            name: name.into(),
            layout,
            intent,
            pack_width: pack_width.max(1),
            data: None,
        }
    }

    /// Field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field layout.
    #[inline]
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Producer intent.
    #[inline]
    pub fn intent(&self) -> FieldIntent {
        self.intent
    }

    /// Packing width of the (eventual) allocation.
    #[inline]
    pub fn pack_width(&self) -> usize {
        self.pack_width
    }

    /// Whether storage has been allocated.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Element distance between the starts of consecutive columns.
    ///
    /// Equals the padded per-column scalar count, which exceeds the logical
    /// count whenever the vertical extent is not a multiple of the packing
    /// width.
    #[inline]
    pub fn column_stride(&self) -> usize {
        self.layout.padded_scalars_per_column(self.pack_width)
    }

    /// Allocate storage, filled with [`Field::INVALID`].
    ///
    /// Idempotent: re-allocating an allocated field keeps existing data.
    pub fn allocate(&mut self) {
        if self.data.is_none() {
            self.data = Some(vec![Self::INVALID; self.layout.alloc_len(self.pack_width)]);
        }
    }

    /// Overwrite every element (including padding) with `value`.
    pub fn fill(&mut self, value: f64) -> Result<(), FieldError> {
        self.data_mut()?.fill(value);
        Ok(())
    }

    /// Read access to allocated storage.
    pub fn data(&self) -> Result<&[f64], FieldError> {
        self.data
            .as_deref()
            .ok_or_else(|| FieldError::NotAllocated {
                name: self.name.clone(),
            })
    }

    /// Write access to allocated storage.
    pub fn data_mut(&mut self) -> Result<&mut [f64], FieldError> {
        match &mut self.data {
            Some(data) => Ok(data.as_mut_slice()),
            None => Err(FieldError::NotAllocated {
                name: self.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Unit;

    fn profile_field() -> Field {
        let layout = FieldLayout::midpoint_scalar("physics", 4, 6, Unit::KELVIN);
        Field::new("T_mid", layout, FieldIntent::Updated, 4)
    }

    #[test]
    fn test_unallocated_access_fails() {
        let field = profile_field();
        assert!(!field.is_allocated());
        assert!(matches!(
            field.data(),
            Err(FieldError::NotAllocated { .. })
        ));
    }

    #[test]
    fn test_allocation_fills_sentinel() {
        let mut field = profile_field();
        field.allocate();
        assert!(field.is_allocated());

        // 6 levels padded to 2 packs of 4 -> stride 8, 4 columns.
        assert_eq!(field.column_stride(), 8);
        let data = field.data().unwrap();
        assert_eq!(data.len(), 32);
        assert!(data.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_allocate_is_idempotent() {
        let mut field = profile_field();
        field.allocate();
        field.fill(4.0).unwrap();
        field.allocate();
        assert!(field.data().unwrap().iter().all(|&v| v == 4.0));
    }

    #[test]
    fn test_intent_flags() {
        assert!(FieldIntent::Computed.is_computed());
        assert!(!FieldIntent::Required.is_computed());
        assert!(!FieldIntent::Updated.is_computed());
    }

    #[test]
    fn test_pack_width_floor() {
        let layout = FieldLayout::surface_scalar("physics", 4, Unit::NONDIM);
        let field = Field::new("ps", layout, FieldIntent::Required, 0);
        assert_eq!(field.pack_width(), 1);
        assert_eq!(field.column_stride(), 1);
    }
}
