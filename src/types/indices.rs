//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up different kinds of indices
//! (column vs coupler slot vs vertical level vs vector component).

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        // Allow using as array index
        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Horizontal column index.
    ///
    /// Identifies one grid column owned by the local rank. Both the model's
    /// field storage and the coupler's flat buffer are addressed per column.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_coupling::types::ColumnIndex;
    ///
    /// let col = ColumnIndex::new(42);
    /// assert_eq!(col.get(), 42);
    /// ```
    ColumnIndex,
    "C"
);

define_index!(
    /// Slot index into the coupler's per-column array of exchanged scalars.
    ///
    /// Slot numbering is dictated by the external coupler; within one
    /// exchange direction every registered quantity owns exactly one slot.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_coupling::types::SlotIndex;
    ///
    /// let slot = SlotIndex::new(7);
    /// assert_eq!(slot.get(), 7);
    /// ```
    SlotIndex,
    "S"
);

define_index!(
    /// Vertical level index.
    ///
    /// Counts midpoint levels from the model top; interface quantities carry
    /// one extra level.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_coupling::types::LevelIndex;
    ///
    /// let lev = LevelIndex::new(5);
    /// assert_eq!(lev.get(), 5);
    /// ```
    LevelIndex,
    "L"
);

define_index!(
    /// Vector component index within a multi-component field.
    ///
    /// Component 0 is the zonal part of a horizontal vector, component 1
    /// the meridional part. Scalar fields have no component index.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_coupling::types::ComponentIndex;
    ///
    /// let comp = ComponentIndex::new(1);
    /// assert_eq!(comp.get(), 1);
    /// ```
    ComponentIndex,
    "V"
);

// =============================================================================
// Iterator support
// =============================================================================

impl ColumnIndex {
    /// Create an iterator over [0, n) column indices.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_coupling::types::ColumnIndex;
    ///
    /// let indices: Vec<_> = ColumnIndex::iter(5).collect();
    /// assert_eq!(indices.len(), 5);
    /// assert_eq!(indices[4].get(), 4);
    /// ```
    pub fn iter(n: usize) -> impl Iterator<Item = ColumnIndex> + ExactSizeIterator {
        (0..n).map(ColumnIndex)
    }
}

impl SlotIndex {
    /// Create an iterator over [0, n) slot indices.
    pub fn iter(n: usize) -> impl Iterator<Item = SlotIndex> + ExactSizeIterator {
        (0..n).map(SlotIndex)
    }
}

impl LevelIndex {
    /// Create an iterator over [0, n) level indices.
    pub fn iter(n: usize) -> impl Iterator<Item = LevelIndex> + ExactSizeIterator {
        (0..n).map(LevelIndex)
    }
}

impl ComponentIndex {
    /// Decode a signed component selector from the coupler's setup arrays.
    ///
    /// Negative values mean "not applicable / scalar" by convention.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_coupling::types::ComponentIndex;
    ///
    /// assert_eq!(ComponentIndex::from_signed(-1), None);
    /// assert_eq!(ComponentIndex::from_signed(1), Some(ComponentIndex::new(1)));
    /// ```
    #[inline]
    pub fn from_signed(raw: i32) -> Option<ComponentIndex> {
        (raw >= 0).then(|| ComponentIndex(raw as usize))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let idx = ColumnIndex::new(42);
        assert_eq!(idx.get(), 42);
        assert_eq!(usize::from(idx), 42);
    }

    #[test]
    fn test_array_indexing() {
        let data = vec![10, 20, 30, 40, 50];
        let idx = ColumnIndex::new(2);
        assert_eq!(data[idx], 30);
    }

    #[test]
    fn test_array_indexing_mut() {
        let mut data = vec![10, 20, 30, 40, 50];
        let idx = SlotIndex::new(2);
        data[idx] = 100;
        assert_eq!(data[2], 100);
    }

    #[test]
    fn test_column_index_iter() {
        let indices: Vec<_> = ColumnIndex::iter(5).collect();
        assert_eq!(indices.len(), 5);
        assert_eq!(indices[0].get(), 0);
        assert_eq!(indices[4].get(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ColumnIndex::new(42)), "C42");
        assert_eq!(format!("{}", SlotIndex::new(10)), "S10");
        assert_eq!(format!("{}", LevelIndex::new(5)), "L5");
        assert_eq!(format!("{}", ComponentIndex::new(1)), "V1");
    }

    #[test]
    fn test_from_conversions() {
        let col: ColumnIndex = 42.into();
        assert_eq!(col.get(), 42);

        let back: usize = col.into();
        assert_eq!(back, 42);
    }

    #[test]
    fn test_component_from_signed() {
        assert_eq!(ComponentIndex::from_signed(-1), None);
        assert_eq!(ComponentIndex::from_signed(-7), None);
        assert_eq!(ComponentIndex::from_signed(0), Some(ComponentIndex::new(0)));
        assert_eq!(ComponentIndex::from_signed(1), Some(ComponentIndex::new(1)));
    }
}
