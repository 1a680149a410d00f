//! Vertical-level packing arithmetic.
//!
//! Profile storage groups vertical levels into fixed-width packs so that
//! level loops vectorize. A profile of `n` levels therefore occupies
//! `pack_count(n, w) × w` scalars per column, the last pack possibly
//! part-padding. All padded sizing in the crate funnels through these two
//! helpers so the arena's `requested_size` and the field allocator can never
//! disagree on rounding.

/// Number of packs of `pack_width` needed to hold `n` scalars.
///
/// A width of 0 is treated as 1 (unpacked).
///
/// # Example
///
/// ```
/// use surface_coupling::buffer::pack_count;
///
/// assert_eq!(pack_count(72, 16), 5);
/// assert_eq!(pack_count(80, 16), 5);
/// assert_eq!(pack_count(1, 16), 1);
/// ```
#[inline]
pub const fn pack_count(n: usize, pack_width: usize) -> usize {
    let w = if pack_width == 0 { 1 } else { pack_width };
    n.div_ceil(w)
}

/// `n` rounded up to a whole number of packs of `pack_width`.
///
/// # Example
///
/// ```
/// use surface_coupling::buffer::padded_len;
///
/// assert_eq!(padded_len(72, 16), 80);
/// assert_eq!(padded_len(64, 16), 64);
/// ```
#[inline]
pub const fn padded_len(n: usize, pack_width: usize) -> usize {
    let w = if pack_width == 0 { 1 } else { pack_width };
    pack_count(n, w) * w
}
