//! Packed scratch storage: pack arithmetic, packed views, and the arena.
//!
//! - [`pack_count`] / [`padded_len`]: the one place padded sizes come from
//! - [`PackedViewMut`]: a [columns × padded levels] window over borrowed
//!   memory
//! - [`ArenaLayout`] / [`ScratchViews`]: declared carve plan over one
//!   caller-owned allocation, with byte-exact consumption checking

mod arena;
mod packing;
mod views;

pub use arena::{ArenaError, ArenaLayout, ScratchViews, ViewSpec};
pub use packing::{pack_count, padded_len};
pub use views::PackedViewMut;
