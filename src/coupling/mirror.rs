//! Device-side mirror of the coupler's flat buffer.
//!
//! The coupler owns the primary buffer in host memory; the exchange passes
//! run against an owned mirror playing the device side. Synchronization is
//! explicit and happens only at the two defined points: the import engine
//! pulls host→mirror before its pass so the model consumes fully
//! transferred data, and the export engine pushes mirror→host after its
//! pass so the coupler observes pass-complete data. Neither transfer ever
//! happens inside a parallel pass.
//!
//! Addressing matches the coupler's convention: row-major
//! [columns × slots], slot index fastest within a column.

use crate::types::{ColumnIndex, SlotIndex};

use super::error::CouplingError;

/// Owned [columns × slots] image of the coupler buffer.
#[derive(Clone, Debug)]
pub struct DeviceMirror {
    data: Vec<f64>,
    n_columns: usize,
    n_slots: usize,
}

impl DeviceMirror {
    /// Allocate a zero-filled mirror.
    pub fn new(n_columns: usize, n_slots: usize) -> Self {
        Self {
            data: vec![0.0; n_columns * n_slots],
            n_columns,
            n_slots,
        }
    }

    /// Number of columns (rows).
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Slots per column (row length).
    #[inline]
    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    /// One (column, slot) value.
    #[inline]
    pub fn get(&self, col: ColumnIndex, slot: SlotIndex) -> f64 {
        self.data[col.get() * self.n_slots + slot.get()]
    }

    /// Overwrite one (column, slot) value.
    #[inline]
    pub fn set(&mut self, col: ColumnIndex, slot: SlotIndex, value: f64) {
        self.data[col.get() * self.n_slots + slot.get()] = value;
    }

    /// One column's slot row.
    #[inline]
    pub fn row(&self, col: ColumnIndex) -> &[f64] {
        let start = col.get() * self.n_slots;
        &self.data[start..start + self.n_slots]
    }

    /// Flat mirror storage, for row-chunked passes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Copy the host buffer into the mirror (import synchronization).
    pub fn pull_from_host(&mut self, host: &[f64]) -> Result<(), CouplingError> {
        self.check_host_len(host.len())?;
        self.data.copy_from_slice(host);
        Ok(())
    }

    /// Copy the mirror into the host buffer (export synchronization).
    pub fn push_to_host(&self, host: &mut [f64]) -> Result<(), CouplingError> {
        self.check_host_len(host.len())?;
        host.copy_from_slice(&self.data);
        Ok(())
    }

    fn check_host_len(&self, len: usize) -> Result<(), CouplingError> {
        let expected = self.n_columns * self.n_slots;
        if len != expected {
            return Err(CouplingError::CouplerSizeMismatch {
                len,
                expected,
                columns: self.n_columns,
                slots: self.n_slots,
            });
        }
        Ok(())
    }
}
