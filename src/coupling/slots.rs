//! Setup-boundary decode of the coupler's per-slot metadata.
//!
//! The coupler hands over three parallel arrays describing its slots: a
//! flat name buffer (one fixed-width, null-terminated record per slot), a
//! signed vector-component selector per slot (−1 = scalar), and a constant
//! multiple per slot (1.0 = no override). The raw form is C-shaped and easy
//! to mis-slice, so it is decoded exactly once, here, into owned validated
//! [`SlotSpec`]s; everything downstream compares names by value.
//!
//! Decode is strict about record shape: a record with no terminator, with
//! non-NUL bytes after the terminator, or with non-UTF-8 name bytes is
//! rejected at the boundary rather than propagated. An all-NUL record
//! decodes to an empty name and fails later, at registration, as an unknown
//! field.

use thiserror::Error;

use crate::types::{ComponentIndex, SlotIndex};

/// Fixed byte width of one slot-name record.
pub const NAME_RECORD_LEN: usize = 32;

/// Errors from decoding the coupler's slot metadata arrays.
#[derive(Error, Debug)]
pub enum SlotDecodeError {
    /// Name buffer length is not a whole number of records.
    #[error(
        "name buffer holds {bytes} bytes, not a whole number of \
         {NAME_RECORD_LEN}-byte records"
    )]
    RaggedNameBuffer { bytes: usize },

    /// The three per-slot arrays disagree on the slot count.
    #[error(
        "slot arrays disagree: {names} name records, {components} component \
         selectors, {multiples} constant multiples"
    )]
    LengthMismatch {
        names: usize,
        components: usize,
        multiples: usize,
    },

    /// A name record has no NUL terminator.
    #[error("slot {slot}: name record has no NUL terminator")]
    MissingTerminator { slot: usize },

    /// Non-NUL bytes follow the name terminator.
    #[error("slot {slot}: non-NUL padding after the name terminator")]
    DirtyPadding { slot: usize },

    /// Name bytes are not valid UTF-8.
    #[error("slot {slot}: name is not valid UTF-8")]
    InvalidUtf8 { slot: usize },

    /// A constant multiple is NaN or infinite.
    #[error("slot {slot} ('{name}'): constant multiple {value} is not finite")]
    NonFiniteMultiple {
        slot: usize,
        name: String,
        value: f64,
    },
}

/// Decoded metadata for one coupler slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotSpec {
    name: String,
    component: Option<ComponentIndex>,
    multiple: f64,
}

impl SlotSpec {
    /// Build a spec directly (drivers that never cross the C boundary).
    pub fn new(name: impl Into<String>, component: Option<ComponentIndex>, multiple: f64) -> Self {
        Self {
            name: name.into(),
            component,
            multiple,
        }
    }

    /// Scalar slot with no scale override.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, None, 1.0)
    }

    /// Field name the slot exchanges.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selected vector component, if the field is multi-component.
    #[inline]
    pub fn component(&self) -> Option<ComponentIndex> {
        self.component
    }

    /// Constant multiple (1.0 = no override).
    #[inline]
    pub fn multiple(&self) -> f64 {
        self.multiple
    }
}

/// All slots of one exchange direction, in coupler slot order.
///
/// The position of a spec in the table is its slot index.
///
/// # Example
///
/// ```
/// use surface_coupling::coupling::{SlotTable, NAME_RECORD_LEN};
///
/// let mut names = vec![0_u8; 2 * NAME_RECORD_LEN];
/// names[..4].copy_from_slice(b"T_2m");
/// names[NAME_RECORD_LEN..NAME_RECORD_LEN + 6].copy_from_slice(b"unused");
///
/// let table = SlotTable::decode(&names, &[-1, -1], &[1.0, 1.0]).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.spec(0.into()).name(), "T_2m");
/// ```
#[derive(Clone, Debug, Default)]
pub struct SlotTable {
    slots: Vec<SlotSpec>,
}

impl SlotTable {
    /// Decode the coupler's parallel metadata arrays.
    pub fn decode(
        names: &[u8],
        components: &[i32],
        multiples: &[f64],
    ) -> Result<Self, SlotDecodeError> {
        if names.len() % NAME_RECORD_LEN != 0 {
            return Err(SlotDecodeError::RaggedNameBuffer { bytes: names.len() });
        }
        let n = names.len() / NAME_RECORD_LEN;
        if components.len() != n || multiples.len() != n {
            return Err(SlotDecodeError::LengthMismatch {
                names: n,
                components: components.len(),
                multiples: multiples.len(),
            });
        }

        let mut slots = Vec::with_capacity(n);
        for (slot, (record, (&comp, &multiple))) in names
            .chunks_exact(NAME_RECORD_LEN)
            .zip(components.iter().zip(multiples.iter()))
            .enumerate()
        {
            let name = decode_record(slot, record)?;
            if !multiple.is_finite() {
                return Err(SlotDecodeError::NonFiniteMultiple {
                    slot,
                    name,
                    value: multiple,
                });
            }
            slots.push(SlotSpec::new(
                name,
                ComponentIndex::from_signed(comp),
                multiple,
            ));
        }
        Ok(Self { slots })
    }

    /// Build a table from already-decoded specs.
    pub fn from_specs(slots: Vec<SlotSpec>) -> Self {
        Self { slots }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Spec for one slot.
    #[inline]
    pub fn spec(&self, slot: SlotIndex) -> &SlotSpec {
        &self.slots[slot.get()]
    }

    /// (slot index, spec) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &SlotSpec)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (SlotIndex::new(i), s))
    }
}

/// Decode one fixed-width record into an owned name.
fn decode_record(slot: usize, record: &[u8]) -> Result<String, SlotDecodeError> {
    let nul = record
        .iter()
        .position(|&b| b == 0)
        .ok_or(SlotDecodeError::MissingTerminator { slot })?;
    if record[nul..].iter().any(|&b| b != 0) {
        return Err(SlotDecodeError::DirtyPadding { slot });
    }
    std::str::from_utf8(&record[..nul])
        .map(str::to_owned)
        .map_err(|_| SlotDecodeError::InvalidUtf8 { slot })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pack names into fixed-width NUL-padded records.
    fn pack_names(names: &[&str]) -> Vec<u8> {
        let mut buf = vec![0_u8; names.len() * NAME_RECORD_LEN];
        for (i, name) in names.iter().enumerate() {
            let start = i * NAME_RECORD_LEN;
            buf[start..start + name.len()].copy_from_slice(name.as_bytes());
        }
        buf
    }

    #[test]
    fn test_decode_names_components_multiples() {
        let names = pack_names(&["surf_mom_flux", "T_2m", "unused"]);
        let table = SlotTable::decode(&names, &[1, -1, -1], &[-1.0, 1.0, 1.0]).unwrap();

        assert_eq!(table.len(), 3);
        let first = table.spec(SlotIndex::new(0));
        assert_eq!(first.name(), "surf_mom_flux");
        assert_eq!(first.component(), Some(ComponentIndex::new(1)));
        assert_eq!(first.multiple(), -1.0);

        let second = table.spec(SlotIndex::new(1));
        assert_eq!(second.component(), None);
        assert_eq!(second.multiple(), 1.0);
    }

    #[test]
    fn test_all_nul_record_is_empty_name() {
        let names = vec![0_u8; NAME_RECORD_LEN];
        let table = SlotTable::decode(&names, &[-1], &[1.0]).unwrap();
        assert_eq!(table.spec(SlotIndex::new(0)).name(), "");
    }

    #[test]
    fn test_missing_terminator_rejected() {
        let names = vec![b'x'; NAME_RECORD_LEN];
        let err = SlotTable::decode(&names, &[-1], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            SlotDecodeError::MissingTerminator { slot: 0 }
        ));
    }

    #[test]
    fn test_dirty_padding_rejected() {
        let mut names = pack_names(&["qv_2m"]);
        names[10] = b'!';
        let err = SlotTable::decode(&names, &[-1], &[1.0]).unwrap_err();
        assert!(matches!(err, SlotDecodeError::DirtyPadding { slot: 0 }));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut names = pack_names(&["abcd"]);
        names[1] = 0xFF;
        let err = SlotTable::decode(&names, &[-1], &[1.0]).unwrap_err();
        assert!(matches!(err, SlotDecodeError::InvalidUtf8 { slot: 0 }));
    }

    #[test]
    fn test_length_agreement_enforced() {
        let names = pack_names(&["T_2m", "qv_2m"]);
        assert!(matches!(
            SlotTable::decode(&names, &[-1], &[1.0, 1.0]),
            Err(SlotDecodeError::LengthMismatch {
                names: 2,
                components: 1,
                multiples: 2
            })
        ));

        assert!(matches!(
            SlotTable::decode(&names[..NAME_RECORD_LEN + 3], &[-1, -1], &[1.0, 1.0]),
            Err(SlotDecodeError::RaggedNameBuffer { .. })
        ));
    }

    #[test]
    fn test_non_finite_multiple_rejected() {
        let names = pack_names(&["surf_sens_flux"]);
        let err = SlotTable::decode(&names, &[-1], &[f64::NAN]).unwrap_err();
        assert!(matches!(err, SlotDecodeError::NonFiniteMultiple { .. }));
    }

    #[test]
    fn test_full_width_name_minus_terminator() {
        // 31 name bytes + 1 terminator fills the record exactly.
        let long = "a".repeat(NAME_RECORD_LEN - 1);
        let names = pack_names(&[long.as_str()]);
        let table = SlotTable::decode(&names, &[-1], &[1.0]).unwrap();
        assert_eq!(table.spec(SlotIndex::new(0)).name().len(), 31);
    }
}
