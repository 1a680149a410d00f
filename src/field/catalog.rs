//! Field catalog: the owner of named field storage.
//!
//! The catalog is deliberately small. It owns [`Field`]s, hands out stable
//! [`FieldId`]s, and answers the three questions the coupling layer asks:
//! does this name exist, is it allocated, and where is its data. Everything
//! else about field management (remaps, I/O, time levels) belongs to the
//! surrounding model, not here.
//!
//! Helper fields (quantities derived for the coupler's benefit and never
//! published to the rest of the model) are created through
//! [`FieldCatalog::create_helper`], which allocates immediately and fills
//! with the invalid sentinel so a read before the producer has run is
//! detectable.

use std::collections::HashMap;

use super::error::FieldError;
use super::field::{Field, FieldIntent};
use super::layout::FieldLayout;

/// Stable handle to a field in one catalog.
///
/// Ids are positions in insertion order and remain valid for the catalog's
/// lifetime (the catalog is insert-only).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    /// Raw index into the catalog's insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Insert-only registry of named fields.
///
/// # Example
///
/// ```
/// use surface_coupling::field::{Field, FieldCatalog, FieldIntent, FieldLayout, Unit};
///
/// let mut catalog = FieldCatalog::new();
/// let layout = FieldLayout::surface_scalar("physics", 4, Unit::KELVIN);
/// let mut t_2m = Field::new("T_2m", layout, FieldIntent::Required, 1);
/// t_2m.allocate();
///
/// let id = catalog.insert(t_2m).unwrap();
/// assert_eq!(catalog.field(id).name(), "T_2m");
/// assert!(catalog.get("T_2m").is_some());
/// ```
#[derive(Debug, Default)]
pub struct FieldCatalog {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert a field, failing on a duplicate name.
    pub fn insert(&mut self, field: Field) -> Result<FieldId, FieldError> {
        if self.by_name.contains_key(field.name()) {
            return Err(FieldError::DuplicateField {
                name: field.name().to_string(),
            });
        }
        let id = FieldId(self.fields.len());
        self.by_name.insert(field.name().to_string(), id.0);
        self.fields.push(field);
        Ok(id)
    }

    /// Create, allocate and insert a helper field.
    ///
    /// Helper fields are model-computed by definition and come back filled
    /// with [`Field::INVALID`].
    pub fn create_helper(
        &mut self,
        name: impl Into<String>,
        layout: FieldLayout,
        pack_width: usize,
    ) -> Result<FieldId, FieldError> {
        let mut field = Field::new(name, layout, FieldIntent::Computed, pack_width);
        field.allocate();
        self.insert(field)
    }

    /// Id for a name, if present.
    pub fn id_of(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied().map(FieldId)
    }

    /// Field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.id_of(name).map(|id| &self.fields[id.0])
    }

    /// Mutable field by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        let idx = self.by_name.get(name).copied()?;
        Some(&mut self.fields[idx])
    }

    /// Field by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different catalog.
    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    /// Read access to a field's data by id.
    pub fn data(&self, id: FieldId) -> Result<&[f64], FieldError> {
        self.fields[id.0].data()
    }

    /// Write access to a field's data by id.
    pub fn data_mut(&mut self, id: FieldId) -> Result<&mut [f64], FieldError> {
        self.fields[id.0].data_mut()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}
