//! In-memory collection of saved addresses.

use crate::domain::AddressId;
use crate::error::{AddressError, AddressResult};
use crate::models::{AddressDetails, AddressRecord};
use crate::validation;

/// Ordered, process-lifetime collection of address records.
///
/// Owns the identity and selection invariants:
/// - ids are unique and never reused within one collection
/// - at most one record has `is_selected == true`
/// - only complete addresses are admitted
///
/// Every mutation takes `&mut self` and completes in one call, so a shared
/// handle behind a lock never exposes an intermediate state.
#[derive(Debug, Default)]
pub struct AddressCollection {
    records: Vec<AddressRecord>,
    next_sequence: u64,
}

impl AddressCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a draft, assigning a fresh id. The new record is not selected.
    pub fn add(&mut self, draft: AddressDetails) -> AddressResult<&AddressRecord> {
        ensure_complete(&draft)?;

        self.next_sequence += 1;
        let id = AddressId::from_sequence(self.next_sequence);
        tracing::debug!(id = %id, phone = %draft.phone, "Adding address");

        let index = self.records.len();
        self.records.push(AddressRecord {
            id,
            details: draft,
            is_selected: false,
        });

        Ok(&self.records[index])
    }

    /// Replace the fields of an existing record in place.
    ///
    /// Position and selection state are preserved.
    pub fn update(&mut self, id: &AddressId, details: AddressDetails) -> AddressResult<&AddressRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| AddressError::NotFound(id.to_string()))?;
        ensure_complete(&details)?;

        tracing::debug!(id = %id, "Updating address");
        let record = &mut self.records[index];
        record.details = details;
        Ok(record)
    }

    /// Remove a record. Unknown ids are a no-op and return `None`.
    ///
    /// Removing the selected record leaves nothing selected.
    pub fn remove(&mut self, id: &AddressId) -> Option<AddressRecord> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        tracing::debug!(id = %id, was_selected = removed.is_selected, "Removed address");
        Some(removed)
    }

    /// Mark one record selected and every other record unselected.
    pub fn select(&mut self, id: &AddressId) -> AddressResult<&AddressRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| AddressError::NotFound(id.to_string()))?;

        for (i, record) in self.records.iter_mut().enumerate() {
            record.is_selected = i == index;
        }

        tracing::debug!(id = %id, "Selected address");
        Ok(&self.records[index])
    }

    /// Records whose phone equals `phone` exactly, in collection order.
    pub fn filter_by_phone(&self, phone: &str) -> Vec<&AddressRecord> {
        self.records
            .iter()
            .filter(|record| record.phone() == phone)
            .collect()
    }

    pub fn get(&self, id: &AddressId) -> Option<&AddressRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// The currently selected record, if any.
    pub fn selected(&self) -> Option<&AddressRecord> {
        self.records.iter().find(|record| record.is_selected)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddressRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &AddressId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }
}

fn ensure_complete(details: &AddressDetails) -> AddressResult<()> {
    let missing = validation::missing_fields(details);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AddressError::ValidationFailed {
            fields: missing.into_iter().map(str::to_string).collect(),
        })
    }
}
