//! Address service layer.
//!
//! Business logic for the phone → search → resolve → confirm → commit flow.
//! The service owns no state of its own beyond the last settled search: the
//! collection comes in as an injected [`AddressStore`] handle.

use crate::domain::{AddressId, PhoneNumber};
use crate::error::{AddressError, AddressResult};
use crate::geocoding::Coordinates;
use crate::models::{AddressDetails, AddressRecord};
use crate::search::{LocationCandidate, LocationSearch, SearchOutcome};
use crate::store::AddressStore;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Address service trait for business operations.
#[async_trait]
pub trait AddressService: Send + Sync {
    /// Saved addresses for a contact phone, in collection order.
    ///
    /// Rejects a phone that is not 10 digits with `InvalidPhone`.
    async fn addresses_for_phone(&self, phone: &str) -> AddressResult<Vec<AddressRecord>>;

    /// Every saved address, in collection order.
    async fn list_addresses(&self) -> Vec<AddressRecord>;

    async fn selected_address(&self) -> Option<AddressRecord>;

    /// Debounced location search. Settled results become the candidates
    /// that [`AddressService::draft_from_location`] indexes into.
    async fn search_locations(&self, query: &str) -> SearchOutcome;

    /// Reverse-geocode a point; the results replace the current candidates.
    async fn reverse_geocode(&self, coordinates: Coordinates) -> AddressResult<Vec<LocationCandidate>>;

    /// Build a draft for `phone` from the `index`-th candidate of the last settled search.
    async fn draft_from_location(
        &self,
        phone: &str,
        index: usize,
        base: Option<AddressDetails>,
    ) -> AddressResult<AddressDetails>;

    /// Admit a completed draft.
    async fn create_address(&self, draft: AddressDetails) -> AddressResult<AddressRecord>;

    /// Replace the fields of an existing address.
    async fn update_address(&self, id: &str, details: AddressDetails) -> AddressResult<AddressRecord>;

    /// Delete an address; `None` if it did not exist.
    async fn delete_address(&self, id: &str) -> AddressResult<Option<AddressRecord>>;

    /// Make an address the active one.
    async fn select_address(&self, id: &str) -> AddressResult<AddressRecord>;
}

/// Default implementation of AddressService.
pub struct AddressServiceImpl {
    store: AddressStore,
    search: LocationSearch,
    candidates: RwLock<Vec<LocationCandidate>>,
}

impl AddressServiceImpl {
    /// Create a new address service over a shared store.
    pub fn new(store: AddressStore, search: LocationSearch) -> Self {
        Self {
            store,
            search,
            candidates: RwLock::new(Vec::new()),
        }
    }

    /// Build a draft from a candidate, keeping label and unit from `base`.
    pub fn draft_from_candidate(
        phone: &PhoneNumber,
        candidate: &LocationCandidate,
        base: Option<AddressDetails>,
    ) -> AddressDetails {
        let mut draft = base.unwrap_or_default();
        draft.phone = phone.as_str().to_string();
        draft.apply_fragment(&candidate.fragment);
        draft
    }

    /// A blank id can never name a saved address, so it is reported as not found.
    fn parse_id(id: &str) -> AddressResult<AddressId> {
        AddressId::new(id).map_err(|_| AddressError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl AddressService for AddressServiceImpl {
    async fn addresses_for_phone(&self, phone: &str) -> AddressResult<Vec<AddressRecord>> {
        let phone = PhoneNumber::new(phone)?;
        let store = self.store.read().await;
        Ok(store
            .filter_by_phone(phone.as_str())
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_addresses(&self) -> Vec<AddressRecord> {
        self.store.read().await.iter().cloned().collect()
    }

    async fn selected_address(&self) -> Option<AddressRecord> {
        self.store.read().await.selected().cloned()
    }

    async fn search_locations(&self, query: &str) -> SearchOutcome {
        let ticket = self.search.next_ticket();
        let outcome = self.search.search_as(ticket, query).await;

        if let SearchOutcome::Results(results) = &outcome {
            let mut candidates = self.candidates.write().await;
            // A newer search may have settled between our result and the lock.
            if !self.search.is_current(ticket) {
                return SearchOutcome::Superseded;
            }
            *candidates = results.clone();
        }
        outcome
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> AddressResult<Vec<LocationCandidate>> {
        if !coordinates.is_valid() {
            return Err(AddressError::InvalidRequest(format!(
                "Coordinates out of range: {}, {}",
                coordinates.lat, coordinates.lon
            )));
        }

        let results = self.search.reverse(coordinates).await;
        *self.candidates.write().await = results.clone();
        Ok(results)
    }

    async fn draft_from_location(
        &self,
        phone: &str,
        index: usize,
        base: Option<AddressDetails>,
    ) -> AddressResult<AddressDetails> {
        let phone = PhoneNumber::new(phone)?;
        let candidates = self.candidates.read().await;
        let candidate = candidates.get(index).ok_or_else(|| {
            AddressError::InvalidRequest(format!(
                "No location at index {} (last search returned {})",
                index,
                candidates.len()
            ))
        })?;

        Ok(Self::draft_from_candidate(&phone, candidate, base))
    }

    async fn create_address(&self, draft: AddressDetails) -> AddressResult<AddressRecord> {
        let mut store = self.store.write().await;
        let record = store.add(draft)?.clone();
        tracing::info!(id = %record.id, "Address created");
        Ok(record)
    }

    async fn update_address(&self, id: &str, details: AddressDetails) -> AddressResult<AddressRecord> {
        let id = Self::parse_id(id)?;
        let mut store = self.store.write().await;
        let record = store.update(&id, details)?.clone();
        tracing::info!(id = %record.id, "Address updated");
        Ok(record)
    }

    async fn delete_address(&self, id: &str) -> AddressResult<Option<AddressRecord>> {
        let Ok(id) = Self::parse_id(id) else {
            tracing::debug!(id = %id, "Delete of blank address id ignored");
            return Ok(None);
        };
        let removed = self.store.write().await.remove(&id);
        match &removed {
            Some(record) => tracing::info!(id = %record.id, "Address deleted"),
            None => tracing::debug!(id = %id, "Delete of unknown address ignored"),
        }
        Ok(removed)
    }

    async fn select_address(&self, id: &str) -> AddressResult<AddressRecord> {
        let id = Self::parse_id(id)?;
        let mut store = self.store.write().await;
        let record = store.select(&id)?.clone();
        tracing::info!(id = %record.id, "Address selected");
        Ok(record)
    }
}
