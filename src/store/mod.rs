//! Address storage.
//!
//! The collection is a plain owned value. Consumers that need to share it get
//! an [`AddressStore`] handle injected rather than reaching for a global.

mod collection;

pub use collection::AddressCollection;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to an [`AddressCollection`].
pub type AddressStore = Arc<RwLock<AddressCollection>>;

/// Create a fresh, empty store.
pub fn new_store() -> AddressStore {
    Arc::new(RwLock::new(AddressCollection::new()))
}
