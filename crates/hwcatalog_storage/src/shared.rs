//! A catalog shared between concurrent readers and serialized writers.

use hwcatalog_foundation::Result;
use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::Catalog;

/// Holds the current catalog snapshot behind a reader-writer lock.
///
/// Readers take an O(1) snapshot and query it without holding the lock.
/// Writers are serialized: an update either publishes a complete new
/// snapshot or, on error, leaves the current one in place.
#[derive(Debug, Default)]
pub struct SharedCatalog {
    current: RwLock<Catalog>,
}

impl SharedCatalog {
    /// Creates a shared catalog starting from `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(catalog),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Catalog {
        self.current.read().clone()
    }

    /// Applies a mutation to the current snapshot and publishes the result.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error; the published snapshot is unchanged.
    pub fn update<T>(&self, mutate: impl FnOnce(&Catalog) -> Result<(Catalog, T)>) -> Result<T> {
        let mut guard = self.current.write();
        let (next, output) = mutate(&*guard)?;
        *guard = next;
        debug!(entities = guard.entity_count(), "published catalog snapshot");
        Ok(output)
    }

    /// Replaces the current snapshot wholesale.
    pub fn replace(&self, catalog: Catalog) {
        *self.current.write() = catalog;
    }
}
