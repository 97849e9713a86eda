//! Per-kind id issuing for catalog entities.
//!
//! Every entity kind numbers its entities independently, so a `CompanyId`
//! and a `LaptopId` never compete for the same slot. Indices are not recycled
//! through a free list. The one exception is an identity key (a company name
//! or a laptop model) that comes back after its entity was removed: it gets
//! its old index with the next generation, so ids held from before the
//! removal are reported as stale instead of silently resolving to the
//! replacement.

use std::sync::Arc;

use hwcatalog_foundation::{EntityId, EntityKind, Error, Result};

/// Issues and retires entity ids for one catalog.
///
/// Backed by persistent collections, so cloning alongside a [`Catalog`]
/// snapshot is O(1).
///
/// [`Catalog`]: crate::Catalog
#[derive(Clone, Debug, Default)]
pub struct IdRegistry {
    companies: KindIds,
    laptops: KindIds,
    processors: KindIds,
    memories: KindIds,
}

#[derive(Clone, Debug, Default)]
struct KindIds {
    /// Latest generation issued for each index.
    generations: im::Vector<u32>,
    /// Indices whose latest generation is live.
    live: im::OrdSet<u64>,
    /// Index first issued to each identity key, kept after removal.
    keyed: im::HashMap<Arc<str>, u64>,
}

impl IdRegistry {
    /// Creates a registry that has issued nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues an id for a new entity of `kind`.
    ///
    /// A `key` seen before resumes its old index; the caller guarantees
    /// that no live entity currently holds the key.
    pub fn issue(&mut self, kind: EntityKind, key: Option<&Arc<str>>) -> EntityId {
        let ids = self.kind_mut(kind);
        let reused = key.and_then(|key| ids.keyed.get(key).copied());
        let id = match reused {
            Some(index) => {
                let generation = ids.generation(index).map_or(1, |g| g + 1);
                ids.generations.set(slot(index), generation);
                EntityId::new(index, generation)
            }
            None => {
                let index = ids.generations.len() as u64;
                ids.generations.push_back(1);
                if let Some(key) = key {
                    ids.keyed.insert(Arc::clone(key), index);
                }
                EntityId::new(index, 1)
            }
        };
        ids.live.insert(id.index);
        id
    }

    /// Retires a live id.
    ///
    /// # Errors
    ///
    /// Returns the error [`IdRegistry::check`] would report for `id`.
    pub fn retire(&mut self, kind: EntityKind, id: EntityId) -> Result<()> {
        self.check(kind, id)?;
        self.kind_mut(kind).live.remove(&id.index);
        Ok(())
    }

    /// Checks that `id` names a live entity of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the index was never issued for `kind`, and
    /// `StaleEntity` if the entity was removed or its key was reissued.
    pub fn check(&self, kind: EntityKind, id: EntityId) -> Result<()> {
        let ids = self.kind(kind);
        match ids.generation(id.index) {
            None => Err(Error::entity_not_found(id)),
            Some(current) if current != id.generation || !ids.live.contains(&id.index) => {
                Err(Error::stale_entity(id))
            }
            Some(_) => Ok(()),
        }
    }

    /// Number of live entities of `kind`.
    #[must_use]
    pub fn live_count(&self, kind: EntityKind) -> usize {
        self.kind(kind).live.len()
    }

    /// Number of live entities across all kinds.
    #[must_use]
    pub fn total_live(&self) -> usize {
        [&self.companies, &self.laptops, &self.processors, &self.memories]
            .iter()
            .map(|ids| ids.live.len())
            .sum()
    }

    const fn kind(&self, kind: EntityKind) -> &KindIds {
        match kind {
            EntityKind::Company => &self.companies,
            EntityKind::Laptop => &self.laptops,
            EntityKind::Processor => &self.processors,
            EntityKind::Memory => &self.memories,
        }
    }

    fn kind_mut(&mut self, kind: EntityKind) -> &mut KindIds {
        match kind {
            EntityKind::Company => &mut self.companies,
            EntityKind::Laptop => &mut self.laptops,
            EntityKind::Processor => &mut self.processors,
            EntityKind::Memory => &mut self.memories,
        }
    }
}

impl KindIds {
    fn generation(&self, index: u64) -> Option<u32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.generations.get(i).copied())
    }
}

// Only called with indices read back from `generations`.
#[allow(clippy::cast_possible_truncation)]
const fn slot(index: u64) -> usize {
    index as usize
}
