//! Catalog state management with immutable snapshots.
//!
//! The `Catalog` is the single owner of every entity and relationship link.
//! It uses persistent data structures for O(1) cloning and structural sharing:
//! every mutation returns a new `Catalog` and leaves the original untouched,
//! so a failed mutation commits nothing and a reader holding a snapshot never
//! sees a half-linked entity.

use std::sync::Arc;

use hwcatalog_foundation::{
    CompanyId, EntityId, EntityKind, Error, LaptopId, MemoryId, ProcessorId, Result,
};
use tracing::{debug, warn};

use crate::ids::IdRegistry;
use crate::link::LinkIndex;
use crate::model::{Company, Entity, Laptop, Memory, Processor};
use crate::view::{CompanyRef, LaptopRef, MemoryRef, ProcessorRef};

type Table<E> = im::HashMap<<E as Entity>::Id, E>;

/// Immutable snapshot of the hardware catalog.
///
/// Clone is O(1) due to structural sharing.
/// All mutation methods return a new `Catalog` instance.
#[derive(Clone, Debug)]
pub struct Catalog {
    ids: IdRegistry,
    companies: Table<Company>,
    laptops: Table<Laptop>,
    processors: Table<Processor>,
    memories: Table<Memory>,
    /// Identity index: company name -> company.
    company_names: im::HashMap<Arc<str>, CompanyId>,
    /// Identity index: laptop model name -> laptop.
    laptop_models: im::HashMap<Arc<str>, LaptopId>,
    /// `Company.makeLaptops` and its inverse `Laptop.madeBy`.
    make_laptops: LinkIndex<CompanyId, LaptopId>,
    /// `Company.makeProcessors` and its inverse `Processor.madeBy`.
    make_processors: LinkIndex<CompanyId, ProcessorId>,
    /// Laptops a processor is installed in, inverse of `Laptop.processor`.
    processor_installs: LinkIndex<ProcessorId, LaptopId>,
    /// Laptops a memory module is installed in, inverse of `Laptop.memory`.
    memory_installs: LinkIndex<MemoryId, LaptopId>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: IdRegistry::new(),
            companies: im::HashMap::new(),
            laptops: im::HashMap::new(),
            processors: im::HashMap::new(),
            memories: im::HashMap::new(),
            company_names: im::HashMap::new(),
            laptop_models: im::HashMap::new(),
            make_laptops: LinkIndex::new("makeLaptops"),
            make_processors: LinkIndex::new("makeProcessors"),
            processor_installs: LinkIndex::new("processor"),
            memory_installs: LinkIndex::new("memory"),
        }
    }

    /// Returns the number of live entities of every kind.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.ids.total_live()
    }

    /// Returns true if the catalog holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.total_live() == 0
    }

    // --- Entity Creation ---

    /// Adds a company.
    ///
    /// Returns a new Catalog and the company id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a company with the same name exists.
    pub fn add_company(&self, company: Company) -> Result<(Catalog, CompanyId)> {
        let key = company.key();
        if self.company_names.contains_key(&key) {
            return Err(Error::duplicate_key(EntityKind::Company, &*key));
        }

        let mut next = self.clone();
        let id = next.insert(company, Some(&key), |c| &mut c.companies);
        next.company_names.insert(Arc::clone(&key), id);

        debug!(%id, name = %key, "added company");
        Ok((next, id))
    }

    /// Adds a processor made by `maker`.
    ///
    /// The processor joins `maker`'s `makeProcessors` in the same step.
    ///
    /// # Errors
    ///
    /// Returns an error if `maker` is not a live company.
    pub fn add_processor(
        &self,
        processor: Processor,
        maker: CompanyId,
    ) -> Result<(Catalog, ProcessorId)> {
        self.company(maker)?;

        let mut next = self.clone();
        let id = next.insert(processor, None, |c| &mut c.processors);
        next.make_processors.link(maker, id)?;

        debug!(%id, %maker, "added processor");
        Ok((next, id))
    }

    /// Adds a memory module.
    ///
    /// # Errors
    ///
    /// Never fails today; returns `Result` for symmetry with the other
    /// creation methods.
    pub fn add_memory(&self, memory: Memory) -> Result<(Catalog, MemoryId)> {
        let mut next = self.clone();
        let id = next.insert(memory, None, |c| &mut c.memories);

        debug!(%id, size = next.memories[&id].size(), "added memory");
        Ok((next, id))
    }

    /// Adds a laptop made by `maker` with the given processor and memory.
    ///
    /// The laptop joins `maker`'s `makeLaptops` and is recorded against its
    /// processor and memory in the same step.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced entity is not live, or
    /// `DuplicateKey` if a laptop with the same model name exists.
    pub fn add_laptop(
        &self,
        laptop: Laptop,
        maker: CompanyId,
        processor: ProcessorId,
        memory: MemoryId,
    ) -> Result<(Catalog, LaptopId)> {
        self.company(maker)?;
        self.processor(processor)?;
        self.memory(memory)?;

        let key = laptop.key();
        if self.laptop_models.contains_key(&key) {
            return Err(Error::duplicate_key(EntityKind::Laptop, &*key));
        }

        let mut next = self.clone();
        let id = next.insert(laptop, Some(&key), |c| &mut c.laptops);
        next.laptop_models.insert(Arc::clone(&key), id);
        next.make_laptops.link(maker, id)?;
        next.processor_installs.link(processor, id)?;
        next.memory_installs.link(memory, id)?;

        debug!(%id, model = %key, %maker, %processor, %memory, "added laptop");
        Ok((next, id))
    }

    // --- Entity Removal ---

    /// Removes a laptop, unlinking it from its company, processor and memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the laptop is not live.
    pub fn remove_laptop(&self, id: LaptopId) -> Result<Catalog> {
        let mut next = self.clone();
        next.remove_laptop_in_place(id)?;
        Ok(next)
    }

    /// Removes a processor.
    ///
    /// # Errors
    ///
    /// Returns `InUse` if a laptop still has this processor installed.
    pub fn remove_processor(&self, id: ProcessorId) -> Result<Catalog> {
        let mut next = self.clone();
        next.remove_processor_in_place(id)?;
        Ok(next)
    }

    /// Removes a memory module.
    ///
    /// # Errors
    ///
    /// Returns `InUse` if a laptop still has this memory installed.
    pub fn remove_memory(&self, id: MemoryId) -> Result<Catalog> {
        self.memory(id)?;
        let users = self.memory_installs.member_count(id);
        if users > 0 {
            return Err(Error::in_use(id.entity(), users));
        }

        let mut next = self.clone();
        next.memories.remove(&id);
        next.ids.retire(EntityKind::Memory, id.entity())?;

        debug!(%id, "removed memory");
        Ok(next)
    }

    /// Removes a company together with the laptops and processors it makes.
    ///
    /// # Errors
    ///
    /// Returns `InUse` if a laptop made by another company has one of this
    /// company's processors installed. Nothing is removed in that case.
    pub fn remove_company(&self, id: CompanyId) -> Result<Catalog> {
        let company = self.company(id)?;
        let name = company.record().key();

        let mut next = self.clone();
        let laptops: Vec<_> = self.make_laptops.members(id).collect();
        for laptop in laptops {
            next.remove_laptop_in_place(laptop)?;
        }
        let processors: Vec<_> = self.make_processors.members(id).collect();
        for processor in processors {
            next.remove_processor_in_place(processor)?;
        }

        next.companies.remove(&id);
        next.company_names.remove(&name);
        next.ids.retire(EntityKind::Company, id.entity())?;

        debug!(%id, %name, "removed company");
        Ok(next)
    }

    fn remove_laptop_in_place(&mut self, id: LaptopId) -> Result<()> {
        let key = self.laptop(id)?.record().key();

        self.make_laptops.unlink(id);
        self.processor_installs.unlink(id);
        self.memory_installs.unlink(id);
        self.laptop_models.remove(&key);
        self.laptops.remove(&id);
        self.ids.retire(EntityKind::Laptop, id.entity())?;

        debug!(%id, model = %key, "removed laptop");
        Ok(())
    }

    fn remove_processor_in_place(&mut self, id: ProcessorId) -> Result<()> {
        self.processor(id)?;
        let users = self.processor_installs.member_count(id);
        if users > 0 {
            return Err(Error::in_use(id.entity(), users));
        }

        self.make_processors.unlink(id);
        self.processors.remove(&id);
        self.ids.retire(EntityKind::Processor, id.entity())?;

        debug!(%id, "removed processor");
        Ok(())
    }

    fn insert<E: Entity>(
        &mut self,
        record: E,
        key: Option<&Arc<str>>,
        table: impl FnOnce(&mut Self) -> &mut Table<E>,
    ) -> E::Id {
        let id = E::wrap_id(self.ids.issue(E::KIND, key));
        table(self).insert(id, record);
        id
    }

    // --- Lookup ---

    fn lookup<'a, E: Entity>(&self, table: &'a Table<E>, id: E::Id) -> Result<&'a E> {
        let raw: EntityId = id.into();
        self.ids.check(E::KIND, raw)?;
        table.get(&id).ok_or_else(|| Error::entity_not_found(raw))
    }

    /// Returns a view of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is stale or refers to another kind.
    pub fn company(&self, id: CompanyId) -> Result<CompanyRef<'_>> {
        let record = self.lookup(&self.companies, id)?;
        Ok(CompanyRef::new(self, id, record))
    }

    /// Returns a view of a laptop.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is stale or refers to another kind.
    pub fn laptop(&self, id: LaptopId) -> Result<LaptopRef<'_>> {
        let record = self.lookup(&self.laptops, id)?;
        Ok(LaptopRef::new(self, id, record))
    }

    /// Returns a view of a processor.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is stale or refers to another kind.
    pub fn processor(&self, id: ProcessorId) -> Result<ProcessorRef<'_>> {
        let record = self.lookup(&self.processors, id)?;
        Ok(ProcessorRef::new(self, id, record))
    }

    /// Returns a view of a memory module.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is stale or refers to another kind.
    pub fn memory(&self, id: MemoryId) -> Result<MemoryRef<'_>> {
        let record = self.lookup(&self.memories, id)?;
        Ok(MemoryRef::new(self, id, record))
    }

    /// Finds the laptop with the given model name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no laptop has that model name.
    pub fn find_laptop_by_model(&self, model_name: &str) -> Result<LaptopRef<'_>> {
        let id = self
            .laptop_models
            .get(model_name)
            .copied()
            .ok_or_else(|| Error::not_found(EntityKind::Laptop, model_name))?;
        self.laptop(id)
    }

    /// Finds the company with the given name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has that name.
    pub fn find_company(&self, name: &str) -> Result<CompanyRef<'_>> {
        let id = self
            .company_names
            .get(name)
            .copied()
            .ok_or_else(|| Error::not_found(EntityKind::Company, name))?;
        self.company(id)
    }

    // --- Iteration ---
    //
    // Iteration order is unspecified and may differ between snapshots.

    /// Iterates all companies.
    pub fn all_companies(&self) -> impl Iterator<Item = CompanyRef<'_>> + '_ {
        self.companies
            .iter()
            .map(move |(id, record)| CompanyRef::new(self, *id, record))
    }

    /// Iterates all laptops.
    pub fn all_laptops(&self) -> impl Iterator<Item = LaptopRef<'_>> + '_ {
        self.laptops
            .iter()
            .map(move |(id, record)| LaptopRef::new(self, *id, record))
    }

    /// Iterates all processors.
    pub fn all_processors(&self) -> impl Iterator<Item = ProcessorRef<'_>> + '_ {
        self.processors
            .iter()
            .map(move |(id, record)| ProcessorRef::new(self, *id, record))
    }

    /// Iterates all memory modules.
    pub fn all_memories(&self) -> impl Iterator<Item = MemoryRef<'_>> + '_ {
        self.memories
            .iter()
            .map(move |(id, record)| MemoryRef::new(self, *id, record))
    }

    // --- Relationship traversal (used by the views) ---

    pub(crate) fn laptop_maker(&self, id: LaptopId) -> Option<CompanyId> {
        self.make_laptops.owner(id)
    }

    pub(crate) fn processor_maker(&self, id: ProcessorId) -> Option<CompanyId> {
        self.make_processors.owner(id)
    }

    pub(crate) fn installed_processor(&self, id: LaptopId) -> Option<ProcessorId> {
        self.processor_installs.owner(id)
    }

    pub(crate) fn installed_memory(&self, id: LaptopId) -> Option<MemoryId> {
        self.memory_installs.owner(id)
    }

    pub(crate) fn laptops_made(&self) -> &LinkIndex<CompanyId, LaptopId> {
        &self.make_laptops
    }

    pub(crate) fn processors_made(&self) -> &LinkIndex<CompanyId, ProcessorId> {
        &self.make_processors
    }

    pub(crate) fn processor_installs(&self) -> &LinkIndex<ProcessorId, LaptopId> {
        &self.processor_installs
    }

    pub(crate) fn memory_installs(&self) -> &LinkIndex<MemoryId, LaptopId> {
        &self.memory_installs
    }

    // --- Integrity ---

    /// Checks every relationship invariant.
    ///
    /// - forward and inverse indices agree for every relationship
    /// - every laptop has a maker, a processor and a memory module
    /// - every processor has a maker
    /// - every link endpoint is a live entity
    /// - identity indices match the records
    ///
    /// # Errors
    ///
    /// Returns `BrokenInvariant` describing the first violation found.
    pub fn verify_integrity(&self) -> Result<()> {
        let result = self.check_integrity();
        if let Err(err) = &result {
            warn!(error = %err, "catalog integrity check failed");
        }
        result
    }

    fn check_integrity(&self) -> Result<()> {
        self.make_laptops.verify()?;
        self.make_processors.verify()?;
        self.processor_installs.verify()?;
        self.memory_installs.verify()?;

        for (id, laptop) in &self.laptops {
            let missing = if self.laptop_maker(*id).is_none() {
                Some("madeBy")
            } else if self.installed_processor(*id).is_none() {
                Some("processor")
            } else if self.installed_memory(*id).is_none() {
                Some("memory")
            } else {
                None
            };
            if let Some(link) = missing {
                return Err(Error::broken_invariant(format!(
                    "laptop {:?} has no {link}",
                    laptop.model_name()
                )));
            }
            if self.laptop_models.get(laptop.model_name()) != Some(id) {
                return Err(Error::broken_invariant(format!(
                    "model index does not point at laptop {:?}",
                    laptop.model_name()
                )));
            }
        }
        for id in self.processors.keys() {
            if self.processor_maker(*id).is_none() {
                return Err(Error::broken_invariant(format!("{id} has no madeBy")));
            }
        }
        for (id, company) in &self.companies {
            if self.company_names.get(company.name()) != Some(id) {
                return Err(Error::broken_invariant(format!(
                    "name index does not point at company {:?}",
                    company.name()
                )));
            }
        }
        if self.laptop_models.len() != self.laptops.len()
            || self.company_names.len() != self.companies.len()
        {
            return Err(Error::broken_invariant("identity index has stale keys"));
        }

        for (company, laptop) in self.make_laptops.edges() {
            self.check_endpoint(&self.companies, company)?;
            self.check_endpoint(&self.laptops, laptop)?;
        }
        for (company, processor) in self.make_processors.edges() {
            self.check_endpoint(&self.companies, company)?;
            self.check_endpoint(&self.processors, processor)?;
        }
        for (processor, laptop) in self.processor_installs.edges() {
            self.check_endpoint(&self.processors, processor)?;
            self.check_endpoint(&self.laptops, laptop)?;
        }
        for (memory, laptop) in self.memory_installs.edges() {
            self.check_endpoint(&self.memories, memory)?;
            self.check_endpoint(&self.laptops, laptop)?;
        }
        Ok(())
    }

    fn check_endpoint<E: Entity>(&self, table: &Table<E>, id: E::Id) -> Result<()> {
        self.lookup(table, id).map(|_| ()).map_err(|_| {
            Error::broken_invariant(format!("link points at missing {} {id:?}", E::KIND))
        })
    }

    #[cfg(test)]
    pub(crate) fn corrupt_make_laptops(&mut self) -> &mut LinkIndex<CompanyId, LaptopId> {
        &mut self.make_laptops
    }
}
