//! Borrowed entity views.
//!
//! A view pairs a record with the catalog snapshot it lives in, so
//! relationships can be followed without exposing the link indices.

use std::fmt;

use hwcatalog_foundation::{
    CompanyId, EntityId, EntityKind, LaptopId, MemoryId, ProcessorId, Result, Value,
};
use tracing::warn;

use crate::catalog::Catalog;
use crate::model::{Company, Laptop, Memory, Processor};

macro_rules! view {
    ($(#[$meta:meta])* $name:ident, $id:ty, $record:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            catalog: &'a Catalog,
            id: $id,
            record: &'a $record,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(catalog: &'a Catalog, id: $id, record: &'a $record) -> Self {
                Self { catalog, id, record }
            }

            /// The entity id.
            #[must_use]
            pub fn id(&self) -> $id {
                self.id
            }

            /// The underlying record.
            #[must_use]
            pub fn record(&self) -> &'a $record {
                self.record
            }

            /// The catalog snapshot this view reads from.
            #[must_use]
            pub fn catalog(&self) -> &'a Catalog {
                self.catalog
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name<'_> {}

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &self.id)
                    .field("record", self.record)
                    .finish()
            }
        }
    };
}

view!(
    /// View of a company.
    CompanyRef, CompanyId, Company
);
view!(
    /// View of a laptop.
    LaptopRef, LaptopId, Laptop
);
view!(
    /// View of a processor.
    ProcessorRef, ProcessorId, Processor
);
view!(
    /// View of a memory module.
    MemoryRef, MemoryId, Memory
);

impl<'a> CompanyRef<'a> {
    /// The company name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.record.name()
    }

    /// Laptops this company makes (`makeLaptops`), in unspecified order.
    pub fn laptops(&self) -> impl Iterator<Item = LaptopRef<'a>> + 'a {
        let catalog = self.catalog;
        catalog
            .laptops_made()
            .members(self.id)
            .filter_map(move |id| live("makeLaptops", catalog.laptop(id)))
    }

    /// Number of laptops this company makes.
    #[must_use]
    pub fn laptop_count(&self) -> usize {
        self.catalog.laptops_made().member_count(self.id)
    }

    /// Processors this company makes (`makeProcessors`), in unspecified order.
    pub fn processors(&self) -> impl Iterator<Item = ProcessorRef<'a>> + 'a {
        let catalog = self.catalog;
        catalog
            .processors_made()
            .members(self.id)
            .filter_map(move |id| live("makeProcessors", catalog.processor(id)))
    }

    /// Number of processors this company makes.
    #[must_use]
    pub fn processor_count(&self) -> usize {
        self.catalog.processors_made().member_count(self.id)
    }

    /// Whether `laptop` is in `makeLaptops`.
    #[must_use]
    pub fn makes_laptop(&self, laptop: LaptopId) -> bool {
        self.catalog.laptops_made().contains(self.id, laptop)
    }

    /// Whether `processor` is in `makeProcessors`.
    #[must_use]
    pub fn makes_processor(&self, processor: ProcessorId) -> bool {
        self.catalog.processors_made().contains(self.id, processor)
    }
}

impl<'a> LaptopRef<'a> {
    /// The model name.
    #[must_use]
    pub fn model_name(&self) -> &'a str {
        self.record.model_name()
    }

    /// Price in dollars.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.record.price()
    }

    /// Whether the laptop has a high-definition screen.
    #[must_use]
    pub fn has_hd_screen(&self) -> bool {
        self.record.has_hd_screen()
    }

    /// Hard drive capacity in GB.
    #[must_use]
    pub fn hard_drive_capacity(&self) -> i64 {
        self.record.hard_drive_capacity()
    }

    /// The company that makes this laptop.
    #[must_use]
    pub fn made_by(&self) -> Option<CompanyRef<'a>> {
        let id = self.catalog.laptop_maker(self.id)?;
        live("madeBy", self.catalog.company(id))
    }

    /// The preinstalled processor.
    #[must_use]
    pub fn processor(&self) -> Option<ProcessorRef<'a>> {
        let id = self.catalog.installed_processor(self.id)?;
        live("processor", self.catalog.processor(id))
    }

    /// The preinstalled memory module.
    #[must_use]
    pub fn memory(&self) -> Option<MemoryRef<'a>> {
        let id = self.catalog.installed_memory(self.id)?;
        live("memory", self.catalog.memory(id))
    }
}

impl<'a> ProcessorRef<'a> {
    /// Clock speed in GHz.
    #[must_use]
    pub fn clock_speed(&self) -> f64 {
        self.record.clock_speed()
    }

    /// The company that makes this processor.
    #[must_use]
    pub fn made_by(&self) -> Option<CompanyRef<'a>> {
        let id = self.catalog.processor_maker(self.id)?;
        live("madeBy", self.catalog.company(id))
    }

    /// Laptops this processor is installed in, in unspecified order.
    pub fn installed_in(&self) -> impl Iterator<Item = LaptopRef<'a>> + 'a {
        let catalog = self.catalog;
        catalog
            .processor_installs()
            .members(self.id)
            .filter_map(move |id| live("installedIn", catalog.laptop(id)))
    }

    /// Number of laptops this processor is installed in.
    #[must_use]
    pub fn install_count(&self) -> usize {
        self.catalog.processor_installs().member_count(self.id)
    }
}

impl<'a> MemoryRef<'a> {
    /// Size in GB.
    #[must_use]
    pub fn size(&self) -> i64 {
        self.record.size()
    }

    /// Laptops this memory module is installed in, in unspecified order.
    pub fn installed_in(&self) -> impl Iterator<Item = LaptopRef<'a>> + 'a {
        let catalog = self.catalog;
        catalog
            .memory_installs()
            .members(self.id)
            .filter_map(move |id| live("installedIn", catalog.laptop(id)))
    }

    /// Number of laptops this memory module is installed in.
    #[must_use]
    pub fn install_count(&self) -> usize {
        self.catalog.memory_installs().member_count(self.id)
    }
}

/// Keeps a link target the catalog still holds. A missing target means the
/// snapshot's indices have drifted; it is logged and skipped.
fn live<T>(link: &'static str, target: Result<T>) -> Option<T> {
    match target {
        Ok(view) => Some(view),
        Err(err) => {
            warn!(link, error = %err, "skipping dangling link target");
            None
        }
    }
}

impl fmt::Display for CompanyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ProcessorRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.made_by() {
            Some(maker) => write!(f, "{maker} {} GHz processor", self.clock_speed()),
            None => write!(f, "{} GHz processor", self.clock_speed()),
        }
    }
}

impl fmt::Display for MemoryRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} GB memory", self.size())
    }
}

/// `<maker> <model>; <processor>; <memory>; harddrive: <n> GB`
impl fmt::Display for LaptopRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(maker) = self.made_by() {
            write!(f, "{maker} ")?;
        }
        write!(f, "{}", self.model_name())?;
        if let Some(processor) = self.processor() {
            write!(f, "; {processor}")?;
        }
        if let Some(memory) = self.memory() {
            write!(f, "; {memory}")?;
        }
        write!(f, "; harddrive: {} GB", self.hard_drive_capacity())
    }
}

/// A view of any entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef<'a> {
    /// A company.
    Company(CompanyRef<'a>),
    /// A laptop.
    Laptop(LaptopRef<'a>),
    /// A processor.
    Processor(ProcessorRef<'a>),
    /// A memory module.
    Memory(MemoryRef<'a>),
}

impl EntityRef<'_> {
    /// The kind of the viewed entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Company(_) => EntityKind::Company,
            Self::Laptop(_) => EntityKind::Laptop,
            Self::Processor(_) => EntityKind::Processor,
            Self::Memory(_) => EntityKind::Memory,
        }
    }

    /// The raw entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        match self {
            Self::Company(c) => c.id().entity(),
            Self::Laptop(l) => l.id().entity(),
            Self::Processor(p) => p.id().entity(),
            Self::Memory(m) => m.id().entity(),
        }
    }

    /// The entity as an identity value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Entity(self.kind(), self.id())
    }
}

impl fmt::Display for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Company(c) => fmt::Display::fmt(c, f),
            Self::Laptop(l) => fmt::Display::fmt(l, f),
            Self::Processor(p) => fmt::Display::fmt(p, f),
            Self::Memory(m) => fmt::Display::fmt(m, f),
        }
    }
}

impl<'a> From<CompanyRef<'a>> for EntityRef<'a> {
    fn from(view: CompanyRef<'a>) -> Self {
        Self::Company(view)
    }
}

impl<'a> From<LaptopRef<'a>> for EntityRef<'a> {
    fn from(view: LaptopRef<'a>) -> Self {
        Self::Laptop(view)
    }
}

impl<'a> From<ProcessorRef<'a>> for EntityRef<'a> {
    fn from(view: ProcessorRef<'a>) -> Self {
        Self::Processor(view)
    }
}

impl<'a> From<MemoryRef<'a>> for EntityRef<'a> {
    fn from(view: MemoryRef<'a>) -> Self {
        Self::Memory(view)
    }
}
