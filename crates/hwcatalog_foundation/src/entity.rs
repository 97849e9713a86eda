//! Entity identifiers with generational indices.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Entity identifier with generational index for stale reference detection.
///
/// The generation counter increments when an entity index is reused after removal,
/// allowing detection of stale references to removed entities.
///
/// Ids are ordered by index, then generation. The order carries no meaning
/// beyond being total and stable, which is what result tie-breaking needs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId {
    /// Index into entity storage.
    pub index: u64,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl EntityId {
    /// Creates a new entity ID with the given index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.index)
    }
}

/// The kinds of entity held by a catalog.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// A manufacturer of laptops and processors.
    Company,
    /// A laptop model.
    Laptop,
    /// A processor.
    Processor,
    /// A memory module.
    Memory,
}

impl EntityKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Laptop => "laptop",
            Self::Processor => "processor",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(EntityId);

        impl $name {
            /// The entity kind this id refers to.
            pub const KIND: EntityKind = EntityKind::$kind;

            /// Wraps a raw entity id.
            #[must_use]
            pub const fn from_entity(id: EntityId) -> Self {
                Self(id)
            }

            /// Returns the underlying entity id.
            #[must_use]
            pub const fn entity(self) -> EntityId {
                self.0
            }
        }

        impl From<$name> for EntityId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.0.index, self.0.generation)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", EntityKind::$kind, self.0.index)
            }
        }
    };
}

typed_id!(
    /// Identifier of a [`EntityKind::Company`].
    CompanyId => Company
);
typed_id!(
    /// Identifier of a [`EntityKind::Laptop`].
    LaptopId => Laptop
);
typed_id!(
    /// Identifier of a [`EntityKind::Processor`].
    ProcessorId => Processor
);
typed_id!(
    /// Identifier of a [`EntityKind::Memory`].
    MemoryId => Memory
);
