//! Entity records.
//!
//! Records carry only scalar attributes. Relationships between records are
//! held by the [`Catalog`](crate::Catalog) link indices, so a record can never
//! disagree with the collection that owns it.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use hwcatalog_foundation::{CompanyId, EntityId, EntityKind, LaptopId, MemoryId, ProcessorId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A record type stored in its own catalog table.
pub trait Entity: Clone + fmt::Debug {
    /// The kind of entity.
    const KIND: EntityKind;
    /// Typed id for this record type.
    type Id: Copy + Eq + Hash + Ord + fmt::Debug + Into<EntityId>;

    /// Wraps a freshly allocated raw id.
    fn wrap_id(id: EntityId) -> Self::Id;
}

/// A manufacturer. Identity is its name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Company {
    name: Arc<str>,
}

impl Company {
    /// Creates a company record.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The company name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn key(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

/// A processor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Processor {
    clock_speed: f64,
}

impl Processor {
    /// Creates a processor record with a clock speed in GHz.
    #[must_use]
    pub fn new(clock_speed: f64) -> Self {
        Self { clock_speed }
    }

    /// Clock speed in GHz.
    #[must_use]
    pub fn clock_speed(&self) -> f64 {
        self.clock_speed
    }
}

/// A memory module.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Memory {
    size: i64,
}

impl Memory {
    /// Creates a memory record with a size in GB.
    #[must_use]
    pub fn new(size: i64) -> Self {
        Self { size }
    }

    /// Size in GB.
    #[must_use]
    pub fn size(&self) -> i64 {
        self.size
    }
}

/// A laptop model. Identity is its model name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Laptop {
    model_name: Arc<str>,
    price: i64,
    has_hd_screen: bool,
    hard_drive_capacity: i64,
}

impl Laptop {
    /// Creates a laptop record.
    ///
    /// `price` is in dollars, `hard_drive_capacity` in GB.
    #[must_use]
    pub fn new(
        model_name: impl Into<Arc<str>>,
        price: i64,
        has_hd_screen: bool,
        hard_drive_capacity: i64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            price,
            has_hd_screen,
            hard_drive_capacity,
        }
    }

    /// The model name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Price in dollars.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Whether the laptop has a high-definition screen.
    #[must_use]
    pub fn has_hd_screen(&self) -> bool {
        self.has_hd_screen
    }

    /// Hard drive capacity in GB.
    #[must_use]
    pub fn hard_drive_capacity(&self) -> i64 {
        self.hard_drive_capacity
    }

    pub(crate) fn key(&self) -> Arc<str> {
        Arc::clone(&self.model_name)
    }
}

macro_rules! impl_entity {
    ($record:ty, $id:ty, $kind:ident) => {
        impl Entity for $record {
            const KIND: EntityKind = EntityKind::$kind;
            type Id = $id;

            fn wrap_id(id: EntityId) -> Self::Id {
                <$id>::from_entity(id)
            }
        }
    };
}

impl_entity!(Company, CompanyId, Company);
impl_entity!(Laptop, LaptopId, Laptop);
impl_entity!(Processor, ProcessorId, Processor);
impl_entity!(Memory, MemoryId, Memory);
