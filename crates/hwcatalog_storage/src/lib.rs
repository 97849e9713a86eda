//! Entity records, relationship links, and catalog snapshots for hwcatalog.
//!
//! This crate provides:
//! - [`Company`], [`Laptop`], [`Processor`], [`Memory`] - Entity records
//! - [`IdRegistry`] - Per-kind generational id issuing
//! - [`LinkIndex`] - One-to-many links with bidirectional indices
//! - [`Catalog`] - Immutable catalog snapshot with structural sharing
//! - [`SharedCatalog`] - Snapshot-on-read sharing across threads
//! - Borrowed views ([`CompanyRef`], [`LaptopRef`], [`ProcessorRef`],
//!   [`MemoryRef`], [`EntityRef`]) for relationship navigation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod ids;
pub mod link;
pub mod model;
pub mod shared;
pub mod view;

pub use catalog::Catalog;
pub use ids::IdRegistry;
pub use link::LinkIndex;
pub use model::{Company, Entity, Laptop, Memory, Processor};
pub use shared::SharedCatalog;
pub use view::{CompanyRef, EntityRef, LaptopRef, MemoryRef, ProcessorRef};
