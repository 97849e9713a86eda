//! hwcatalog - In-memory hardware catalog
//!
//! This crate re-exports all layers of the hwcatalog system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: hwcatalog_engine     - Predicates, joins, ordering, grouping, query suite
//! Layer 1: hwcatalog_storage    - Entity records, relationship links, catalog snapshots
//! Layer 0: hwcatalog_foundation - Core types (Value, EntityId, Error)
//! ```

pub use hwcatalog_engine as engine;
pub use hwcatalog_foundation as foundation;
pub use hwcatalog_storage as storage;
