//! Core identifiers, values, and error types for hwcatalog.
//!
//! This crate provides:
//! - [`EntityId`] - Generational entity identifiers, plus typed wrappers
//!   ([`CompanyId`], [`LaptopId`], [`ProcessorId`], [`MemoryId`])
//! - [`EntityKind`] - The four kinds of catalog entity
//! - [`Value`] - Scalar values produced by attribute reads
//! - [`Type`] - Type descriptors used for query validation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod types;
pub mod value;

pub use entity::{CompanyId, EntityId, EntityKind, LaptopId, MemoryId, ProcessorId};
pub use error::{Error, ErrorContext, ErrorKind, SemanticLimit};
pub use types::Type;
pub use value::Value;

/// Result type alias using the hwcatalog [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
