//! Query engine for hwcatalog.
//!
//! This crate provides:
//! - [`Predicate`] - Data-described filters over the entity graph
//! - [`Validator`] - Static checking of predicates before execution
//! - [`Evaluator`] - Predicate evaluation against a catalog snapshot
//! - Join, ordering, and grouping strategies ([`join`], [`sort`], [`group`])
//! - [`QueryExecutor`] - Filter, order, group, and project queries
//! - [`CatalogQueries`] - The fixed catalog query suite

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog_queries;
pub mod config;
pub mod eval;
pub mod group;
pub mod join;
pub mod predicate;
pub mod query;
pub mod sort;
pub mod validate;

pub use catalog_queries::{CatalogQueries, CompanySummary, InHouseLaptop};
pub use config::QueryConfig;
pub use eval::{Bindings, Evaluator, compare};
pub use group::Aggregate;
pub use predicate::{
    Attribute, CmpOp, Collection, Link, Operand, Params, Path, Predicate, Range, Var,
};
pub use query::{GroupQuery, GroupRow, Query, QueryExecutor, Row};
pub use sort::{Direction, OrderKey};
pub use validate::{Scope, Validator};
