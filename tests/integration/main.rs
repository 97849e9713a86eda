//! End-to-end tests across all layers
//!
//! Builds catalogs through the storage API and checks the catalog queries
//! against hand-computed answers and general properties.

mod scenarios;
