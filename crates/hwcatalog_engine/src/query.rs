//! Query description and execution.
//!
//! This module provides:
//! - [`Query`] - Filter and order the extent of one entity kind
//! - [`GroupQuery`] - Filter, partition by a related entity, and aggregate
//! - [`QueryExecutor`] - Executes queries against a catalog snapshot
//!
//! Execution is read-only and deterministic: equal catalog contents and
//! parameters always yield the same rows in the same order, because the
//! entity id is appended as a final ascending sort key.

use hwcatalog_foundation::{EntityKind, Error, ErrorContext, Result, SemanticLimit, Value};
use hwcatalog_storage::{Catalog, EntityRef};
use tracing::debug;

use crate::config::QueryConfig;
use crate::eval::{Bindings, Evaluator, extent};
use crate::group::{Aggregate, aggregate, partition};
use crate::predicate::{Params, Path, Predicate};
use crate::sort::{Direction, OrderKey, sort_by_keys};
use crate::validate::{Scope, Validator};

// =============================================================================
// Query Types
// =============================================================================

/// Selects entities of one kind that satisfy a filter, in a given order.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// Name used in logs and error context.
    pub name: String,
    /// Kind of entity bound to `this`.
    pub target: EntityKind,
    /// Condition each result satisfies.
    pub filter: Predicate,
    /// Ordering keys, most significant first.
    pub order_by: Vec<OrderKey>,
}

impl Query {
    /// A query over every entity of `target`.
    #[must_use]
    pub fn new(name: impl Into<String>, target: EntityKind) -> Self {
        Self {
            name: name.into(),
            target,
            filter: Predicate::True,
            order_by: Vec::new(),
        }
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = filter;
        self
    }

    /// Appends an ordering key.
    #[must_use]
    pub fn order_by(mut self, key: OrderKey) -> Self {
        self.order_by.push(key);
        self
    }
}

/// Partitions the filtered extent by a related entity and aggregates each part.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupQuery {
    /// Name used in logs and error context.
    pub name: String,
    /// Kind of entity bound to `this` while filtering and aggregating.
    pub target: EntityKind,
    /// Condition each member satisfies.
    pub filter: Predicate,
    /// Path from a member to its group key entity.
    pub group_by: Path,
    /// Aggregates computed per group.
    pub aggregates: Vec<Aggregate>,
    /// Ordering keys evaluated with `this` bound to the group key.
    pub order_by: Vec<OrderKey>,
}

impl GroupQuery {
    /// A grouping of every entity of `target` by `group_by`.
    #[must_use]
    pub fn new(name: impl Into<String>, target: EntityKind, group_by: Path) -> Self {
        Self {
            name: name.into(),
            target,
            filter: Predicate::True,
            group_by,
            aggregates: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = filter;
        self
    }

    /// Appends an aggregate.
    #[must_use]
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    /// Appends an ordering key.
    #[must_use]
    pub fn order_by(mut self, key: OrderKey) -> Self {
        self.order_by.push(key);
        self
    }
}

/// One result group.
#[derive(Clone, Debug)]
pub struct GroupRow<'a> {
    /// The group key entity.
    pub key: EntityRef<'a>,
    /// Members of the group, in extent order.
    pub members: Vec<EntityRef<'a>>,
    /// Aggregate values, in the order the aggregates were declared.
    pub values: Vec<Value>,
}

/// One projected result.
#[derive(Clone, Debug)]
pub struct Row<'a> {
    /// The matched entity.
    pub entity: EntityRef<'a>,
    /// Column values, in the order the columns were requested.
    pub columns: Vec<Value>,
}

// =============================================================================
// Query Executor
// =============================================================================

/// Executes queries against a catalog snapshot.
pub struct QueryExecutor;

impl QueryExecutor {
    /// Statically checks a query.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` or `TypeMismatch` describing the first problem.
    pub fn validate(query: &Query, params: &Params) -> Result<()> {
        let validator = Validator::new(params);
        let mut scope = Scope::new(query.target);
        validator
            .check(&query.filter, &mut scope)
            .and_then(|()| {
                Self::check_paths(&validator, query.order_by.iter().map(|key| &key.path), &scope)
            })
            .map_err(in_query(&query.name))
    }

    /// Statically checks a grouped query.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` or `TypeMismatch` describing the first problem.
    pub fn validate_grouped(query: &GroupQuery, params: &Params) -> Result<()> {
        Self::check_grouped(&Validator::new(params), query).map_err(in_query(&query.name))
    }

    fn check_grouped(validator: &Validator<'_>, query: &GroupQuery) -> Result<()> {
        let mut scope = Scope::new(query.target);
        validator.check(&query.filter, &mut scope)?;
        let key_kind = validator.path_entity(&query.group_by, &scope)?;
        for aggregate in &query.aggregates {
            if let Some(path) = aggregate.path() {
                let ty = validator.path_type(path, &scope)?;
                if !ty.is_ordered() {
                    return Err(Error::invalid_query(format!(
                        "cannot aggregate {ty} values of {path}"
                    )));
                }
            }
        }
        Self::check_paths(
            validator,
            query.order_by.iter().map(|key| &key.path),
            &Scope::new(key_kind),
        )
    }

    fn check_paths<'p>(
        validator: &Validator<'_>,
        paths: impl IntoIterator<Item = &'p Path>,
        scope: &Scope,
    ) -> Result<()> {
        for path in paths {
            validator.path_type(path, scope)?;
        }
        Ok(())
    }

    /// Executes a query and returns the matching entities in order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery`/`TypeMismatch` for malformed queries and
    /// `LimitExceeded` when more rows match than `config.max_results`.
    pub fn execute<'a>(
        query: &Query,
        catalog: &'a Catalog,
        params: &Params,
        config: &QueryConfig,
    ) -> Result<Vec<EntityRef<'a>>> {
        if config.validate {
            Self::validate(query, params)?;
        }
        let evaluator = Evaluator::new(catalog, params);
        let run = || -> Result<Vec<EntityRef<'a>>> {
            let selected = Self::select(&evaluator, catalog, query.target, &query.filter)?;
            Self::check_bound(selected.len(), config)?;
            let mut ordered = Self::order(&evaluator, selected, &query.order_by, |row| *row)?;
            if let Some(limit) = config.limit {
                ordered.truncate(limit);
            }
            Ok(ordered)
        };
        let results = run().map_err(in_query(&query.name))?;
        debug!(query = %query.name, results = results.len(), "executed query");
        Ok(results)
    }

    /// Executes a grouped query and returns one row per group, in order.
    ///
    /// Every member of the filtered extent lands in exactly one group.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery`/`TypeMismatch` for malformed queries,
    /// `BrokenInvariant` when a member has no group key, and
    /// `LimitExceeded` when there are more groups than `config.max_results`.
    pub fn execute_grouped<'a>(
        query: &GroupQuery,
        catalog: &'a Catalog,
        params: &Params,
        config: &QueryConfig,
    ) -> Result<Vec<GroupRow<'a>>> {
        if config.validate {
            Self::validate_grouped(query, params)?;
        }
        let evaluator = Evaluator::new(catalog, params);
        let key_of = |member: &EntityRef<'a>| -> Result<EntityRef<'a>> {
            evaluator
                .resolve_entity(&query.group_by, &Bindings::new(*member))?
                .ok_or_else(|| {
                    Error::broken_invariant(format!(
                        "{} {} has no {}",
                        member.kind(),
                        member.id(),
                        query.group_by
                    ))
                })
        };
        let run = || -> Result<Vec<GroupRow<'a>>> {
            let selected = Self::select(&evaluator, catalog, query.target, &query.filter)?;
            let members = selected.len();
            let partitions = partition(selected, |member| key_of(member).map(|key| key.to_value()))?;
            Self::check_bound(partitions.len(), config)?;

            let mut groups = Vec::with_capacity(partitions.len());
            for (_, members) in partitions {
                let Some(first) = members.first() else {
                    continue;
                };
                let key = key_of(first)?;
                let values = aggregate(&members, &query.aggregates, |member, path| {
                    evaluator.resolve(path, &Bindings::new(*member))
                })?;
                groups.push(GroupRow {
                    key,
                    members,
                    values,
                });
            }
            debug!(query = %query.name, members, groups = groups.len(), "partitioned extent");

            let mut ordered = Self::order(&evaluator, groups, &query.order_by, |row| row.key)?;
            if let Some(limit) = config.limit {
                ordered.truncate(limit);
            }
            Ok(ordered)
        };
        let results = run().map_err(in_query(&query.name))?;
        debug!(query = %query.name, results = results.len(), "executed grouped query");
        Ok(results)
    }

    /// Executes a query and reads `columns` from each result.
    ///
    /// Columns are paths evaluated with `this` bound to the result.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`QueryExecutor::execute`], and `InvalidQuery`
    /// for malformed columns.
    pub fn project<'a>(
        query: &Query,
        columns: &[Path],
        catalog: &'a Catalog,
        params: &Params,
        config: &QueryConfig,
    ) -> Result<Vec<Row<'a>>> {
        if config.validate {
            Self::check_paths(&Validator::new(params), columns, &Scope::new(query.target))
                .map_err(in_query(&query.name))?;
        }
        let evaluator = Evaluator::new(catalog, params);
        Self::execute(query, catalog, params, config)?
            .into_iter()
            .map(|entity| {
                let bindings = Bindings::new(entity);
                let columns = columns
                    .iter()
                    .map(|column| evaluator.resolve(column, &bindings))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Row { entity, columns })
            })
            .collect::<Result<Vec<_>>>()
            .map_err(in_query(&query.name))
    }

    /// Checks whether any entity matches, stopping at the first match.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery`/`TypeMismatch` for malformed queries.
    pub fn exists(
        query: &Query,
        catalog: &Catalog,
        params: &Params,
        config: &QueryConfig,
    ) -> Result<bool> {
        if config.validate {
            Self::validate(query, params)?;
        }
        let evaluator = Evaluator::new(catalog, params);
        for candidate in extent(catalog, query.target) {
            if evaluator
                .test(&query.filter, candidate)
                .map_err(in_query(&query.name))?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Counts matching entities without sorting them.
    ///
    /// The count ignores `config.limit` and `config.max_results`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery`/`TypeMismatch` for malformed queries.
    pub fn count(
        query: &Query,
        catalog: &Catalog,
        params: &Params,
        config: &QueryConfig,
    ) -> Result<usize> {
        if config.validate {
            Self::validate(query, params)?;
        }
        let evaluator = Evaluator::new(catalog, params);
        Self::select(&evaluator, catalog, query.target, &query.filter)
            .map(|selected| selected.len())
            .map_err(in_query(&query.name))
    }

    // -------------------------------------------------------------------------
    // Helper methods
    // -------------------------------------------------------------------------

    fn select<'a, 'q>(
        evaluator: &Evaluator<'a, 'q>,
        catalog: &'a Catalog,
        target: EntityKind,
        filter: &'q Predicate,
    ) -> Result<Vec<EntityRef<'a>>> {
        let mut selected = Vec::new();
        for candidate in extent(catalog, target) {
            if evaluator.test(filter, candidate)? {
                selected.push(candidate);
            }
        }
        Ok(selected)
    }

    fn check_bound(actual: usize, config: &QueryConfig) -> Result<()> {
        match config.max_results {
            Some(limit) if actual > limit => Err(Error::limit_exceeded(
                SemanticLimit::MaxQueryResults { limit, actual },
            )),
            _ => Ok(()),
        }
    }

    /// Sorts rows by `keys` evaluated against `anchor(row)`, then by the
    /// anchor's id.
    fn order<'a, T>(
        evaluator: &Evaluator<'a, '_>,
        rows: Vec<T>,
        keys: &[OrderKey],
        anchor: impl Fn(&T) -> EntityRef<'a>,
    ) -> Result<Vec<T>> {
        let directions: Vec<Direction> = keys.iter().map(|key| key.direction).collect();
        sort_by_keys(rows, &directions, |row| {
            let entity = anchor(row);
            let bindings = Bindings::new(entity);
            let mut values = keys
                .iter()
                .map(|key| evaluator.resolve(&key.path, &bindings))
                .collect::<Result<Vec<_>>>()?;
            values.push(entity.to_value());
            Ok(values)
        })
    }
}

/// Attaches the query name to an error unless it already names one.
fn in_query(name: &str) -> impl FnOnce(Error) -> Error + '_ {
    move |err| match &err.context {
        Some(context) if context.source.is_some() => err,
        _ => err.with_context(ErrorContext::new().with_source(name)),
    }
}
