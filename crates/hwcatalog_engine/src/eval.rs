//! Predicate evaluation against a catalog snapshot.
//!
//! Navigation through a missing link yields nil rather than an error, and
//! every comparison involving nil is false. Structural problems (unknown
//! attributes, unbound variables) surface as `InvalidQuery` even when
//! validation was skipped.

use std::cmp::Ordering;

use hwcatalog_foundation::{EntityKind, Error, Result, Type, Value};
use hwcatalog_storage::{Catalog, EntityRef};

use crate::join;
use crate::predicate::{
    Attribute, CmpOp, Collection, Link, Operand, Params, Path, Predicate, Range, Var,
};

// =============================================================================
// Bindings
// =============================================================================

/// Entities bound to `this` and to quantified variables.
#[derive(Clone, Debug)]
pub struct Bindings<'a, 'q> {
    this: EntityRef<'a>,
    vars: Vec<(&'q str, EntityRef<'a>)>,
}

impl<'a, 'q> Bindings<'a, 'q> {
    /// Bindings with only `this`.
    #[must_use]
    pub fn new(this: EntityRef<'a>) -> Self {
        Self {
            this,
            vars: Vec::new(),
        }
    }

    /// The entity bound to `this`.
    #[must_use]
    pub fn this(&self) -> EntityRef<'a> {
        self.this
    }

    /// Looks up a path root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if a named variable is unbound.
    pub fn get(&self, var: &Var) -> Result<EntityRef<'a>> {
        match var {
            Var::This => Ok(self.this),
            Var::Named(name) => self
                .vars
                .iter()
                .rev()
                .find(|(bound, _)| bound == name)
                .map(|(_, entity)| *entity)
                .ok_or_else(|| Error::invalid_query(format!("unbound variable {name}"))),
        }
    }

    fn push(&mut self, name: &'q str, entity: EntityRef<'a>) {
        self.vars.push((name, entity));
    }

    fn pop(&mut self, count: usize) {
        let keep = self.vars.len().saturating_sub(count);
        self.vars.truncate(keep);
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Evaluates predicates and paths over one catalog snapshot.
pub struct Evaluator<'a, 'q> {
    catalog: &'a Catalog,
    params: &'q Params,
}

impl<'a, 'q> Evaluator<'a, 'q> {
    /// An evaluator reading `catalog` with the given parameters.
    #[must_use]
    pub fn new(catalog: &'a Catalog, params: &'q Params) -> Self {
        Self { catalog, params }
    }

    /// Tests a predicate with `this` bound to `candidate`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` or `TypeMismatch` for malformed predicates.
    pub fn test(&self, predicate: &'q Predicate, candidate: EntityRef<'a>) -> Result<bool> {
        self.eval(predicate, &mut Bindings::new(candidate))
    }

    /// Evaluates a predicate under the given bindings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` or `TypeMismatch` for malformed predicates.
    pub fn eval(&self, predicate: &'q Predicate, bindings: &mut Bindings<'a, 'q>) -> Result<bool> {
        match predicate {
            Predicate::True => Ok(true),
            Predicate::Compare { lhs, op, rhs } => {
                let left = self.operand(lhs, bindings)?;
                let right = self.operand(rhs, bindings)?;
                compare(&left, *op, &right)
            }
            Predicate::Contains {
                owner,
                collection,
                member,
            } => {
                let (Some(owner), Some(member)) = (
                    self.resolve_entity(owner, bindings)?,
                    self.resolve_entity(member, bindings)?,
                ) else {
                    return Ok(false);
                };
                has_member(owner, *collection, member)
            }
            Predicate::SizeCompare {
                owner,
                collection,
                op,
                count,
            } => match self.resolve_entity(owner, bindings)? {
                Some(owner) => Ok(op.test_counts(member_count(owner, *collection)?, *count)),
                None => Ok(false),
            },
            Predicate::Exists { var, range, body } => {
                let candidates = self.range(range, bindings)?;
                join::exists_one(&candidates, |candidate| {
                    bindings.push(var, candidate);
                    let result = self.eval(body, bindings);
                    bindings.pop(1);
                    result
                })
            }
            Predicate::ExistsPair {
                first,
                second,
                range,
                distinct,
                body,
            } => {
                let candidates = self.range(range, bindings)?;
                join::exists_pair(&candidates, *distinct, |a, b| {
                    bindings.push(first, a);
                    bindings.push(second, b);
                    let result = self.eval(body, bindings);
                    bindings.pop(2);
                    result
                })
            }
            Predicate::And(parts) => {
                for part in parts {
                    if !self.eval(part, bindings)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Or(parts) => {
                for part in parts {
                    if self.eval(part, bindings)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => Ok(!self.eval(inner, bindings)?),
        }
    }

    /// Resolves a path to a value. Missing links yield nil.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for unbound variables or links and attributes
    /// the reached entity does not have.
    pub fn resolve(&self, path: &Path, bindings: &Bindings<'a, '_>) -> Result<Value> {
        let Some(entity) = self.navigate(path, bindings)? else {
            return Ok(Value::Nil);
        };
        match path.attribute {
            Some(attribute) => read(entity, attribute),
            None => Ok(entity.to_value()),
        }
    }

    /// Resolves a path that denotes an entity. Missing links yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the path is malformed or ends in an attribute.
    pub fn resolve_entity(
        &self,
        path: &Path,
        bindings: &Bindings<'a, '_>,
    ) -> Result<Option<EntityRef<'a>>> {
        if path.attribute.is_some() {
            return Err(Error::invalid_query(format!(
                "{path} denotes a value, not an entity"
            )));
        }
        self.navigate(path, bindings)
    }

    fn navigate(&self, path: &Path, bindings: &Bindings<'a, '_>) -> Result<Option<EntityRef<'a>>> {
        let mut current = bindings.get(&path.root)?;
        for &link in &path.links {
            match follow(current, link)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn operand(&self, operand: &Operand, bindings: &Bindings<'a, '_>) -> Result<Value> {
        match operand {
            Operand::Path(path) => self.resolve(path, bindings),
            Operand::Const(value) => Ok(value.clone()),
            Operand::Param(name) => self
                .params
                .get(name)
                .cloned()
                .ok_or_else(|| Error::invalid_query(format!("missing parameter {name}"))),
        }
    }

    fn range(&self, range: &Range, bindings: &Bindings<'a, '_>) -> Result<Vec<EntityRef<'a>>> {
        match range {
            Range::Extent(kind) => Ok(extent(self.catalog, *kind)),
            Range::Collection { owner, collection } => match self.resolve_entity(owner, bindings)? {
                Some(owner) => members(owner, *collection),
                None => Ok(Vec::new()),
            },
        }
    }
}

// =============================================================================
// Navigation primitives
// =============================================================================

/// Every live entity of a kind, in id order.
#[must_use]
pub fn extent(catalog: &Catalog, kind: EntityKind) -> Vec<EntityRef<'_>> {
    let mut entities: Vec<EntityRef<'_>> = match kind {
        EntityKind::Company => catalog.all_companies().map(EntityRef::from).collect(),
        EntityKind::Laptop => catalog.all_laptops().map(EntityRef::from).collect(),
        EntityKind::Processor => catalog.all_processors().map(EntityRef::from).collect(),
        EntityKind::Memory => catalog.all_memories().map(EntityRef::from).collect(),
    };
    // Catalog tables iterate in hash order.
    entities.sort_unstable_by_key(EntityRef::id);
    entities
}

/// Follows a single-valued link.
///
/// # Errors
///
/// Returns `InvalidQuery` if the entity's kind has no such link.
pub fn follow(entity: EntityRef<'_>, link: Link) -> Result<Option<EntityRef<'_>>> {
    match (entity, link) {
        (EntityRef::Laptop(laptop), Link::Processor) => Ok(laptop.processor().map(EntityRef::from)),
        (EntityRef::Laptop(laptop), Link::Memory) => Ok(laptop.memory().map(EntityRef::from)),
        (EntityRef::Laptop(laptop), Link::MadeBy) => Ok(laptop.made_by().map(EntityRef::from)),
        (EntityRef::Processor(processor), Link::MadeBy) => {
            Ok(processor.made_by().map(EntityRef::from))
        }
        (other, _) => Err(Error::invalid_query(format!(
            "{} has no link {}",
            other.kind(),
            link.name()
        ))),
    }
}

/// Reads a scalar attribute.
///
/// # Errors
///
/// Returns `InvalidQuery` if the entity's kind has no such attribute.
pub fn read(entity: EntityRef<'_>, attribute: Attribute) -> Result<Value> {
    match (entity, attribute) {
        (EntityRef::Company(company), Attribute::Name) => Ok(Value::from(company.name())),
        (EntityRef::Laptop(laptop), Attribute::ModelName) => Ok(Value::from(laptop.model_name())),
        (EntityRef::Laptop(laptop), Attribute::Price) => Ok(Value::Int(laptop.price())),
        (EntityRef::Laptop(laptop), Attribute::HasHdScreen) => {
            Ok(Value::Bool(laptop.has_hd_screen()))
        }
        (EntityRef::Laptop(laptop), Attribute::HardDriveCapacity) => {
            Ok(Value::Int(laptop.hard_drive_capacity()))
        }
        (EntityRef::Processor(processor), Attribute::ClockSpeed) => {
            Ok(Value::Float(processor.clock_speed()))
        }
        (EntityRef::Memory(memory), Attribute::Size) => Ok(Value::Int(memory.size())),
        (other, _) => Err(Error::invalid_query(format!(
            "{} has no attribute {}",
            other.kind(),
            attribute.name()
        ))),
    }
}

fn no_collection(owner: EntityKind, collection: Collection) -> Error {
    Error::invalid_query(format!("{owner} has no collection {}", collection.name()))
}

/// Members of a collection, in unspecified order.
///
/// # Errors
///
/// Returns `InvalidQuery` if the owner's kind has no such collection.
pub fn members(owner: EntityRef<'_>, collection: Collection) -> Result<Vec<EntityRef<'_>>> {
    match (owner, collection) {
        (EntityRef::Company(company), Collection::MakeLaptops) => {
            Ok(company.laptops().map(EntityRef::from).collect())
        }
        (EntityRef::Company(company), Collection::MakeProcessors) => {
            Ok(company.processors().map(EntityRef::from).collect())
        }
        (EntityRef::Processor(processor), Collection::InstalledIn) => {
            Ok(processor.installed_in().map(EntityRef::from).collect())
        }
        (EntityRef::Memory(memory), Collection::InstalledIn) => {
            Ok(memory.installed_in().map(EntityRef::from).collect())
        }
        (other, _) => Err(no_collection(other.kind(), collection)),
    }
}

fn member_count(owner: EntityRef<'_>, collection: Collection) -> Result<usize> {
    match (owner, collection) {
        (EntityRef::Company(company), Collection::MakeLaptops) => Ok(company.laptop_count()),
        (EntityRef::Company(company), Collection::MakeProcessors) => Ok(company.processor_count()),
        (EntityRef::Processor(processor), Collection::InstalledIn) => Ok(processor.install_count()),
        (EntityRef::Memory(memory), Collection::InstalledIn) => Ok(memory.install_count()),
        (other, _) => Err(no_collection(other.kind(), collection)),
    }
}

fn has_member(owner: EntityRef<'_>, collection: Collection, member: EntityRef<'_>) -> Result<bool> {
    match (owner, collection, member) {
        (EntityRef::Company(company), Collection::MakeLaptops, EntityRef::Laptop(laptop)) => {
            Ok(company.makes_laptop(laptop.id()))
        }
        (EntityRef::Company(company), Collection::MakeProcessors, EntityRef::Processor(processor)) => {
            Ok(company.makes_processor(processor.id()))
        }
        (EntityRef::Processor(processor), Collection::InstalledIn, EntityRef::Laptop(laptop)) => {
            Ok(laptop.processor() == Some(processor))
        }
        (EntityRef::Memory(memory), Collection::InstalledIn, EntityRef::Laptop(laptop)) => {
            Ok(laptop.memory() == Some(memory))
        }
        (owner, _, member) => match collection.member_kind(owner.kind()) {
            Some(expected) => Err(Error::type_mismatch(
                Type::Entity(expected),
                Type::Entity(member.kind()),
            )),
            None => Err(no_collection(owner.kind(), collection)),
        },
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Compares two values.
///
/// Any comparison with nil is false. Ints and floats compare numerically
/// with IEEE semantics, so NaN is unequal to everything. Bools and
/// entities support only `==` and `!=`; entities compare by identity.
///
/// # Errors
///
/// Returns `TypeMismatch` for values of incompatible types and
/// `InvalidQuery` for an ordering operator on bools or entities.
pub fn compare(lhs: &Value, op: CmpOp, rhs: &Value) -> Result<bool> {
    let ordering = match (lhs, rhs) {
        (Value::Nil, _) | (_, Value::Nil) => return Ok(false),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (lhs.as_number(), rhs.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            }
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => return equality_only(op, a == b, lhs),
        (Value::Entity(ka, a), Value::Entity(kb, b)) if ka == kb => {
            return equality_only(op, a == b, lhs);
        }
        _ => return Err(Error::type_mismatch(lhs.value_type(), rhs.value_type())),
    };

    Ok(match ordering {
        None => op == CmpOp::Ne,
        Some(ordering) => match op {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        },
    })
}

fn equality_only(op: CmpOp, equal: bool, operand: &Value) -> Result<bool> {
    match op {
        CmpOp::Eq => Ok(equal),
        CmpOp::Ne => Ok(!equal),
        _ => Err(Error::invalid_query(format!(
            "operator {} is not defined on {}",
            op.symbol(),
            operand.value_type()
        ))),
    }
}
