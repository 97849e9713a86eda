//! Static checking of predicates and queries against the entity model.
//!
//! Validation needs no catalog: it types every path from the kind of
//! `this` and the kinds bound by quantifiers, so a malformed query fails
//! the same way on an empty store as on a populated one.

use hwcatalog_foundation::{EntityKind, Error, Result, Type};

use crate::predicate::{CmpOp, Operand, Params, Path, Predicate, Range, Var};

/// Variables in scope while checking a predicate.
#[derive(Clone, Debug)]
pub struct Scope {
    this: EntityKind,
    vars: Vec<(String, EntityKind)>,
}

impl Scope {
    /// A scope where `this` has the given kind.
    #[must_use]
    pub fn new(this: EntityKind) -> Self {
        Self {
            this,
            vars: Vec::new(),
        }
    }

    /// The kind of `this`.
    #[must_use]
    pub fn this(&self) -> EntityKind {
        self.this
    }

    fn lookup(&self, var: &Var) -> Result<EntityKind> {
        match var {
            Var::This => Ok(self.this),
            Var::Named(name) => self
                .vars
                .iter()
                .rev()
                .find(|(bound, _)| bound == name)
                .map(|(_, kind)| *kind)
                .ok_or_else(|| Error::invalid_query(format!("unbound variable {name}"))),
        }
    }

    fn bind(&mut self, name: &str, kind: EntityKind) -> Result<()> {
        if name == "this" || self.vars.iter().any(|(bound, _)| bound == name) {
            return Err(Error::invalid_query(format!(
                "variable {name} is already bound"
            )));
        }
        self.vars.push((name.to_string(), kind));
        Ok(())
    }

    fn unbind(&mut self, count: usize) {
        let keep = self.vars.len().saturating_sub(count);
        self.vars.truncate(keep);
    }
}

/// Checks predicates and paths for well-formedness.
pub struct Validator<'p> {
    params: &'p Params,
}

impl<'p> Validator<'p> {
    /// A validator resolving parameter types from `params`.
    #[must_use]
    pub fn new(params: &'p Params) -> Self {
        Self { params }
    }

    /// Types a path, returning the type of the value it denotes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for unbound variables, links followed from a
    /// kind that lacks them, or attributes read from the wrong kind.
    pub fn path_type(&self, path: &Path, scope: &Scope) -> Result<Type> {
        let kind = Self::navigate(path, scope)?;
        match path.attribute {
            None => Ok(Type::Entity(kind)),
            Some(attribute) if attribute.owner() == kind => Ok(attribute.value_type()),
            Some(attribute) => Err(Error::invalid_query(format!(
                "{kind} has no attribute {} in {path}",
                attribute.name()
            ))),
        }
    }

    /// Types a path that must denote an entity, returning its kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the path is malformed or ends in an attribute.
    pub fn path_entity(&self, path: &Path, scope: &Scope) -> Result<EntityKind> {
        if path.attribute.is_some() {
            return Err(Error::invalid_query(format!(
                "{path} denotes a value, not an entity"
            )));
        }
        Self::navigate(path, scope)
    }

    fn navigate(path: &Path, scope: &Scope) -> Result<EntityKind> {
        let mut kind = scope.lookup(&path.root)?;
        for link in &path.links {
            kind = link.target(kind).ok_or_else(|| {
                Error::invalid_query(format!("{kind} has no link {} in {path}", link.name()))
            })?;
        }
        Ok(kind)
    }

    fn operand_type(&self, operand: &Operand, scope: &Scope) -> Result<Type> {
        match operand {
            Operand::Path(path) => self.path_type(path, scope),
            Operand::Const(value) => Ok(value.value_type()),
            Operand::Param(name) => self
                .params
                .get(name)
                .map(hwcatalog_foundation::Value::value_type)
                .ok_or_else(|| Error::invalid_query(format!("missing parameter {name}"))),
        }
    }

    fn range_kind(&self, range: &Range, scope: &Scope) -> Result<EntityKind> {
        match range {
            Range::Extent(kind) => Ok(*kind),
            Range::Collection { owner, collection } => {
                let owner_kind = self.path_entity(owner, scope)?;
                collection.member_kind(owner_kind).ok_or_else(|| {
                    Error::invalid_query(format!(
                        "{owner_kind} has no collection {} in {owner}",
                        collection.name()
                    ))
                })
            }
        }
    }

    /// Checks a predicate in the given scope.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for malformed paths, unbound variables,
    /// missing parameters or ordering operators on unordered types, and
    /// `TypeMismatch` for comparisons between incompatible types.
    pub fn check(&self, predicate: &Predicate, scope: &mut Scope) -> Result<()> {
        match predicate {
            Predicate::True => Ok(()),
            Predicate::Compare { lhs, op, rhs } => {
                let left = self.operand_type(lhs, scope)?;
                let right = self.operand_type(rhs, scope)?;
                check_comparison(left, *op, right)
            }
            Predicate::Contains {
                owner,
                collection,
                member,
            } => {
                let members = self.range_kind(&Range::collection(owner.clone(), *collection), scope)?;
                let candidate = self.path_entity(member, scope)?;
                if candidate == members {
                    Ok(())
                } else {
                    Err(Error::type_mismatch(
                        Type::Entity(members),
                        Type::Entity(candidate),
                    ))
                }
            }
            Predicate::SizeCompare {
                owner, collection, ..
            } => self
                .range_kind(&Range::collection(owner.clone(), *collection), scope)
                .map(|_| ()),
            Predicate::Exists { var, range, body } => {
                let kind = self.range_kind(range, scope)?;
                scope.bind(var, kind)?;
                let result = self.check(body, scope);
                scope.unbind(1);
                result
            }
            Predicate::ExistsPair {
                first,
                second,
                range,
                body,
                ..
            } => {
                let kind = self.range_kind(range, scope)?;
                scope.bind(first, kind)?;
                if let Err(err) = scope.bind(second, kind) {
                    scope.unbind(1);
                    return Err(err);
                }
                let result = self.check(body, scope);
                scope.unbind(2);
                result
            }
            Predicate::And(parts) | Predicate::Or(parts) => {
                parts.iter().try_for_each(|part| self.check(part, scope))
            }
            Predicate::Not(inner) => self.check(inner, scope),
        }
    }
}

/// Checks that values of two types may be compared with `op`.
///
/// # Errors
///
/// Returns `TypeMismatch` for incompatible types and `InvalidQuery` for an
/// ordering operator on bools or entities.
pub fn check_comparison(left: Type, op: CmpOp, right: Type) -> Result<()> {
    if !left.comparable_with(right) {
        return Err(Error::type_mismatch(left, right));
    }
    if op.is_ordering() {
        for ty in [left, right] {
            if ty != Type::Nil && !ty.is_ordered() {
                return Err(Error::invalid_query(format!(
                    "operator {} is not defined on {ty}",
                    op.symbol()
                )));
            }
        }
    }
    Ok(())
}
