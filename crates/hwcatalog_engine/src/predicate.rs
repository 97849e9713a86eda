//! Data-described predicates over the entity graph.
//!
//! A [`Predicate`] is a tree of comparisons, membership tests, cardinality
//! tests and existential quantifiers. Attribute reads and relationship
//! traversals are expressed as [`Path`]s rooted at `this` or at a variable
//! bound by an enclosing quantifier.

use std::collections::HashMap;
use std::fmt;

use hwcatalog_foundation::{EntityKind, Type, Value};

// =============================================================================
// Vocabulary
// =============================================================================

/// A scalar attribute of one entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `Company.name`
    Name,
    /// `Laptop.modelName`
    ModelName,
    /// `Laptop.price`
    Price,
    /// `Laptop.hasHDScreen`
    HasHdScreen,
    /// `Laptop.hardDriveCapacity`
    HardDriveCapacity,
    /// `Processor.clockSpeed`
    ClockSpeed,
    /// `Memory.size`
    Size,
}

impl Attribute {
    /// The entity kind that carries this attribute.
    #[must_use]
    pub const fn owner(self) -> EntityKind {
        match self {
            Self::Name => EntityKind::Company,
            Self::ModelName | Self::Price | Self::HasHdScreen | Self::HardDriveCapacity => {
                EntityKind::Laptop
            }
            Self::ClockSpeed => EntityKind::Processor,
            Self::Size => EntityKind::Memory,
        }
    }

    /// The type of the attribute's values.
    #[must_use]
    pub const fn value_type(self) -> Type {
        match self {
            Self::Name | Self::ModelName => Type::String,
            Self::Price | Self::HardDriveCapacity | Self::Size => Type::Int,
            Self::HasHdScreen => Type::Bool,
            Self::ClockSpeed => Type::Float,
        }
    }

    /// Attribute name as written in queries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ModelName => "modelName",
            Self::Price => "price",
            Self::HasHdScreen => "hasHDScreen",
            Self::HardDriveCapacity => "hardDriveCapacity",
            Self::ClockSpeed => "clockSpeed",
            Self::Size => "size",
        }
    }
}

/// A single-valued relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Link {
    /// `Laptop.processor`
    Processor,
    /// `Laptop.memory`
    Memory,
    /// `Laptop.madeBy` / `Processor.madeBy`
    MadeBy,
}

impl Link {
    /// The kind reached by following this link from `from`, if the link
    /// exists on that kind.
    #[must_use]
    pub const fn target(self, from: EntityKind) -> Option<EntityKind> {
        match (from, self) {
            (EntityKind::Laptop, Self::Processor) => Some(EntityKind::Processor),
            (EntityKind::Laptop, Self::Memory) => Some(EntityKind::Memory),
            (EntityKind::Laptop | EntityKind::Processor, Self::MadeBy) => {
                Some(EntityKind::Company)
            }
            _ => None,
        }
    }

    /// Link name as written in queries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Processor => "processor",
            Self::Memory => "memory",
            Self::MadeBy => "madeBy",
        }
    }
}

/// A collection-valued relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `Company.makeLaptops`
    MakeLaptops,
    /// `Company.makeProcessors`
    MakeProcessors,
    /// Laptops a processor or memory module is installed in.
    InstalledIn,
}

impl Collection {
    /// The kind of the members when the collection is read from `owner`.
    #[must_use]
    pub const fn member_kind(self, owner: EntityKind) -> Option<EntityKind> {
        match (owner, self) {
            (EntityKind::Company, Self::MakeLaptops)
            | (EntityKind::Processor | EntityKind::Memory, Self::InstalledIn) => {
                Some(EntityKind::Laptop)
            }
            (EntityKind::Company, Self::MakeProcessors) => Some(EntityKind::Processor),
            _ => None,
        }
    }

    /// Collection name as written in queries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MakeLaptops => "makeLaptops",
            Self::MakeProcessors => "makeProcessors",
            Self::InstalledIn => "installedIn",
        }
    }
}

// =============================================================================
// Paths and operands
// =============================================================================

/// The root of a path: the candidate entity or a quantified variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Var {
    /// The entity being filtered.
    This,
    /// A variable bound by an enclosing `Exists`/`ExistsPair`.
    Named(String),
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::This => f.write_str("this"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A navigation chain such as `this.processor.madeBy.name`.
///
/// Without a trailing attribute the path denotes the entity reached, and
/// compares by identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    /// Where navigation starts.
    pub root: Var,
    /// Links followed in order.
    pub links: Vec<Link>,
    /// Attribute read at the end, if any.
    pub attribute: Option<Attribute>,
}

impl Path {
    /// A path rooted at `this`.
    #[must_use]
    pub fn this() -> Self {
        Self {
            root: Var::This,
            links: Vec::new(),
            attribute: None,
        }
    }

    /// A path rooted at a quantified variable.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self {
            root: Var::Named(name.into()),
            links: Vec::new(),
            attribute: None,
        }
    }

    /// Follows a single-valued link.
    #[must_use]
    pub fn via(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Reads an attribute at the end of the path.
    #[must_use]
    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.attribute = Some(attribute);
        self
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for link in &self.links {
            write!(f, ".{}", link.name())?;
        }
        if let Some(attribute) = self.attribute {
            write!(f, ".{}", attribute.name())?;
        }
        Ok(())
    }
}

/// One side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A path read from the bindings.
    Path(Path),
    /// A literal value.
    Const(Value),
    /// A named query parameter supplied at execution time.
    Param(String),
}

impl Operand {
    /// A named parameter.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    /// A literal value.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Const(value.into())
    }
}

impl From<Path> for Operand {
    fn from(path: Path) -> Self {
        Self::Path(path)
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// True for `<`, `<=`, `>`, `>=`.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    /// Compares two counts.
    #[must_use]
    pub fn test_counts(self, lhs: usize, rhs: usize) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
        }
    }

    /// Operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// What a quantified variable ranges over.
#[derive(Clone, Debug, PartialEq)]
pub enum Range {
    /// Members of a collection reached from a path.
    Collection {
        /// Path to the owning entity.
        owner: Path,
        /// The collection read from it.
        collection: Collection,
    },
    /// Every live entity of a kind.
    Extent(EntityKind),
}

impl Range {
    /// Members of `owner.collection`.
    #[must_use]
    pub fn collection(owner: Path, collection: Collection) -> Self {
        Self::Collection { owner, collection }
    }
}

/// A boolean expression over `this` and quantified variables.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Always true.
    True,
    /// `lhs op rhs`
    Compare {
        /// Left operand.
        lhs: Operand,
        /// Operator.
        op: CmpOp,
        /// Right operand.
        rhs: Operand,
    },
    /// `owner.collection contains member`
    Contains {
        /// Path to the owning entity.
        owner: Path,
        /// The collection tested.
        collection: Collection,
        /// Path to the candidate member entity.
        member: Path,
    },
    /// `|owner.collection| op count`
    SizeCompare {
        /// Path to the owning entity.
        owner: Path,
        /// The collection counted.
        collection: Collection,
        /// Operator.
        op: CmpOp,
        /// Count compared against.
        count: usize,
    },
    /// `exists var in range : body`
    Exists {
        /// Variable bound to each member in turn.
        var: String,
        /// What the variable ranges over.
        range: Range,
        /// Condition tested per binding.
        body: Box<Predicate>,
    },
    /// `exists first, second in range : body`
    ///
    /// The range must hold at least two members. With `distinct`, a member
    /// is never paired with itself.
    ExistsPair {
        /// First variable.
        first: String,
        /// Second variable.
        second: String,
        /// What both variables range over.
        range: Range,
        /// Skip pairs binding the same member twice.
        distinct: bool,
        /// Condition tested per pair.
        body: Box<Predicate>,
    },
    /// All must hold. Empty is true.
    And(Vec<Predicate>),
    /// Any must hold. Empty is false.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
}

impl Predicate {
    /// `lhs op rhs`
    #[must_use]
    pub fn compare(lhs: impl Into<Operand>, op: CmpOp, rhs: impl Into<Operand>) -> Self {
        Self::Compare {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    /// `owner.collection contains member`
    #[must_use]
    pub fn contains(owner: Path, collection: Collection, member: Path) -> Self {
        Self::Contains {
            owner,
            collection,
            member,
        }
    }

    /// `|owner.collection| op count`
    #[must_use]
    pub fn size(owner: Path, collection: Collection, op: CmpOp, count: usize) -> Self {
        Self::SizeCompare {
            owner,
            collection,
            op,
            count,
        }
    }

    /// `exists var in range : body`
    #[must_use]
    pub fn exists(var: impl Into<String>, range: Range, body: Predicate) -> Self {
        Self::Exists {
            var: var.into(),
            range,
            body: Box::new(body),
        }
    }

    /// `exists first, second in range : body`, never pairing a member with itself.
    #[must_use]
    pub fn exists_distinct_pair(
        first: impl Into<String>,
        second: impl Into<String>,
        range: Range,
        body: Predicate,
    ) -> Self {
        Self::ExistsPair {
            first: first.into(),
            second: second.into(),
            range,
            distinct: true,
            body: Box::new(body),
        }
    }

    /// Conjunction of all predicates.
    #[must_use]
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::And(predicates.into_iter().collect())
    }

    /// Disjunction of all predicates.
    #[must_use]
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Or(predicates.into_iter().collect())
    }

    /// Negation.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Named parameter values supplied when a query runs.
#[derive(Clone, Debug, Default)]
pub struct Params {
    values: HashMap<String, Value>,
}

impl Params {
    /// No parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
