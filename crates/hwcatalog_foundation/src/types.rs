//! Type descriptors for query validation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Type descriptor for attribute values and path results.
///
/// Used to check comparisons and aggregates before a query runs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The nil type (only value: nil).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Reference to an entity of the given kind.
    Entity(EntityKind),
}

impl Type {
    /// Returns true for `Int` and `Float`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns true if values of the two types can be compared with each other.
    ///
    /// Numeric types compare across `Int`/`Float`; entities compare only
    /// with entities of the same kind. Nil compares with anything (and the
    /// comparison is always false at runtime).
    #[must_use]
    pub fn comparable_with(self, other: Type) -> bool {
        match (self, other) {
            (Self::Nil, _) | (_, Self::Nil) => true,
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (a, b) => a == b,
        }
    }

    /// Returns true if values of this type have a meaningful order.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::String)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Entity(kind) => write!(f, "{kind}"),
        }
    }
}
