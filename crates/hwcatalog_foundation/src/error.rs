//! Error types for the hwcatalog system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::{EntityId, EntityKind};
use crate::types::Type;

/// The main error type for hwcatalog operations.
///
/// Renders as the kind, followed by the failing query's name when known.
#[derive(Debug, Error)]
#[error("{kind}{}", render_context(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a key lookup failure.
    #[must_use]
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound {
            kind,
            key: key.into(),
        })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates a duplicate identity key error.
    #[must_use]
    pub fn duplicate_key(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateKey {
            kind,
            key: key.into(),
        })
    }

    /// Creates a broken relationship invariant error.
    #[must_use]
    pub fn broken_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BrokenInvariant(message.into()))
    }

    /// Creates an error for removing an entity that is still referenced.
    #[must_use]
    pub fn in_use(entity: EntityId, referrers: usize) -> Self {
        Self::new(ErrorKind::InUse { entity, referrers })
    }

    /// Creates a malformed query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidQuery(message.into()))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this error reports a malformed query rather than
    /// a catalog problem.
    #[must_use]
    pub fn is_invalid_query(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidQuery(_) | ErrorKind::TypeMismatch { .. }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Lookup by identity key found nothing.
    #[error("{kind} not found: {key:?}")]
    NotFound {
        /// The kind of entity looked up.
        kind: EntityKind,
        /// The key that was looked up.
        key: String,
    },

    /// Entity was not found in storage.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity reference is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Two entities of the same kind share an identity key.
    #[error("duplicate {kind} key: {key:?}")]
    DuplicateKey {
        /// The kind of entity.
        kind: EntityKind,
        /// The colliding key.
        key: String,
    },

    /// Forward and inverse relationship links disagree.
    #[error("broken invariant: {0}")]
    BrokenInvariant(String),

    /// Entity cannot be removed while other entities reference it.
    #[error("entity {entity:?} is still referenced by {referrers} entities")]
    InUse {
        /// The entity whose removal was requested.
        entity: EntityId,
        /// How many entities still reference it.
        referrers: usize,
    },

    /// Query is structurally malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Values of incompatible types were compared or aggregated.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Semantic limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Semantic limits that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum query results exceeded.
    MaxQueryResults {
        /// The configured limit.
        limit: usize,
        /// How many results the query produced.
        actual: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxQueryResults { limit, actual } => {
                write!(f, "max query results ({limit}) exceeded with {actual}")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Operation or query name.
    pub source: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source operation.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "in {source}"),
            None => Ok(()),
        }
    }
}

fn render_context(context: &Option<ErrorContext>) -> String {
    match context {
        Some(context) if context.source.is_some() => format!(" ({context})"),
        _ => String::new(),
    }
}
