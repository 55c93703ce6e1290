//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure surfaced by a storage collaborator.
///
/// Stores report either a value/absence or one of these. The coordinator
/// never swallows them; the HTTP boundary translates them into responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An insert would duplicate a unique key (e.g. a category name).
    #[error("unique violation: {0}")]
    UniqueViolation(String),

    /// A referential or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Any other store-level failure (connectivity, lock, corruption).
    #[error("store failure: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unique_violation(msg: impl Into<String>) -> Self {
        Self::UniqueViolation(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Domain-level error.
///
/// Keep this focused on the failures the coordinator itself originates
/// (`NotFound`, `AlreadyExists`) plus pass-through store failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found at read time.
    #[error("not found")]
    NotFound,

    /// A uniquely-named resource with this name already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A storage collaborator failed; propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }
}
