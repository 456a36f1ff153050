//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HomeRefError`] via `#[from]` or an explicit `From` impl.

/// Boxed source error carried across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every homeref operation.
#[derive(Debug, thiserror::Error)]
pub enum HomeRefError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// Nothing matched the requested reference.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The remote registry failed to answer.
    #[error("upstream registry error")]
    Upstream(#[source] BoxError),

    /// The durable cache tier failed.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// A value could not be (de)serialized.
    #[error("codec error")]
    Codec(#[from] serde_json::Error),
}

impl HomeRefError {
    /// Whether this error means "nothing matched" rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Violations of domain invariants.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("entity id must not be empty")]
    EmptyEntityId,

    #[error("entity id `{0}` must have the form <domain>.<slug>")]
    MalformedEntityId(String),

    #[error("query must not be empty")]
    EmptyQuery,
}

/// A lookup that produced no candidate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (`"Entity"`, `"Area"`, …).
    pub entity: &'static str,
    /// The reference that failed to match.
    pub id: String,
}
