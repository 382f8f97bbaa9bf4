//! Error types for cache operations.

use serde::{Deserialize, Serialize};

/// Errors reported to callers before any mutation takes place.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A pattern named a predicate that is neither the direct nor the
    /// closed predicate of this cache.
    #[error("unknown predicate: pattern must use the direct or closed predicate of this cache")]
    UnknownPredicate,

    /// A relation to add or remove was not tagged with the closed predicate.
    #[error("relation must use the closed predicate of this cache")]
    NotClosedPredicate,

    /// The direct and closed predicates supplied at construction are equal.
    #[error("direct and closed predicates must be distinct")]
    IndistinctPredicates,

    /// Configuration could not be parsed.
    #[error("invalid cache configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read cache configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Which structural invariant a check found broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invariant {
    /// Lead pointers, member lists, or succ/pred symmetry disagree.
    Bookkeeping,
    /// A registered term is not closed-related to itself.
    Reflexivity,
    /// The closed view differs from reachability over asserted edges.
    Soundness,
    /// A direct edge between classes is derivable from other direct edges.
    Minimality,
    /// The class graph contains a cycle that was not collapsed.
    Acyclicity,
}

/// A broken invariant. Apart from [`Invariant::Minimality`] after a cycle
/// collapse, any value of this type indicates a defect in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{invariant:?} invariant violated: {description}")]
pub struct InvariantViolation {
    pub invariant: Invariant,
    pub description: String,
}

impl InvariantViolation {
    pub(crate) fn new(invariant: Invariant, description: impl Into<String>) -> Self {
        Self {
            invariant,
            description: description.into(),
        }
    }
}
