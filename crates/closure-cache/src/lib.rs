//! # closure-cache
//!
//! Incremental transitive-closure cache for schema-sized relations
//! (subclass/subproperty hierarchies).
//!
//! One relation is held in two views:
//! - the **direct** view: a transitive reduction of the relation, with every
//!   cycle collapsed into an equivalence class whose members are all directly
//!   related to each other;
//! - the **closed** view: the full reflexive-transitive closure.
//!
//! Both views are answered from the same adjacency store. Edge insertions
//! and removals repair the store locally; nothing is recomputed from scratch.
//!
//! ## Architecture
//!
//! ```text
//! TermRegistry        ← external terms ↔ dense TermId
//!     │
//! AdjacencyStore      ← class leads, members, direct succ/pred sets
//!     │
//! ClosureEvaluator    ← live walks or memoized reachable sets
//!     │
//! TransitiveCache     ← add/remove (update.rs), find/contains (pattern.rs)
//!     │
//! HierarchyCaches     ← per-session copy-on-write handles
//! ```
//!
//! A cache is single-writer: mutation takes `&mut self`, while any number of
//! readers may query through `&self` concurrently.

pub mod cache;
pub mod closure;
pub mod config;
pub mod error;
pub mod finder;
pub mod pattern;
pub mod session;
pub mod store;
pub mod term;
mod update;

pub use cache::{CacheStats, TransitiveCache};
pub use closure::Direction;
pub use config::CacheConfig;
pub use error::{CacheError, Invariant, InvariantViolation};
pub use finder::Finder;
pub use pattern::{Edge, Edges, Pattern, Triple, Triples, View};
pub use session::{
    DIRECT_SUBCLASS_OF, DIRECT_SUBPROPERTY_OF, HierarchyCaches, RDFS_SUBCLASS_OF,
    RDFS_SUBPROPERTY_OF,
};
pub use term::{TermId, TermRegistry};
