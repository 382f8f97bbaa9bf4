//! Per-session hierarchy caches.
//!
//! A reasoner keeps one cache for the subclass hierarchy and one for the
//! subproperty hierarchy. The caches computed from the schema are shared by
//! every session bound to that schema; the first mutation a session makes
//! gives it a private copy, so sessions never observe each other's edits.

use crate::cache::TransitiveCache;
use crate::config::CacheConfig;
use crate::error::CacheError;
use std::hash::Hash;
use std::sync::Arc;

pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

/// Direct-view alias of `rdfs:subClassOf`.
pub const DIRECT_SUBCLASS_OF: &str =
    "urn:x-hp-direct-predicate:http_//www.w3.org/2000/01/rdf-schema#subClassOf";
/// Direct-view alias of `rdfs:subPropertyOf`.
pub const DIRECT_SUBPROPERTY_OF: &str =
    "urn:x-hp-direct-predicate:http_//www.w3.org/2000/01/rdf-schema#subPropertyOf";

#[derive(Debug, Clone)]
pub struct HierarchyCaches<T, P> {
    subclass: Arc<TransitiveCache<T, P>>,
    subproperty: Arc<TransitiveCache<T, P>>,
}

impl<T: Clone + Eq + Hash, P: Clone + Eq> HierarchyCaches<T, P> {
    pub fn new(subclass: TransitiveCache<T, P>, subproperty: TransitiveCache<T, P>) -> Self {
        Self {
            subclass: Arc::new(subclass),
            subproperty: Arc::new(subproperty),
        }
    }

    /// A handle for a new session. Nothing is copied until one side mutates.
    pub fn bind(&self) -> Self {
        self.clone()
    }

    pub fn subclass(&self) -> &TransitiveCache<T, P> {
        &self.subclass
    }

    pub fn subproperty(&self) -> &TransitiveCache<T, P> {
        &self.subproperty
    }

    /// Mutable subclass cache, copied first if another session shares it.
    pub fn subclass_mut(&mut self) -> &mut TransitiveCache<T, P> {
        Arc::make_mut(&mut self.subclass)
    }

    /// Mutable subproperty cache, copied first if another session shares it.
    pub fn subproperty_mut(&mut self) -> &mut TransitiveCache<T, P> {
        Arc::make_mut(&mut self.subproperty)
    }

    /// Whether either cache is still shared with another handle.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.subclass) > 1 || Arc::strong_count(&self.subproperty) > 1
    }
}

impl HierarchyCaches<String, String> {
    /// Empty RDFS subclass and subproperty caches.
    pub fn rdfs(config: &CacheConfig) -> Result<Self, CacheError> {
        let subclass = TransitiveCache::with_config(
            DIRECT_SUBCLASS_OF.to_string(),
            RDFS_SUBCLASS_OF.to_string(),
            config,
        )?;
        let subproperty = TransitiveCache::with_config(
            DIRECT_SUBPROPERTY_OF.to_string(),
            RDFS_SUBPROPERTY_OF.to_string(),
            config,
        )?;
        Ok(Self::new(subclass, subproperty))
    }
}
