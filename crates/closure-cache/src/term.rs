//! Term registry: stable dense identities for relation endpoints.
//!
//! Terms are compared by external identity (`Eq + Hash`), registered the
//! first time they appear in an edge, and never removed short of
//! [`TermRegistry::clear`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Dense index of a registered term. Valid only for the registry (and the
/// adjacency store) that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(usize);

impl TermId {
    pub(crate) const MIN: TermId = TermId(0);
    pub(crate) const MAX: TermId = TermId(usize::MAX);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this term in its registry.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional map between external terms and [`TermId`]s.
#[derive(Debug, Clone)]
pub struct TermRegistry<T> {
    ids: HashMap<T, TermId>,
    terms: Vec<T>,
}

impl<T> Default for TermRegistry<T> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            terms: Vec::new(),
        }
    }
}

impl<T> TermRegistry<T> {
    /// External term for `id`.
    ///
    /// Panics if `id` was not issued by this registry.
    pub fn term(&self, id: TermId) -> &T {
        &self.terms[id.index()]
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate registered terms in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &T)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(index, term)| (TermId::new(index), term))
    }
}

impl<T: Clone + Eq + Hash> TermRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the identity of `term`, registering it if unseen.
    ///
    /// The flag is `true` when the term was newly registered.
    pub fn intern(&mut self, term: T) -> (TermId, bool) {
        if let Some(&id) = self.ids.get(&term) {
            return (id, false);
        }
        let id = TermId::new(self.terms.len());
        self.terms.push(term.clone());
        self.ids.insert(term, id);
        (id, true)
    }

    /// Identity of an already registered term.
    pub fn lookup(&self, term: &T) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn contains(&self, term: &T) -> bool {
        self.ids.contains_key(term)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.terms.clear();
    }
}
