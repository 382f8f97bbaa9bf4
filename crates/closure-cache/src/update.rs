//! Incremental updates: insertion and removal of relation instances.
//!
//! Insertion keeps the direct view reduced by pruning, in every class that
//! reaches the new edge's source, the direct edges the new edge makes
//! derivable. An insertion that closes a cycle collapses every class on the
//! cycle into one.
//!
//! Removal rebuilds only the classes that reach the removed edge's source:
//! nothing else can observe the edge. Those classes are split into
//! singletons and their asserted edges are applied again, so an edge that
//! was redundant before the removal comes back as a direct edge if it is
//! now required.

use crate::cache::TransitiveCache;
use crate::error::CacheError;
use crate::pattern::Triple;
use crate::term::TermId;
use std::collections::BTreeSet;
use std::hash::Hash;
use tracing::{debug, trace};

impl<T: Clone + Eq + Hash, P: Clone + Eq> TransitiveCache<T, P> {
    /// Add a relation instance tagged with the closed predicate.
    pub fn add_relation(&mut self, triple: &Triple<T, P>) -> Result<(), CacheError> {
        self.require_closed(&triple.predicate)?;
        self.add_edge(triple.subject.clone(), triple.object.clone());
        Ok(())
    }

    /// Remove a relation instance tagged with the closed predicate.
    ///
    /// Only direct edges can be removed; removing a relation that is merely
    /// derivable is a no-op.
    pub fn remove_relation(&mut self, triple: &Triple<T, P>) -> Result<(), CacheError> {
        self.require_closed(&triple.predicate)?;
        self.remove_edge(&triple.subject, &triple.object);
        Ok(())
    }

    /// Bulk-load relation instances. Returns whether any were supplied.
    pub fn cache_all<I>(&mut self, edges: I) -> bool
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let mut found = false;
        for (from, to) in edges {
            found = true;
            self.add_edge(from, to);
        }
        found
    }

    /// Record `from → to`.
    pub fn add_edge(&mut self, from: T, to: T) {
        let from = self.register(from);
        let to = self.register(to);
        if from == to || !self.asserted.insert((from, to)) {
            return;
        }
        self.apply(from, to);
        self.debug_verify();
    }

    /// Retract `from → to` if it is currently a direct edge.
    pub fn remove_edge(&mut self, from: &T, to: &T) {
        let (Some(from), Some(to)) = (self.registry.lookup(from), self.registry.lookup(to)) else {
            return;
        };
        if from == to {
            return;
        }
        let (start, end) = (self.store.lead(from), self.store.lead(to));
        if start != end && !self.store.has_direct(start, end) {
            trace!(from = %from, to = %to, "remove: not a direct edge");
            return;
        }
        if !self.asserted.remove(&(from, to)) {
            trace!(from = %from, to = %to, "remove: edge was never asserted");
            return;
        }
        self.rebuild_from(start);
        self.debug_verify();
    }

    pub(crate) fn require_closed(&self, predicate: &P) -> Result<(), CacheError> {
        if *predicate == self.closed_predicate {
            Ok(())
        } else {
            Err(CacheError::NotClosedPredicate)
        }
    }

    fn register(&mut self, term: T) -> TermId {
        let (id, fresh) = self.registry.intern(term);
        if fresh {
            let stored = self.store.push();
            debug_assert_eq!(stored, id, "registry and store out of step");
        }
        id
    }

    /// Fold one asserted edge into the store.
    fn apply(&mut self, from: TermId, to: TermId) {
        let (start, end) = (self.store.lead(from), self.store.lead(to));
        if start == end || self.store.reaches(start, end) {
            trace!(from = %from, to = %to, "edge already derivable");
            return;
        }
        self.evaluator.invalidate();

        if self.store.reaches(end, start) {
            let below = self.store.descendants(end);
            let component: BTreeSet<TermId> = self
                .store
                .ancestors(start)
                .intersection(&below)
                .copied()
                .collect();
            self.store.merge(start, &component);
            let pruned = self.store.prune_successors(start);
            debug!(
                lead = %start,
                merged = component.len(),
                class_size = self.store.class_size(start),
                pruned,
                "collapsed cycle into one class"
            );
            return;
        }

        let covered = self.store.descendants(end);
        let mut pruned = 0;
        for lead in self.store.ancestors(start) {
            pruned += self.store.prune_into(lead, &covered);
        }
        self.store.link(start, end);
        debug!(from = %start, to = %end, pruned, "inserted direct edge");
    }

    /// Split and re-derive every class that reaches `lead`.
    fn rebuild_from(&mut self, lead: TermId) {
        self.evaluator.invalidate();
        let region = self.store.ancestors(lead);
        let mut terms = self.store.detach(&region);
        terms.sort();

        let mut edges = Vec::new();
        for &term in &terms {
            edges.extend(
                self.asserted
                    .range((term, TermId::MIN)..=(term, TermId::MAX))
                    .copied(),
            );
        }
        debug!(
            classes = region.len(),
            terms = terms.len(),
            edges = edges.len(),
            "rebuilding region after removal"
        );
        for (from, to) in edges {
            self.apply(from, to);
        }
    }

    #[cfg(debug_assertions)]
    fn debug_verify(&self) {
        if let Err(violation) = self
            .store
            .check_structure()
            .and_then(|()| self.store.check_acyclic())
        {
            panic!("transitive cache corrupted: {violation}");
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_verify(&self) {}
}
