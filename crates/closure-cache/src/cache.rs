//! The transitive-closure cache itself: registry, store, and evaluator
//! bound to one pair of predicates.

use crate::closure::{ClosureEvaluator, Direction, reach_set};
use crate::config::CacheConfig;
use crate::error::{CacheError, Invariant, InvariantViolation};
use crate::pattern::{Edge, View};
use crate::store::AdjacencyStore;
use crate::term::{TermId, TermRegistry};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Write as _};
use std::hash::Hash;

/// Size summary of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub terms: usize,
    pub asserted_edges: usize,
    pub direct_edges: usize,
    pub closed_edges: usize,
    pub classes: usize,
    pub largest_class: usize,
}

/// Incrementally maintained direct and closed views of one transitive,
/// reflexive relation.
///
/// `P` identifies the two views: `direct_predicate` names the transitive
/// reduction and `closed_predicate` the closure. Stored relations are always
/// tagged with the closed predicate.
///
/// Instances are cheap to copy with [`TransitiveCache::deep_copy`]; give
/// each independent inference session its own copy rather than sharing one
/// mutable instance.
#[derive(Debug, Clone)]
pub struct TransitiveCache<T, P> {
    pub(crate) direct_predicate: P,
    pub(crate) closed_predicate: P,
    pub(crate) registry: TermRegistry<T>,
    pub(crate) store: AdjacencyStore,
    /// Non-reflexive edges supplied by callers and not yet removed.
    pub(crate) asserted: BTreeSet<(TermId, TermId)>,
    pub(crate) evaluator: ClosureEvaluator,
}

impl<T: Clone + Eq + Hash, P: Clone + Eq> TransitiveCache<T, P> {
    /// Create an empty cache. Caching of closed results starts disabled.
    pub fn new(direct_predicate: P, closed_predicate: P) -> Result<Self, CacheError> {
        Self::with_config(direct_predicate, closed_predicate, &CacheConfig::default())
    }

    pub fn with_config(
        direct_predicate: P,
        closed_predicate: P,
        config: &CacheConfig,
    ) -> Result<Self, CacheError> {
        if direct_predicate == closed_predicate {
            return Err(CacheError::IndistinctPredicates);
        }
        Ok(Self {
            direct_predicate,
            closed_predicate,
            registry: TermRegistry::new(),
            store: AdjacencyStore::new(),
            asserted: BTreeSet::new(),
            evaluator: ClosureEvaluator::new(config.caching),
        })
    }

    pub fn direct_predicate(&self) -> &P {
        &self.direct_predicate
    }

    pub fn closed_predicate(&self) -> &P {
        &self.closed_predicate
    }

    /// Enable or disable memoization of closed-view results.
    ///
    /// Results never depend on the mode; disabling drops the memo.
    pub fn set_caching(&mut self, enable: bool) {
        self.evaluator.set_caching(enable);
    }

    pub fn is_caching(&self) -> bool {
        self.evaluator.is_caching()
    }

    /// Fully independent copy: registry, store, asserted edges and mode.
    /// The copy's memo starts empty.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Forget every term and edge.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.store.clear();
        self.asserted.clear();
        self.evaluator.invalidate();
    }

    /// Number of registered terms.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered terms, in registration order.
    pub fn subjects(&self) -> impl Iterator<Item = &T> {
        self.registry.iter().map(|(_, term)| term)
    }

    /// Whether `term` has appeared in any added relation.
    pub fn is_subject(&self, term: &T) -> bool {
        self.registry.contains(term)
    }

    /// Whether `term` belongs to a class of two or more mutually related terms.
    pub fn in_cycle(&self, term: &T) -> bool {
        self.registry
            .lookup(term)
            .is_some_and(|id| self.store.in_cycle(id))
    }

    /// Members of the class containing `term`, or nothing if unregistered.
    pub fn equivalents(&self, term: &T) -> Vec<&T> {
        self.registry
            .lookup(term)
            .map(|id| {
                self.store
                    .class_of(id)
                    .map(|member| self.registry.term(member))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            terms: self.registry.len(),
            asserted_edges: self.asserted.len(),
            direct_edges: 0,
            closed_edges: 0,
            classes: 0,
            largest_class: 0,
        };
        for lead in self.store.leads() {
            let size = self.store.class_size(lead);
            let direct_targets: usize = self
                .store
                .successors(lead)
                .iter()
                .map(|&next| self.store.class_size(next))
                .sum();
            let closed_targets: usize = self
                .evaluator
                .reach(&self.store, lead, Direction::Forward)
                .map(|next| self.store.class_size(next))
                .sum();
            stats.classes += 1;
            stats.largest_class = stats.largest_class.max(size);
            stats.direct_edges += size * (size + direct_targets);
            stats.closed_edges += size * (size + closed_targets);
        }
        stats
    }

    /// Redundant direct edges between distinct classes.
    ///
    /// Empty for any relation whose history never formed a cycle. Collapsing
    /// a cycle keeps the predecessor edges of the merged classes, so edges
    /// into a fresh class may show up here.
    pub fn redundant_edges(&self) -> Vec<Edge<T>> {
        self.store
            .redundant_edges()
            .into_iter()
            .map(|(from, to)| {
                Edge::new(self.registry.term(from).clone(), self.registry.term(to).clone())
            })
            .collect()
    }

    /// Fail with [`Invariant::Minimality`] if any direct edge is redundant.
    pub fn check_minimality(&self) -> Result<(), InvariantViolation> {
        match self.store.redundant_edges().first() {
            None => Ok(()),
            Some((from, to)) => Err(InvariantViolation::new(
                Invariant::Minimality,
                format!("direct edge {from} -> {to} is implied by another path"),
            )),
        }
    }

    /// Verify bookkeeping, acyclicity, reflexivity, and soundness of the
    /// closed view against the asserted edges.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.registry.len() != self.store.len() {
            return Err(InvariantViolation::new(
                Invariant::Bookkeeping,
                format!(
                    "registry holds {} terms but store holds {}",
                    self.registry.len(),
                    self.store.len()
                ),
            ));
        }
        self.store.check_structure()?;
        self.store.check_acyclic()?;

        let mut adjacency: HashMap<TermId, Vec<TermId>> = HashMap::new();
        for &(from, to) in &self.asserted {
            adjacency.entry(from).or_default().push(to);
        }

        for (id, _) in self.registry.iter() {
            if !self.evaluator.reaches(&self.store, id, id) {
                return Err(InvariantViolation::new(
                    Invariant::Reflexivity,
                    format!("{id} is not related to itself"),
                ));
            }

            let mut expected = BTreeSet::from([id]);
            let mut stack = vec![id];
            while let Some(current) = stack.pop() {
                for &next in adjacency.get(&current).into_iter().flatten() {
                    if expected.insert(next) {
                        stack.push(next);
                    }
                }
            }

            let mut actual: BTreeSet<TermId> = self.store.class_of(id).collect();
            for lead in reach_set(self.evaluator.reach(&self.store, id, Direction::Forward)) {
                actual.extend(self.store.class_of(lead));
            }
            if actual != expected {
                return Err(InvariantViolation::new(
                    Invariant::Soundness,
                    format!(
                        "closure of {id} has {} terms, asserted edges reach {}",
                        actual.len(),
                        expected.len()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// SHA-256 over the sorted direct view, for comparing caches.
    pub fn direct_digest(&self) -> String
    where
        T: AsRef<str>,
    {
        let mut pairs: Vec<(String, String)> = self
            .find_edges(None, View::Direct, None)
            .map(|edge| (edge.from.as_ref().to_string(), edge.to.as_ref().to_string()))
            .collect();
        pairs.sort();

        let mut hasher = Sha256::new();
        for (from, to) in &pairs {
            hasher.update(from.as_bytes());
            hasher.update([0x1f]);
            hasher.update(to.as_bytes());
            hasher.update([0x1e]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Debug rendering: one line per term with its lead, class and direct
    /// successors, terms sorted by display form.
    pub fn dump(&self) -> String
    where
        T: fmt::Display,
    {
        let name = |id: TermId| self.registry.term(id).to_string();
        let mut lines: Vec<String> = Vec::with_capacity(self.registry.len());
        for (id, term) in self.registry.iter() {
            let lead = self.store.lead(id);
            let mut class: Vec<String> = self.store.class_of(id).map(name).collect();
            class.sort();
            let mut succ: Vec<String> = self
                .store
                .successors(id)
                .iter()
                .flat_map(|&next| self.store.class_of(next))
                .map(name)
                .collect();
            succ.sort();

            let mut line = String::new();
            let _ = write!(line, "{term} lead={}", name(lead));
            if class.len() > 1 {
                let _ = write!(line, " class=[{}]", class.join(", "));
            }
            let _ = write!(line, " succ=[{}]", succ.join(", "));
            lines.push(line);
        }
        lines.sort();
        lines.join("\n")
    }
}
