//! Closure evaluation over the adjacency store.
//!
//! Closed-view queries either walk the store on every call or reuse a
//! memoized list of reachable leads. The memo is keyed by (lead, direction)
//! and is dropped wholesale by every mutation, so both modes always agree.

use crate::store::AdjacencyStore;
use crate::term::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Which way a walk follows direct edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From a term towards its successors.
    Forward,
    /// From a term towards its predecessors.
    Backward,
}

type Memo = HashMap<(TermId, Direction), Arc<[TermId]>>;

#[derive(Debug, Default)]
pub(crate) struct ClosureEvaluator {
    caching: bool,
    memo: RwLock<Memo>,
}

impl Clone for ClosureEvaluator {
    /// Copies the mode only; the copy starts with an empty memo.
    fn clone(&self) -> Self {
        Self::new(self.caching)
    }
}

impl ClosureEvaluator {
    pub(crate) fn new(caching: bool) -> Self {
        Self {
            caching,
            memo: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn is_caching(&self) -> bool {
        self.caching
    }

    pub(crate) fn set_caching(&mut self, enable: bool) {
        if !enable {
            self.invalidate();
        }
        self.caching = enable;
    }

    /// Forget every memoized result.
    pub(crate) fn invalidate(&mut self) {
        self.memo
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[cfg(test)]
    pub(crate) fn memo_len(&self) -> usize {
        self.memo.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Leads strictly reachable from the class of `id`.
    pub(crate) fn reach<'a>(
        &self,
        store: &'a AdjacencyStore,
        id: TermId,
        direction: Direction,
    ) -> Reach<'a> {
        let lead = store.lead(id);
        if !self.caching {
            return Reach::Live(Walk::new(store, lead, direction));
        }

        let key = (lead, direction);
        if let Some(hit) = self
            .memo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Reach::Memo {
                leads: Arc::clone(hit),
                next: 0,
            };
        }

        let leads: Arc<[TermId]> = Walk::new(store, lead, direction).collect();
        self.memo
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&leads));
        Reach::Memo { leads, next: 0 }
    }

    /// Whether `to` is in the closed view of `from`.
    pub(crate) fn reaches(&self, store: &AdjacencyStore, from: TermId, to: TermId) -> bool {
        let target = store.lead(to);
        if store.lead(from) == target {
            return true;
        }
        if self.caching {
            self.reach(store, from, Direction::Forward)
                .any(|lead| lead == target)
        } else {
            store.reaches(from, to)
        }
    }
}

/// Lazy depth-first walk over leads, excluding the start.
#[derive(Debug)]
pub struct Walk<'a> {
    store: &'a AdjacencyStore,
    direction: Direction,
    stack: Vec<TermId>,
    seen: HashSet<TermId>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(store: &'a AdjacencyStore, start: TermId, direction: Direction) -> Self {
        let mut walk = Self {
            store,
            direction,
            stack: Vec::new(),
            seen: HashSet::new(),
        };
        walk.seen.insert(start);
        walk.expand(start);
        walk
    }

    fn expand(&mut self, from: TermId) {
        for &next in self.store.neighbours(from, self.direction) {
            if self.seen.insert(next) {
                self.stack.push(next);
            }
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = TermId;

    fn next(&mut self) -> Option<TermId> {
        let current = self.stack.pop()?;
        self.expand(current);
        Some(current)
    }
}

/// Reachable leads, from either a live walk or the memo.
#[derive(Debug)]
pub enum Reach<'a> {
    Live(Walk<'a>),
    Memo { leads: Arc<[TermId]>, next: usize },
}

impl Iterator for Reach<'_> {
    type Item = TermId;

    fn next(&mut self) -> Option<TermId> {
        match self {
            Reach::Live(walk) => walk.next(),
            Reach::Memo { leads, next } => {
                let lead = leads.get(*next).copied()?;
                *next += 1;
                Some(lead)
            }
        }
    }
}

/// Convenience used by checks: collect a reach into a set.
pub(crate) fn reach_set(reach: Reach<'_>) -> BTreeSet<TermId> {
    reach.collect()
}
