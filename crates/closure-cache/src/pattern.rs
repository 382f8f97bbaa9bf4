//! Pattern query front-end.
//!
//! A pattern names an optional subject, a predicate and an optional object.
//! The predicate is resolved once, at this boundary, into a [`View`]; the
//! traversal code below only ever sees the enum.

use crate::cache::TransitiveCache;
use crate::closure::{Direction, Reach};
use crate::error::CacheError;
use crate::store::{AdjacencyStore, ClassMembers};
use crate::term::{TermId, TermRegistry};
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Which view of the relation a query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// The transitive reduction, with cycles shown as fully connected classes.
    Direct,
    /// The reflexive-transitive closure.
    Closed,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Direct => f.write_str("direct"),
            View::Closed => f.write_str("closed"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(View::Direct),
            "closed" => Ok(View::Closed),
            other => Err(format!("unknown view `{other}` (expected direct or closed)")),
        }
    }
}

/// One (from, to) pair of a view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge<T> {
    pub from: T,
    pub to: T,
}

impl<T> Edge<T> {
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }
}

/// A relation instance as seen by the surrounding reasoner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple<T, P> {
    pub subject: T,
    pub predicate: P,
    pub object: T,
}

impl<T, P> Triple<T, P> {
    pub fn new(subject: T, predicate: P, object: T) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Query pattern; `None` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern<T, P> {
    pub subject: Option<T>,
    pub predicate: Option<P>,
    pub object: Option<T>,
}

impl<T, P> Pattern<T, P> {
    pub fn new(subject: Option<T>, predicate: Option<P>, object: Option<T>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Pattern matching every triple.
    pub fn any() -> Self {
        Self::new(None, None, None)
    }
}

impl<T: PartialEq, P: PartialEq> Pattern<T, P> {
    pub fn matches(&self, triple: &Triple<T, P>) -> bool {
        self.subject.as_ref().is_none_or(|s| *s == triple.subject)
            && self.predicate.as_ref().is_none_or(|p| *p == triple.predicate)
            && self.object.as_ref().is_none_or(|o| *o == triple.object)
    }
}

/// Terms related to one anchor term, class by class.
struct Related<'a> {
    store: &'a AdjacencyStore,
    leads: Leads<'a>,
    class: Option<ClassMembers<'a>>,
}

enum Leads<'a> {
    Direct(btree_set::Iter<'a, TermId>),
    Closed(Reach<'a>),
}

impl Iterator for Leads<'_> {
    type Item = TermId;

    fn next(&mut self) -> Option<TermId> {
        match self {
            Leads::Direct(iter) => iter.next().copied(),
            Leads::Closed(reach) => reach.next(),
        }
    }
}

impl<'a> Related<'a> {
    fn new<T, P>(
        cache: &'a TransitiveCache<T, P>,
        anchor: TermId,
        view: View,
        direction: Direction,
    ) -> Self {
        let store = &cache.store;
        let leads = match view {
            View::Direct => Leads::Direct(store.neighbours(anchor, direction).iter()),
            View::Closed => Leads::Closed(cache.evaluator.reach(store, anchor, direction)),
        };
        Self {
            store,
            leads,
            class: Some(store.class_of(anchor)),
        }
    }
}

impl Iterator for Related<'_> {
    type Item = TermId;

    fn next(&mut self) -> Option<TermId> {
        loop {
            if let Some(term) = self.class.as_mut().and_then(Iterator::next) {
                return Some(term);
            }
            let lead = self.leads.next()?;
            self.class = Some(self.store.class_of(lead));
        }
    }
}

enum Shape<'a> {
    Empty,
    Single(Option<(TermId, TermId)>),
    Forward {
        anchor: TermId,
        related: Related<'a>,
    },
    Backward {
        anchor: TermId,
        related: Related<'a>,
    },
    All {
        view: View,
        next_term: usize,
        current: Option<(TermId, Related<'a>)>,
    },
}

/// Lazy sequence of matching edges. Each distinct pair appears once.
pub struct Edges<'a, T, P> {
    cache: &'a TransitiveCache<T, P>,
    shape: Shape<'a>,
}

impl<T, P> Edges<'_, T, P> {
    fn next_ids(&mut self) -> Option<(TermId, TermId)> {
        match &mut self.shape {
            Shape::Empty => None,
            Shape::Single(pair) => pair.take(),
            Shape::Forward { anchor, related } => related.next().map(|to| (*anchor, to)),
            Shape::Backward { anchor, related } => related.next().map(|from| (from, *anchor)),
            Shape::All {
                view,
                next_term,
                current,
            } => loop {
                if let Some((from, related)) = current.as_mut() {
                    if let Some(to) = related.next() {
                        return Some((*from, to));
                    }
                }
                if *next_term >= self.cache.store.len() {
                    return None;
                }
                let from = TermId::new(*next_term);
                *next_term += 1;
                *current = Some((from, Related::new(self.cache, from, *view, Direction::Forward)));
            },
        }
    }
}

impl<T: Clone, P> Iterator for Edges<'_, T, P> {
    type Item = Edge<T>;

    fn next(&mut self) -> Option<Edge<T>> {
        let (from, to) = self.next_ids()?;
        let registry: &TermRegistry<T> = &self.cache.registry;
        Some(Edge::new(registry.term(from).clone(), registry.term(to).clone()))
    }
}

/// [`Edges`] rendered as triples tagged with the closed predicate.
pub struct Triples<'a, T, P> {
    edges: Edges<'a, T, P>,
}

impl<T: Clone, P: Clone> Iterator for Triples<'_, T, P> {
    type Item = Triple<T, P>;

    fn next(&mut self) -> Option<Triple<T, P>> {
        let edge = self.edges.next()?;
        let predicate = self.edges.cache.closed_predicate.clone();
        Some(Triple::new(edge.from, predicate, edge.to))
    }
}

impl<T: Clone + Eq + Hash, P: Clone + Eq> TransitiveCache<T, P> {
    /// Resolve a pattern predicate; a wildcard reads the closed view.
    pub fn view_of(&self, predicate: Option<&P>) -> Result<View, CacheError> {
        match predicate {
            None => Ok(View::Closed),
            Some(p) if *p == self.direct_predicate => Ok(View::Direct),
            Some(p) if *p == self.closed_predicate => Ok(View::Closed),
            Some(_) => Err(CacheError::UnknownPredicate),
        }
    }

    /// Match a triple pattern against the direct or closed view.
    pub fn find(&self, pattern: &Pattern<T, P>) -> Result<Triples<'_, T, P>, CacheError> {
        let view = self.view_of(pattern.predicate.as_ref())?;
        let edges = self.find_edges(pattern.subject.as_ref(), view, pattern.object.as_ref());
        Ok(Triples { edges })
    }

    /// Whether any triple matches the pattern.
    pub fn contains(&self, pattern: &Pattern<T, P>) -> Result<bool, CacheError> {
        let view = self.view_of(pattern.predicate.as_ref())?;
        Ok(self
            .find_edges(pattern.subject.as_ref(), view, pattern.object.as_ref())
            .next()
            .is_some())
    }

    /// Typed query: `None` subject or object is a wildcard.
    pub fn find_edges(
        &self,
        subject: Option<&T>,
        view: View,
        object: Option<&T>,
    ) -> Edges<'_, T, P> {
        let lookup = |term: Option<&T>| term.map(|t| self.registry.lookup(t));
        let shape = match (lookup(subject), lookup(object)) {
            (Some(None), _) | (_, Some(None)) => Shape::Empty,
            (Some(Some(from)), Some(Some(to))) => {
                let related = match view {
                    View::Direct => self.store.has_direct(from, to),
                    View::Closed => self.evaluator.reaches(&self.store, from, to),
                };
                Shape::Single(related.then_some((from, to)))
            }
            (Some(Some(anchor)), None) => Shape::Forward {
                anchor,
                related: Related::new(self, anchor, view, Direction::Forward),
            },
            (None, Some(Some(anchor))) => Shape::Backward {
                anchor,
                related: Related::new(self, anchor, view, Direction::Backward),
            },
            (None, None) => Shape::All {
                view,
                next_term: 0,
                current: None,
            },
        };
        Edges { cache: self, shape }
    }

    /// Whether `from` is related to `to` in `view`.
    pub fn contains_edge(&self, from: &T, view: View, to: &T) -> bool {
        self.find_edges(Some(from), view, Some(to)).next().is_some()
    }
}
