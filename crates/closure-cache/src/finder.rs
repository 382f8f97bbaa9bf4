//! Finder seam: anything that can answer triple patterns.
//!
//! A reasoner routes pattern queries through a chain of finders. The cache
//! answers the direct and closed predicates completely; everything else is
//! delegated to a continuation (the base data, another cache, ...).

use crate::cache::TransitiveCache;
use crate::pattern::{Pattern, Triple};
use std::hash::Hash;

/// Boxed lazy triple sequence.
pub type TripleIter<'a, T, P> = Box<dyn Iterator<Item = Triple<T, P>> + 'a>;

pub trait Finder<T, P> {
    /// All triples matching `pattern`. Patterns this finder knows nothing
    /// about yield an empty sequence.
    fn find_triples<'a>(&'a self, pattern: &Pattern<T, P>) -> TripleIter<'a, T, P>;

    fn contains_triple(&self, pattern: &Pattern<T, P>) -> bool {
        self.find_triples(pattern).next().is_some()
    }
}

impl<T, P> Finder<T, P> for [Triple<T, P>]
where
    T: Clone + PartialEq,
    P: Clone + PartialEq,
{
    fn find_triples<'a>(&'a self, pattern: &Pattern<T, P>) -> TripleIter<'a, T, P> {
        let pattern = pattern.clone();
        Box::new(
            self.iter()
                .filter(move |triple| pattern.matches(triple))
                .cloned(),
        )
    }
}

impl<T, P> Finder<T, P> for Vec<Triple<T, P>>
where
    T: Clone + PartialEq,
    P: Clone + PartialEq,
{
    fn find_triples<'a>(&'a self, pattern: &Pattern<T, P>) -> TripleIter<'a, T, P> {
        self.as_slice().find_triples(pattern)
    }
}

impl<T, P> Finder<T, P> for TransitiveCache<T, P>
where
    T: Clone + Eq + Hash,
    P: Clone + Eq,
{
    fn find_triples<'a>(&'a self, pattern: &Pattern<T, P>) -> TripleIter<'a, T, P> {
        match self.find(pattern) {
            Ok(triples) => Box::new(triples),
            Err(_) => Box::new(std::iter::empty()),
        }
    }
}

impl<T, P> TransitiveCache<T, P>
where
    T: Clone + Eq + Hash,
    P: Clone + Eq,
{
    /// Answer `pattern` from the cache where it is authoritative and from
    /// `continuation` otherwise.
    ///
    /// - wildcard predicate: cache results followed by the continuation's;
    /// - direct or closed predicate: the cache alone;
    /// - any other predicate: the continuation alone.
    pub fn find_with_continuation<'a, F>(
        &'a self,
        pattern: &Pattern<T, P>,
        continuation: &'a F,
    ) -> TripleIter<'a, T, P>
    where
        F: Finder<T, P> + ?Sized,
    {
        match &pattern.predicate {
            None => Box::new(
                self.find_triples(pattern)
                    .chain(continuation.find_triples(pattern)),
            ),
            Some(p) if *p == self.direct_predicate || *p == self.closed_predicate => {
                self.find_triples(pattern)
            }
            Some(_) => continuation.find_triples(pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Cache = TransitiveCache<&'static str, &'static str>;
    type Data = Vec<Triple<&'static str, &'static str>>;

    fn setup() -> (Cache, Data) {
        let mut cache = TransitiveCache::new("direct", "closed").expect("cache");
        cache.add_edge("a", "b");
        let data = vec![
            Triple::new("a", "label", "Alpha"),
            Triple::new("a", "closed", "z"),
        ];
        (cache, data)
    }

    #[test]
    fn cache_predicates_are_answered_by_the_cache_alone() {
        let (cache, data) = setup();
        let found: Vec<_> = cache
            .find_with_continuation(&Pattern::new(Some("a"), Some("closed"), None), &data)
            .collect();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.object != "z"));
    }

    #[test]
    fn other_predicates_go_to_the_continuation() {
        let (cache, data) = setup();
        let found: Vec<_> = cache
            .find_with_continuation(&Pattern::new(Some("a"), Some("label"), None), &data)
            .collect();
        assert_eq!(found, vec![Triple::new("a", "label", "Alpha")]);
    }

    #[test]
    fn wildcard_predicate_chains_both_sources() {
        let (cache, data) = setup();
        let found: Vec<_> = cache
            .find_with_continuation(&Pattern::new(Some("a"), None, None), &data)
            .collect();
        // a-a, a-b from the cache, then both data triples
        assert_eq!(found.len(), 4);
        assert_eq!(found[2], Triple::new("a", "label", "Alpha"));
    }

    #[test]
    fn unknown_predicate_through_finder_is_empty() {
        let (cache, _) = setup();
        assert!(!cache.contains_triple(&Pattern::new(None, Some("label"), None)));
        assert!(cache.contains_triple(&Pattern::new(Some("a"), Some("direct"), Some("b"))));
    }
}
