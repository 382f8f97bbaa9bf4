//! Regression scenarios for the direct and closed views.
//!
//! Edges are written `from -> to` over the closed predicate `P`; the direct
//! view is selected with `P'`.

use closure_cache::{CacheError, Pattern, TransitiveCache, Triple, View};

type Cache = TransitiveCache<&'static str, &'static str>;

const DIRECT: &str = "P'";
const CLOSED: &str = "P";

fn cache() -> Cache {
    TransitiveCache::new(DIRECT, CLOSED).expect("distinct predicates")
}

fn add_all(cache: &mut Cache, edges: &[(&'static str, &'static str)]) {
    for &(from, to) in edges {
        cache
            .add_relation(&Triple::new(from, CLOSED, to))
            .expect("closed predicate");
        cache.check_invariants().expect("invariants after add");
    }
}

fn remove(cache: &mut Cache, from: &'static str, to: &'static str) {
    cache
        .remove_relation(&Triple::new(from, CLOSED, to))
        .expect("closed predicate");
    cache.check_invariants().expect("invariants after remove");
}

/// Sorted `(subject, object)` pairs of a pattern query.
fn find(
    cache: &Cache,
    subject: Option<&'static str>,
    predicate: &'static str,
    object: Option<&'static str>,
) -> Vec<(&'static str, &'static str)> {
    let mut pairs: Vec<_> = cache
        .find(&Pattern::new(subject, Some(predicate), object))
        .expect("known predicate")
        .map(|triple| (triple.subject, triple.object))
        .collect();
    pairs.sort();
    pairs
}

fn pairs(items: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut items = items.to_vec();
    items.sort();
    items
}

const LATTICE: &[(&str, &str)] = &[
    ("a", "b"),
    ("b", "e"),
    ("b", "c"),
    ("e", "f"),
    ("c", "f"),
    ("f", "g"),
    ("d", "c"),
    ("d", "e"),
    ("d", "g"),
    ("a", "e"),
    ("d", "b"),
    ("a", "a"),
    ("b", "b"),
    ("c", "c"),
    ("d", "d"),
    ("e", "e"),
    ("f", "f"),
    ("g", "g"),
];

fn lattice() -> Cache {
    let mut cache = cache();
    add_all(&mut cache, LATTICE);
    cache
}

#[test]
fn lattice_direct_and_closed_views() {
    let cache = lattice();
    assert_eq!(find(&cache, Some("a"), DIRECT, None), pairs(&[("a", "a"), ("a", "b")]));
    assert_eq!(
        find(&cache, Some("a"), CLOSED, None),
        pairs(&[
            ("a", "a"),
            ("a", "b"),
            ("a", "c"),
            ("a", "e"),
            ("a", "f"),
            ("a", "g"),
        ])
    );
    assert_eq!(find(&cache, Some("a"), CLOSED, Some("g")), vec![("a", "g")]);
    assert_eq!(
        find(&cache, None, DIRECT, Some("b")),
        pairs(&[("a", "b"), ("b", "b"), ("d", "b")])
    );
    cache.check_minimality().expect("acyclic history stays minimal");
}

#[test]
fn lattice_answers_are_independent_of_caching() {
    let mut cache = lattice();
    let before = find(&cache, None, CLOSED, None);
    cache.set_caching(true);
    assert_eq!(find(&cache, None, CLOSED, None), before);
    // memo is warm now; ask again
    assert_eq!(find(&cache, None, CLOSED, None), before);
    assert_eq!(find(&cache, Some("d"), CLOSED, Some("f")), vec![("d", "f")]);
    cache.set_caching(false);
    assert_eq!(find(&cache, None, CLOSED, None), before);
}

#[test]
fn closing_a_cycle_connects_every_member() {
    let mut cache = lattice();
    add_all(&mut cache, &[("g", "e")]);

    assert_eq!(
        find(&cache, Some("e"), DIRECT, None),
        pairs(&[("e", "e"), ("e", "f"), ("e", "g")])
    );
    assert_eq!(
        find(&cache, Some("g"), DIRECT, None),
        pairs(&[("g", "e"), ("g", "f"), ("g", "g")])
    );
    assert_eq!(
        find(&cache, None, DIRECT, Some("e")),
        pairs(&[("b", "e"), ("c", "e"), ("e", "e"), ("f", "e"), ("g", "e")])
    );
    assert!(cache.in_cycle(&"f"));
    assert!(!cache.in_cycle(&"c"));
}

#[test]
fn cycle_with_outside_neighbours_keeps_their_edges() {
    let mut cache = cache();
    add_all(
        &mut cache,
        &[
            ("a", "b"),
            ("a", "c"),
            ("f", "b"),
            ("b", "g"),
            ("b", "d"),
            ("d", "c"),
            ("d", "e"),
            ("c", "e"),
            ("c", "b"),
        ],
    );

    assert_eq!(
        find(&cache, Some("c"), DIRECT, None),
        pairs(&[("c", "b"), ("c", "c"), ("c", "d"), ("c", "e"), ("c", "g")])
    );
    assert_eq!(
        find(&cache, None, DIRECT, Some("c")),
        pairs(&[("a", "c"), ("b", "c"), ("c", "c"), ("d", "c"), ("f", "c")])
    );
    assert_eq!(
        find(&cache, Some("f"), CLOSED, None),
        pairs(&[
            ("f", "b"),
            ("f", "c"),
            ("f", "d"),
            ("f", "e"),
            ("f", "f"),
            ("f", "g"),
        ])
    );
}

#[test]
fn later_edge_prunes_an_earlier_shortcut() {
    let mut cache = cache();
    add_all(&mut cache, &[("a", "b"), ("c", "d"), ("a", "d"), ("b", "c")]);
    assert_eq!(find(&cache, Some("a"), DIRECT, None), pairs(&[("a", "a"), ("a", "b")]));
    cache.check_minimality().expect("reduction is minimal");
}

#[test]
fn partial_cycle_has_no_extra_direct_edges() {
    let mut cache = cache();
    add_all(&mut cache, &[("a", "b"), ("c", "a"), ("c", "b"), ("a", "c")]);
    assert_eq!(
        find(&cache, Some("a"), DIRECT, None),
        pairs(&[("a", "a"), ("a", "b"), ("a", "c")])
    );
    assert_eq!(
        find(&cache, Some("c"), DIRECT, None),
        pairs(&[("c", "a"), ("c", "b"), ("c", "c")])
    );
}

#[test]
fn redundant_edge_inserted_last_is_pruned() {
    for order in [
        [("a", "b"), ("a", "c"), ("b", "c")],
        [("b", "c"), ("a", "c"), ("a", "b")],
        [("a", "c"), ("b", "c"), ("a", "b")],
    ] {
        let mut cache = cache();
        add_all(&mut cache, &order);
        assert_eq!(
            find(&cache, Some("a"), DIRECT, None),
            pairs(&[("a", "a"), ("a", "b")]),
            "insertion order {order:?}"
        );
        cache.check_minimality().expect("minimal");
    }
}

#[test]
fn removal_keeps_alternate_paths() {
    let mut cache = cache();
    add_all(
        &mut cache,
        &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")],
    );
    let closed_a = find(&cache, Some("a"), CLOSED, None);
    assert!(closed_a.contains(&("a", "e")));

    remove(&mut cache, "b", "d");
    assert_eq!(find(&cache, Some("a"), CLOSED, None), closed_a);
    assert_eq!(find(&cache, Some("b"), CLOSED, None), vec![("b", "b")]);

    remove(&mut cache, "a", "c");
    assert_eq!(
        find(&cache, Some("a"), CLOSED, None),
        pairs(&[("a", "a"), ("a", "b")])
    );
    assert_eq!(find(&cache, Some("b"), CLOSED, None), vec![("b", "b")]);
    assert!(cache.contains_edge(&"c", View::Closed, &"e"));
}

#[test]
fn removed_edge_endpoints_stay_registered() {
    let mut cache = cache();
    add_all(&mut cache, &[("a", "b")]);
    remove(&mut cache, "a", "b");

    assert!(cache.is_subject(&"a"));
    assert!(cache.is_subject(&"b"));
    assert_eq!(
        find(&cache, None, CLOSED, None),
        pairs(&[("a", "a"), ("b", "b")])
    );
}

#[test]
fn removing_a_derivable_edge_is_a_no_op() {
    let mut cache = cache();
    add_all(&mut cache, &[("a", "b"), ("b", "c")]);
    remove(&mut cache, "a", "c");
    assert!(cache.contains_edge(&"a", View::Closed, &"c"));
    remove(&mut cache, "a", "zz");
    assert_eq!(cache.stats().asserted_edges, 2);
}

#[test]
fn removing_a_cycle_edge_restores_the_hierarchy() {
    let mut cache = lattice();
    add_all(&mut cache, &[("g", "e")]);
    remove(&mut cache, "g", "e");

    let fresh = lattice();
    assert_eq!(
        find(&cache, None, DIRECT, None),
        find(&fresh, None, DIRECT, None)
    );
    assert_eq!(
        find(&cache, None, CLOSED, None),
        find(&fresh, None, CLOSED, None)
    );
}

#[test]
fn two_cycles_merge_through_a_bridge() {
    let mut cache = cache();
    add_all(
        &mut cache,
        &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c"), ("b", "c"), ("d", "a")],
    );
    let mut class = cache.equivalents(&"a");
    class.sort();
    assert_eq!(class, vec![&"a", &"b", &"c", &"d"]);
    assert_eq!(find(&cache, Some("c"), DIRECT, None).len(), 4);

    remove(&mut cache, "d", "a");
    assert!(cache.in_cycle(&"a"));
    assert!(cache.in_cycle(&"c"));
    assert!(cache.contains_edge(&"a", View::Closed, &"d"));
    assert!(!cache.contains_edge(&"d", View::Closed, &"a"));
}

#[test]
fn copies_made_before_population_stay_empty() {
    let mut original = cache();
    let copy = original.deep_copy();
    add_all(&mut original, &[("a", "b"), ("b", "c")]);

    assert!(copy.is_empty());
    assert!(find(&copy, None, CLOSED, None).is_empty());
    assert_eq!(find(&original, Some("a"), CLOSED, Some("c")), vec![("a", "c")]);
}

#[test]
fn copies_are_isolated_in_both_directions() {
    let mut original = lattice();
    original.set_caching(true);
    let before = find(&original, None, CLOSED, None);
    let mut copy = original.deep_copy();
    assert!(copy.is_caching());

    add_all(&mut copy, &[("g", "a")]);
    assert_eq!(find(&original, None, CLOSED, None), before);
    assert!(copy.in_cycle(&"a"));

    remove(&mut original, "f", "g");
    assert!(copy.contains_edge(&"a", View::Closed, &"g"));
    assert!(!original.contains_edge(&"a", View::Closed, &"g"));
}

#[test]
fn foreign_predicates_are_rejected() {
    let mut cache = lattice();
    let err = cache
        .find(&Pattern::new(Some("a"), Some("Q"), None))
        .err()
        .expect("foreign predicate");
    assert!(matches!(err, CacheError::UnknownPredicate));
    assert!(matches!(
        cache.contains(&Pattern::new(None, Some("Q"), None)),
        Err(CacheError::UnknownPredicate)
    ));
    assert!(matches!(
        cache.add_relation(&Triple::new("x", DIRECT, "y")),
        Err(CacheError::NotClosedPredicate)
    ));
    assert!(!cache.is_subject(&"x"));
}

#[test]
fn wildcard_predicate_reads_the_closed_view() {
    let cache = lattice();
    let wildcard: Vec<_> = cache
        .find(&Pattern::new(Some("a"), None, None))
        .expect("wildcard")
        .map(|triple| triple.object)
        .collect();
    assert_eq!(wildcard.len(), 6);
    assert!(
        cache
            .contains(&Pattern::new(Some("d"), None, Some("g")))
            .expect("wildcard")
    );
}
