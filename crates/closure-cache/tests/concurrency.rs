//! Shared readers: any number of threads may query one cache through `&self`.

use closure_cache::{HierarchyCaches, TransitiveCache, View};
use std::thread;

type Cache = TransitiveCache<String, String>;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn caches_can_cross_threads() {
    assert_send_sync::<Cache>();
    assert_send_sync::<TransitiveCache<u32, &'static str>>();
    assert_send_sync::<HierarchyCaches<String, String>>();
}

fn layered(caching: bool) -> Cache {
    let mut cache = TransitiveCache::new("direct".to_string(), "closed".to_string())
        .expect("distinct predicates");
    cache.set_caching(caching);
    for layer in 0..6 {
        for node in 0..5 {
            let from = format!("n{layer}-{node}");
            cache.add_edge(from.clone(), format!("n{}-{node}", layer + 1));
            cache.add_edge(from, format!("n{}-{}", layer + 1, (node + 1) % 5));
        }
    }
    // one cycle so classes are exercised too
    cache.add_edge("n3-0".to_string(), "n1-0".to_string());
    cache
}

fn snapshot(cache: &Cache, view: View) -> Vec<(String, String)> {
    let mut edges: Vec<(String, String)> = cache
        .find_edges(None, view, None)
        .map(|edge| (edge.from, edge.to))
        .collect();
    edges.sort();
    edges
}

#[test]
fn concurrent_readers_agree_while_the_memo_fills() {
    let live = snapshot(&layered(false), View::Closed);
    let cache = layered(true);

    thread::scope(|scope| {
        let readers: Vec<_> = (0..6)
            .map(|_| scope.spawn(|| snapshot(&cache, View::Closed)))
            .collect();
        for reader in readers {
            let seen = reader.join().expect("reader thread");
            assert_eq!(seen, live);
        }
    });

    assert_eq!(snapshot(&cache, View::Closed), live);
    cache.check_invariants().expect("invariants after concurrent reads");
}
