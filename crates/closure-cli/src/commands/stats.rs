use crate::support::{load_cache_or_exit, load_config_or_exit};
use serde_json::json;

pub fn run(edges: String, config: Option<String>, dump: bool, json_output: bool) {
    let config = load_config_or_exit(config.as_deref());
    let (cache, edges_path) = load_cache_or_exit(&edges, &config);
    let stats = cache.stats();
    let digest = cache.direct_digest();

    if json_output {
        let mut payload = json!({
            "edges_path": edges_path.display().to_string(),
            "stats": stats,
            "direct_digest": digest,
        });
        if dump {
            let lines: Vec<String> = cache.dump().lines().map(str::to_string).collect();
            payload["dump"] = json!(lines);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("closure stats {}", edges_path.display());
        println!("  Terms: {}", stats.terms);
        println!("  Asserted edges: {}", stats.asserted_edges);
        println!("  Direct edges: {}", stats.direct_edges);
        println!("  Closed edges: {}", stats.closed_edges);
        println!(
            "  Classes: {} (largest {})",
            stats.classes, stats.largest_class
        );
        println!("  Direct digest: {digest}");
        if dump {
            println!();
            println!("{}", cache.dump());
        }
    }
}
