use crate::support::{load_cache_or_exit, load_config_or_exit};
use serde_json::json;

pub fn run(edges: String, config: Option<String>, json_output: bool) {
    let config = load_config_or_exit(config.as_deref());
    let (cache, edges_path) = load_cache_or_exit(&edges, &config);

    let violation = cache.check_invariants().err();
    // Collapsing a cycle keeps edges into the new class, so these are
    // reported rather than treated as failures.
    let redundant = cache.redundant_edges();

    if json_output {
        let payload = json!({
            "edges_path": edges_path.display().to_string(),
            "result": if violation.is_none() { "accepted" } else { "rejected" },
            "violation": violation,
            "redundant_edge_count": redundant.len(),
            "redundant_edges": redundant,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("closure check {}", edges_path.display());
        match &violation {
            None => println!("  Result: accepted"),
            Some(v) => println!("  Result: rejected ({v})"),
        }
        if !redundant.is_empty() {
            println!("  Redundant direct edges: {}", redundant.len());
            for edge in &redundant {
                println!("    - {} -> {}", edge.from, edge.to);
            }
        }
    }

    if violation.is_some() {
        std::process::exit(1);
    }
}
