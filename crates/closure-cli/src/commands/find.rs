use crate::support::{load_cache_or_exit, load_config_or_exit, parse_view_or_exit};
use closure_cache::Edge;
use serde_json::json;

pub struct Args {
    pub edges: String,
    pub subject: Option<String>,
    pub object: Option<String>,
    pub view: String,
    pub config: Option<String>,
    pub caching: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let view = parse_view_or_exit(&args.view);
    let mut config = load_config_or_exit(args.config.as_deref());
    config.caching |= args.caching;
    let (cache, edges_path) = load_cache_or_exit(&args.edges, &config);

    let mut matches: Vec<Edge<String>> = cache
        .find_edges(args.subject.as_ref(), view, args.object.as_ref())
        .collect();
    matches.sort();

    if args.json {
        let payload = json!({
            "edges_path": edges_path.display().to_string(),
            "view": view,
            "subject": args.subject,
            "object": args.object,
            "caching": cache.is_caching(),
            "count": matches.len(),
            "edges": matches,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        for edge in &matches {
            println!("{} {}", edge.from, edge.to);
        }
    }
}
