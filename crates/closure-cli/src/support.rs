use closure_cache::{CacheConfig, TransitiveCache, Triple, View};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

pub type StringCache = TransitiveCache<String, String>;

/// One instruction from an edge file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLine {
    Add(Triple<String, String>),
    Remove(Triple<String, String>),
}

pub fn init_logging_or_exit(level: &str) {
    let level: Level = level.parse().unwrap_or_else(|_| {
        eprintln!("error: unknown log level `{level}` (expected trace|debug|info|warn|error)");
        std::process::exit(1);
    });
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub fn parse_view_or_exit(view: &str) -> View {
    view.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_config_or_exit(config: Option<&str>) -> CacheConfig {
    let Some(path) = config else {
        return CacheConfig::default();
    };
    CacheConfig::load(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load config {path}: {e}");
        std::process::exit(1);
    })
}

/// Build a cache from an edge file, exiting on any unreadable or invalid line.
pub fn load_cache_or_exit(edges: &str, config: &CacheConfig) -> (StringCache, PathBuf) {
    let path = PathBuf::from(edges);
    let lines = read_edge_file(&path, &config.closed_predicate).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let mut cache = TransitiveCache::with_config(
        config.direct_predicate.clone(),
        config.closed_predicate.clone(),
        config,
    )
    .unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    for (number, line) in lines {
        let applied = match &line {
            EdgeLine::Add(triple) => cache.add_relation(triple),
            EdgeLine::Remove(triple) => cache.remove_relation(triple),
        };
        if let Err(e) = applied {
            eprintln!("error: {}:{number}: {e}", path.display());
            std::process::exit(1);
        }
    }
    debug!(path = %path.display(), terms = cache.len(), "loaded edge file");
    (cache, path)
}

fn read_edge_file(path: &Path, closed: &str) -> Result<Vec<(usize, EdgeLine)>, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    parse_edges(&text, closed).map_err(|e| format!("{}:{e}", path.display()))
}

/// Parse edge-file text into numbered instructions.
///
/// Each non-blank, non-comment line is `from to` or `subject predicate
/// object`; a leading `-` turns the line into a removal. Two-column lines
/// use `closed` as their predicate. A comment starts at a field beginning
/// with `#`, so IRIs with fragments stay intact.
pub fn parse_edges(text: &str, closed: &str) -> Result<Vec<(usize, EdgeLine)>, String> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let mut fields: Vec<&str> = raw
            .split_whitespace()
            .take_while(|field| !field.starts_with('#'))
            .collect();
        let Some(first) = fields.first_mut() else {
            continue;
        };
        let remove = match first.strip_prefix('-') {
            Some(rest) => {
                *first = rest;
                true
            }
            None => false,
        };
        if first.is_empty() {
            fields.remove(0);
        }
        let triple = match fields.as_slice() {
            [from, to] => Triple::new(from.to_string(), closed.to_string(), to.to_string()),
            [subject, predicate, object] => Triple::new(
                subject.to_string(),
                predicate.to_string(),
                object.to_string(),
            ),
            _ => {
                return Err(format!(
                    "{number}: expected `from to` or `subject predicate object`, found `{raw}`"
                ));
            }
        };
        let line = if remove {
            EdgeLine::Remove(triple)
        } else {
            EdgeLine::Add(triple)
        };
        lines.push((number, line));
    }
    Ok(lines)
}
