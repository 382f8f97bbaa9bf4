use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "closure",
    about = "Closure: incremental transitive-closure queries over edge files",
    version
)]
pub struct Cli {
    /// Log level written to stderr: trace, debug, info, warn, or error
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a pattern against the direct or closed view
    Find {
        /// Path to the edge file
        edges: String,

        /// Subject term (omit for wildcard)
        #[arg(long)]
        subject: Option<String>,

        /// Object term (omit for wildcard)
        #[arg(long)]
        object: Option<String>,

        /// View to query: direct or closed
        #[arg(long, default_value = "closed")]
        view: String,

        /// Cache configuration TOML
        #[arg(long)]
        config: Option<String>,

        /// Memoize closed-view results regardless of configuration
        #[arg(long)]
        caching: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize the relation: counts and a digest of the direct view
    Stats {
        /// Path to the edge file
        edges: String,

        /// Cache configuration TOML
        #[arg(long)]
        config: Option<String>,

        /// Also print one line per term with its class and direct successors
        #[arg(long)]
        dump: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify reflexivity, soundness, and acyclicity of the loaded cache
    Check {
        /// Path to the edge file
        edges: String,

        /// Cache configuration TOML
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
