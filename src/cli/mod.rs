//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "repofusion",
    version,
    about = "Hybrid repository search blending semantic and lexical retrieval",
    long_about = "repofusion answers free-text queries about code repositories by combining \
                  nearest-neighbor vector search with full-text and tag search, fusing both \
                  channels into one ranked list with a popularity/recency adjustment."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/repofusion/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a hybrid search for repositories
    Search {
        /// Free-text query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Collection/index to search (defaults to the configured one)
        #[arg(long)]
        collection: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up repositories carrying an exact tag, ranked by trend
    Tag {
        /// Tag to match
        tag: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Collection/index to search (defaults to the configured one)
        #[arg(long)]
        collection: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest refinement filter chips for a broad query
    Suggest {
        /// Free-text query
        query: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init,

    /// Print the active configuration
    Show,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
