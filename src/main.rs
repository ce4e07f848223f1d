use repofusion::cli::{Cli, Commands, ConfigAction};
use repofusion::clients::{ElasticHttpClient, GeminiClient, HttpEmbeddingProvider, QdrantHttpClient};
use repofusion::config::Config;
use repofusion::error::{RepoFusionError, Result};
use repofusion::intent::LlmQueryUnderstanding;
use repofusion::model::RepoDoc;
use repofusion::retrieval::HybridSearcher;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = load_config(cli.config.clone())?;

    match cli.command {
        Commands::Search {
            query,
            limit,
            collection,
            json,
        } => {
            let searcher = build_searcher(&config)?;
            let collection = collection.unwrap_or_else(|| config.vector.collection.clone());
            let outcome = searcher.search(&query, limit, &collection).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome).map_err(anyhow::Error::from)?);
            } else {
                print_results(&outcome.results);
                let topics = repofusion::intent::suggested_topics(&outcome.intent.filters);
                if !topics.is_empty() {
                    println!("\nRelated topics: {}", topics.join(", "));
                }
            }
        }
        Commands::Tag {
            tag,
            limit,
            collection,
            json,
        } => {
            let searcher = build_searcher(&config)?;
            let collection = collection.unwrap_or_else(|| config.vector.collection.clone());
            let results = searcher.tag_search(&tag, limit, &collection).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results).map_err(anyhow::Error::from)?);
            } else {
                print_results(&results);
            }
        }
        Commands::Suggest { query } => {
            let searcher = build_searcher(&config)?;
            match searcher.filter_suggestions(&query).await {
                Ok(chips) if !chips.is_empty() => {
                    for chip in chips {
                        println!("{}", chip);
                    }
                }
                Ok(_) => println!("(no suggestions)"),
                Err(e) => {
                    tracing::warn!("filter suggestion failed: {}", e);
                    println!("(no suggestions)");
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let path = config_path(cli.config)?;
                Config::default().save(&path)?;
                println!("Wrote default configuration to {}", path.display());
            }
            ConfigAction::Show => {
                let rendered = toml::to_string_pretty(&config)?;
                print!("{}", rendered);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn config_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path),
        None => Config::default_path(),
    }
}

fn load_config(cli_path: Option<PathBuf>) -> Result<Config> {
    match cli_path {
        Some(path) => Config::load(&path),
        None => {
            let path = Config::default_path()?;
            if path.exists() {
                Config::load(&path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn build_searcher(config: &Config) -> Result<HybridSearcher> {
    let http = reqwest::Client::new();

    let gemini = GeminiClient::from_env(http.clone(), &config.llm.api_key_env, config.llm.model.clone())?;
    let understanding = Arc::new(LlmQueryUnderstanding::new(Arc::new(gemini)));

    let embedding = Arc::new(HttpEmbeddingProvider::new(
        http.clone(),
        config.embedding.endpoint.clone(),
        config.embedding.dimension,
    ));

    let vector_api_key = std::env::var(&config.vector.api_key_env).ok();
    let vector_index = Arc::new(QdrantHttpClient::new(
        http.clone(),
        config.vector.url.clone(),
        vector_api_key,
    ));

    let lexical_index = Arc::new(ElasticHttpClient::new(http, config.lexical.url.clone()));

    let searcher = HybridSearcher::new(
        understanding,
        embedding,
        vector_index,
        lexical_index,
        config.search.clone(),
    )
    .map_err(RepoFusionError::Search)?;

    Ok(searcher)
}

fn print_results(results: &[RepoDoc]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for (i, doc) in results.iter().enumerate() {
        println!("{}. {} (score {:.4})", i + 1, doc.title, doc.score);
        if !doc.description.is_empty() {
            println!("   {}", doc.description);
        }
        println!(
            "   ⭐ {}  📅 {}  {}",
            doc.metadata.stars,
            if doc.created_date().is_empty() {
                "unknown"
            } else {
                doc.created_date()
            },
            doc.metadata.url
        );
        if !doc.tags.is_empty() {
            println!("   tags: {}", doc.tags.join(", "));
        }
    }
}
