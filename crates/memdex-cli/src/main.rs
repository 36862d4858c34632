//! Memdex CLI - Memory index inspection and querying
//!
//! Talks to the Elasticsearch cluster directly through `memdex-elasticsearch`.

mod config;
mod embedding;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use futures::TryStreamExt;
use memdex::{EmbeddingGenerator, MemoryDb, MemoryFilter, MemoryRecord};
use memdex_elasticsearch::ElasticsearchMemory;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, Overrides};
use embedding::OpenAiEmbedding;

#[derive(Parser)]
#[command(name = "memdex")]
#[command(about = "Memdex CLI - Memory index inspection and querying", long_about = None)]
#[command(version)]
struct Cli {
    /// Elasticsearch base URL
    #[arg(long, env = "MEMDEX_ES_URL", global = true)]
    es_url: Option<String>,
    #[arg(long, env = "MEMDEX_ES_USERNAME", global = true)]
    es_username: Option<String>,
    #[arg(long, env = "MEMDEX_ES_PASSWORD", global = true, hide_env_values = true)]
    es_password: Option<String>,
    /// Prefix prepended to every index name
    #[arg(long, env = "MEMDEX_INDEX_PREFIX", global = true)]
    index_prefix: Option<String>,
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    openai_api_key: Option<String>,
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage indices
    Indexes {
        #[command(subcommand)]
        action: IndexAction,
    },

    /// List records, optionally filtered by tags
    List {
        index: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Max results (0 means the default of 10)
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Include embedding vectors
        #[arg(long)]
        with_vector: bool,
    },

    /// Full-text search over indexable payload properties
    Search {
        index: String,
        text: String,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Similarity search using an embedding of the text
    Similar {
        index: String,
        text: String,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Embed a text and store it as a record
    Add {
        index: String,
        text: String,
        /// Record id (random when omitted)
        #[arg(long)]
        id: Option<String>,
        /// Tag the record with a document id
        #[arg(long)]
        document_id: Option<String>,
        #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },

    /// Show one record
    Get {
        index: String,
        id: String,
        #[arg(long)]
        with_vector: bool,
    },

    /// Delete one record
    Delete { index: String, id: String },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum IndexAction {
    /// List indices owned by the configured prefix
    List,
    /// Create an index for vectors of the given dimension
    Create { name: String, dimension: usize },
    /// Delete an index
    Delete { name: String },
    /// Delete every physical index starting with a prefix
    Purge {
        prefix: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the index mapping
    Mapping { name: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the Elasticsearch base URL
    SetUrl { url: String },
    /// Set the index prefix
    SetPrefix { prefix: String },
}

/// Tag constraints shared by the query commands
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Required tag (repeatable)
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    tags: Vec<(String, String)>,
    /// Excluded tag (repeatable)
    #[arg(long = "not-tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    not_tags: Vec<(String, String)>,
    /// Match any `--tag` instead of all of them
    #[arg(long)]
    any: bool,
}

impl FilterArgs {
    fn filters(&self) -> Vec<MemoryFilter> {
        let with_exclusions = |mut filter: MemoryFilter| {
            for (key, value) in &self.not_tags {
                filter = filter.by_not_tag(key, value);
            }
            filter
        };

        if self.any && !self.tags.is_empty() {
            return self
                .tags
                .iter()
                .map(|(key, value)| with_exclusions(MemoryFilter::new().by_tag(key, value)))
                .collect();
        }

        let filter = self
            .tags
            .iter()
            .fold(MemoryFilter::new(), |f, (key, value)| f.by_tag(key, value));
        let filter = with_exclusions(filter);
        if filter.is_empty() {
            Vec::new()
        } else {
            vec![filter]
        }
    }
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty tag key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = Overrides {
        es_url: cli.es_url,
        es_username: cli.es_username,
        es_password: cli.es_password,
        index_prefix: cli.index_prefix,
        openai_api_key: cli.openai_api_key,
    };

    match cli.command {
        Commands::Config { action } => cmd_config(action, overrides),
        Commands::Indexes { action } => {
            let (_, memory) = connect(overrides)?;
            cmd_indexes(&memory, action).await
        }
        Commands::List { index, filter, limit, with_vector } => {
            let (_, memory) = connect(overrides)?;
            cmd_list(&memory, &index, &filter.filters(), limit, with_vector).await
        }
        Commands::Search { index, text, filter, limit } => {
            let (_, memory) = connect(overrides)?;
            cmd_search(&memory, &index, &text, &filter.filters(), limit).await
        }
        Commands::Similar { index, text, filter, limit } => {
            let (_, memory) = connect(overrides)?;
            cmd_similar(&memory, &index, &text, &filter.filters(), limit).await
        }
        Commands::Add { index, text, id, document_id, tags } => {
            let (config, memory) = connect(overrides)?;
            cmd_add(&memory, &config, &index, &text, id, document_id, tags).await
        }
        Commands::Get { index, id, with_vector } => {
            let (_, memory) = connect(overrides)?;
            cmd_get(&memory, &index, &id, with_vector).await
        }
        Commands::Delete { index, id } => {
            let (_, memory) = connect(overrides)?;
            memory.delete(&index, &MemoryRecord::new(id.clone())).await?;
            println!("{} Deleted {} from {}", "✓".green(), id, index.cyan());
            Ok(())
        }
    }
}

fn embedding_for(config: &Config) -> OpenAiEmbedding {
    OpenAiEmbedding::new(config.openai_api_key.clone(), config.embedding_model.clone())
}

/// Load configuration and open the memory store it points at
fn connect(overrides: Overrides) -> Result<(Config, ElasticsearchMemory)> {
    let config = Config::load()?.apply(overrides);
    let memory = ElasticsearchMemory::new(config.elasticsearch.clone(), Arc::new(embedding_for(&config)))
        .context("Failed to set up the Elasticsearch client")?;
    Ok((config, memory))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_indexes(memory: &ElasticsearchMemory, action: IndexAction) -> Result<()> {
    match action {
        IndexAction::List => {
            let indexes = memory.list_indexes().await?;
            if indexes.is_empty() {
                println!("No indices found.");
                return Ok(());
            }
            println!("{}", "Indices:".bold());
            for name in indexes {
                println!("  {}", name.cyan());
            }
        }

        IndexAction::Create { name, dimension } => {
            memory.create_index(&name, dimension).await?;
            println!(
                "{} Index '{}' ready ({} dimensions)",
                "✓".green(),
                memory.real_index_name(&name)?,
                dimension
            );
        }

        IndexAction::Delete { name } => {
            memory.delete_index(&name).await?;
            println!("{} Index '{}' deleted", "✓".green(), memory.real_index_name(&name)?);
        }

        IndexAction::Purge { prefix, yes } => {
            if prefix.trim().is_empty() {
                bail!("Refusing to purge with an empty prefix");
            }
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete every index starting with '{prefix}'?"))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            let count = memory.index_manager().purge_indices_with_prefix(&prefix).await?;
            println!("{} Purged {} indices", "✓".green(), count);
        }

        IndexAction::Mapping { name } => {
            let real_name = memory.real_index_name(&name)?;
            let mapping = memory
                .index_manager()
                .get_index_mapping(&real_name)
                .await
                .with_context(|| format!("No mapping available for '{real_name}'"))?;
            println!("{}", serde_json::to_string_pretty(&mapping)?);
        }
    }

    Ok(())
}

async fn cmd_list(
    memory: &ElasticsearchMemory,
    index: &str,
    filters: &[MemoryFilter],
    limit: usize,
    with_vector: bool,
) -> Result<()> {
    let mut records = memory.get_list(index, filters, limit, with_vector);
    let mut count = 0;
    while let Some(record) = records.try_next().await? {
        print_record(&record, None);
        count += 1;
    }
    if count == 0 {
        println!("No records found in '{}'", index);
    }
    Ok(())
}

async fn cmd_search(
    memory: &ElasticsearchMemory,
    index: &str,
    text: &str,
    filters: &[MemoryFilter],
    limit: usize,
) -> Result<()> {
    if memory.config().indexable_payload_properties.is_empty() {
        eprintln!(
            "{}",
            "No indexable payload properties configured; keyword search returns nothing.".yellow()
        );
    }

    let records: Vec<MemoryRecord> = memory
        .search_keyword(index, text, filters, limit, false)
        .try_collect()
        .await?;

    if records.is_empty() {
        println!("No records found for '{}'", text);
        return Ok(());
    }
    println!("{} results for '{}':", records.len().to_string().green(), text);
    for record in &records {
        print_record(record, None);
    }
    Ok(())
}

async fn cmd_similar(
    memory: &ElasticsearchMemory,
    index: &str,
    text: &str,
    filters: &[MemoryFilter],
    limit: usize,
) -> Result<()> {
    let results: Vec<(MemoryRecord, f64)> = memory
        .get_similar_list(index, text, filters, limit, false)
        .try_collect()
        .await?;

    if results.is_empty() {
        println!("No similar records for '{}'", text);
        return Ok(());
    }
    for (record, score) in &results {
        print_record(record, Some(*score));
    }
    Ok(())
}

async fn cmd_add(
    memory: &ElasticsearchMemory,
    config: &Config,
    index: &str,
    text: &str,
    id: Option<String>,
    document_id: Option<String>,
    tags: Vec<(String, String)>,
) -> Result<()> {
    let vector = embedding_for(config).generate_embedding(text).await?;

    let mut record = match id {
        Some(id) => MemoryRecord::new(id),
        None => MemoryRecord::with_random_id(),
    }
    .with_vector(vector)
    .with_payload("text", text);
    for (key, value) in tags {
        record = record.with_tag(key, value);
    }
    if let Some(document_id) = document_id {
        record = record.with_document_id(document_id);
    }

    let id = memory.upsert(index, &record).await?;
    println!("{} Stored {} in {}", "✓".green(), id.cyan(), index);
    println!("  {}", truncate_string(text, 80).dimmed());
    Ok(())
}

async fn cmd_get(memory: &ElasticsearchMemory, index: &str, id: &str, with_vector: bool) -> Result<()> {
    let record = memory
        .get(index, id, with_vector)
        .await?
        .with_context(|| format!("Record '{id}' not found in '{index}'"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn print_record(record: &MemoryRecord, score: Option<f64>) {
    let score = score
        .map(|s| format!("[{s:.3}] ").green().to_string())
        .unwrap_or_default();
    let tags = record
        .tags
        .iter()
        .map(|(key, values)| format!("{key}={}", values.join(",")))
        .collect::<Vec<_>>()
        .join(" ");
    println!("  {}{} {}", score, record.id.cyan(), tags.dimmed());

    if let Some(text) = record.payload.get("text").and_then(|v| v.as_str()) {
        println!("    {}", truncate_string(text, 80));
    }
    if !record.vector.is_empty() {
        println!("    {}", format!("vector[{}]", record.vector.len()).dimmed());
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn cmd_config(action: ConfigAction, overrides: Overrides) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?.apply(overrides);
            let es = &config.elasticsearch;

            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Server: {}", es.server_address);
            println!(
                "  Credentials: {}",
                if es.username.is_some() { "Set".green() } else { "Not set".dimmed() }
            );
            let prefix = if es.index_prefix.is_empty() { "(none)" } else { es.index_prefix.as_str() };
            println!("  Index Prefix: {}", prefix.cyan());
            println!("  Shards / Replicas: {} / {}", es.shard_count, es.replica_count);
            println!(
                "  Indexable Properties: {}",
                if es.indexable_payload_properties.is_empty() {
                    "(none)".to_string()
                } else {
                    es.indexable_payload_properties.join(", ")
                }
            );
            println!(
                "  OpenAI Key: {}",
                if config.openai_api_key.is_some() { "Set".green() } else { "Not set".red() }
            );
            println!("  Embedding Model: {}", config.embedding_model);
        }

        ConfigAction::SetUrl { url } => {
            let mut config = Config::load()?;
            config.elasticsearch.server_address = url.clone();
            config.save()?;
            println!("{} Server set to {}", "✓".green(), url);
        }

        ConfigAction::SetPrefix { prefix } => {
            let mut config = Config::load()?;
            config.elasticsearch.index_prefix = prefix.clone();
            config.save()?;
            println!("{} Index prefix set to '{}'", "✓".green(), prefix);
        }
    }

    Ok(())
}
