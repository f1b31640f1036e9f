// cmd-finder - find the command you need, collect it, ship it as a script
//
// Main entry point. Parses CLI args and dispatches to handlers.

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd_finder_lib::{
    config,
    core::{Query, Searcher, Session, StoreHealth},
    db::NewRecord,
    http,
    suggest::{spawn_controller, RemoteSource, SuggestionSource},
    Config, Database, FinderError, QUICK_SEARCHES,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cmd-finder", version)]
#[command(about = "Search a command catalog and build batch scripts from it")]
struct Cli {
    /// Config file (defaults to ~/.cmd-finder/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Search the catalog
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        /// Maximum results (defaults to the configured search limit)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Search a running server instead of the local database
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },
    /// Show the first page of the catalog
    Browse,
    /// Load records from a JSON file
    Import { file: PathBuf },
    /// Show autocomplete suggestions for partial input
    Suggest {
        #[arg(required = true)]
        text: Vec<String>,
        /// Fetch previews from a running server instead of the local database
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },
    /// Build a batch script from record ids
    Script {
        /// Script name, also used for the file name
        #[arg(short, long, default_value = "my_script")]
        name: String,
        /// Directory to write the .bat file to; prints to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
        ids: Vec<i64>,
    },
    /// Show database connectivity and size
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(db) = cli.db {
        cfg.database.path = db;
    }
    let level = if cli.debug { "debug" } else { cfg.logging.level.as_str() };
    init_logging(level);

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                cfg.server.host = host;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            handle_serve(&cfg).await
        }
        Command::Search {
            query,
            limit,
            remote,
        } => match remote {
            Some(url) => handle_remote_search(&url, &query.join(" ")).await,
            None => handle_search(&cfg, &query.join(" "), limit).await,
        },
        Command::Browse => handle_browse(&cfg).await,
        Command::Import { file } => handle_import(&cfg, &file).await,
        Command::Suggest { text, remote } => handle_suggest(&cfg, &text.join(" "), remote).await,
        Command::Script { name, out, ids } => handle_script(&cfg, &name, out, &ids).await,
        Command::Status => handle_status(&cfg).await,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn open_searcher(cfg: &Config) -> anyhow::Result<Searcher> {
    let db = Database::new(&cfg.database.path)
        .await
        .with_context(|| format!("failed to open {}", cfg.database.path.display()))?;
    Ok(Searcher::new(Arc::new(db), cfg.search.clone()))
}

async fn handle_serve(cfg: &Config) -> anyhow::Result<()> {
    let searcher = open_searcher(cfg).await?;
    info!(db = %cfg.database.path.display(), "starting cmd-finder API");
    http::serve(searcher, &cfg.server).await
}

async fn handle_search(cfg: &Config, raw: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let query = match Query::parse(raw) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return Ok(());
        }
    };

    let searcher = open_searcher(cfg).await?;
    let limit = limit.unwrap_or(cfg.search.search_limit);
    let result = match searcher.search(&query, limit).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            eprintln!("Run the search again to retry.");
            return Ok(());
        }
    };

    if result.is_empty() {
        println!("No commands found matching '{}'", query);
        return Ok(());
    }

    println!(
        "\nFound {} command(s) matching '{}' in {:.2}s:",
        result.count,
        query,
        result.search_time.as_secs_f64()
    );
    println!("{}", "=".repeat(60));
    for record in &result.records {
        print_record(record);
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_record(record: &cmd_finder_lib::db::Record) {
    println!("\n[{}] {}", record.id, record.command);
    println!("    {}", record.description);
    if !record.syntax.is_empty() {
        println!("    $ {}", record.syntax);
    }
    // Two examples are enough for a listing
    for example in record.examples.iter().take(2) {
        match &example.note {
            Some(note) => println!("      {}  # {}", example.snippet, note),
            None => println!("      {}", example.snippet),
        }
    }
    let tags: Vec<&str> = [record.category.as_deref(), record.difficulty.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !tags.is_empty() {
        println!("    ({})", tags.join(", "));
    }
}

async fn handle_browse(cfg: &Config) -> anyhow::Result<()> {
    let searcher = open_searcher(cfg).await?;
    let page = searcher.browse().await?;

    if page.records.is_empty() {
        println!("Catalog is empty. Load one with: cmd-finder import <file.json>");
        return Ok(());
    }

    println!("\nShowing {} of {} commands:", page.records.len(), page.total);
    println!("{}", "=".repeat(60));
    for record in &page.records {
        println!("{:4}. {:<16} {}", record.id, record.command, record.description);
    }
    println!("{}", "=".repeat(60));

    println!("\nQuick searches:");
    for (query, label) in QUICK_SEARCHES {
        println!("  cmd-finder search {:<10} {}", query, label);
    }

    Ok(())
}

async fn handle_import(cfg: &Config, file: &PathBuf) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let records: Vec<NewRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let db = Database::new(&cfg.database.path).await?;
    let ids = db.import_records(records).await?;

    println!("Imported {} command(s).", ids.len());
    Ok(())
}

async fn handle_remote_search(url: &str, raw: &str) -> anyhow::Result<()> {
    let query = match Query::parse(raw) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return Ok(());
        }
    };

    let source = RemoteSource::new(url)?;
    let response = match source.search(query.as_str()).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return Ok(());
        }
    };

    if response.records.is_empty() {
        println!("No commands found matching '{}'", query);
        return Ok(());
    }

    println!(
        "\nFound {} command(s) matching '{}' on {} in {:.2}s:",
        response.count,
        query,
        url,
        response.search_time_seconds
    );
    println!("{}", "=".repeat(60));
    for record in &response.records {
        print_record(record);
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_suggest(cfg: &Config, text: &str, remote: Option<String>) -> anyhow::Result<()> {
    let source: Arc<dyn SuggestionSource> = match remote {
        Some(url) => Arc::new(RemoteSource::new(&url)?),
        None => Arc::new(open_searcher(cfg).await?),
    };
    let handle = spawn_controller(source, &cfg.search);

    // Previews have no timeout of their own; the CLI gives up eventually
    let wait = cfg.search.debounce() + Duration::from_secs(5);
    match tokio::time::timeout(wait, handle.settle(text)).await {
        Ok(Some(view)) if view.visible => {
            for (i, label) in view.suggestions.iter().enumerate() {
                println!("{:2}. {}", i + 1, label);
            }
        }
        _ => println!("No suggestions for '{}'", text.trim()),
    }

    handle.shutdown().await;
    Ok(())
}

async fn handle_script(
    cfg: &Config,
    name: &str,
    out: Option<PathBuf>,
    ids: &[i64],
) -> anyhow::Result<()> {
    let searcher = open_searcher(cfg).await?;
    let mut session = Session::start();
    session.rename(name);

    for &id in ids {
        match searcher.get(id).await? {
            Some(record) => {
                if !session.add(record) {
                    eprintln!("Command {} is already in the script, skipping", id);
                }
            }
            None => eprintln!("Error: {}", FinderError::RecordNotFound(id).user_message()),
        }
    }

    let artifact = match session.export() {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return Ok(());
        }
    };

    match out {
        Some(dir) => {
            let path = artifact.write_to(&dir)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", artifact.contents),
    }

    let summary = session.end();
    debug!(commands = summary.commands_collected, "script session finished");
    Ok(())
}

async fn handle_status(cfg: &Config) -> anyhow::Result<()> {
    let db = Database::new(&cfg.database.path).await?;
    let searcher = Searcher::new(Arc::new(db.clone()), cfg.search.clone());

    println!("\ncmd-finder Status");
    println!("{}", "=".repeat(60));
    println!("  Database:  {}", db.path().display());

    match searcher.health().await {
        StoreHealth::Connected => {
            let stats = db.stats().await?;
            println!("  Store:     connected");
            println!("  Commands:  {}", stats.total_records);
        }
        StoreHealth::Disconnected(reason) => {
            println!("  Store:     disconnected");
            println!("  {}", FinderError::StoreUnavailable(reason).user_message());
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}
