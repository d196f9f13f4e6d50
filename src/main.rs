//! # pdfchat CLI (`pdfc`)
//!
//! The `pdfc` binary is the primary interface for pdfchat. It provides
//! commands for database initialization, document registration, one-shot
//! questions, and starting the HTTP API server.
//!
//! ## Usage
//!
//! ```bash
//! pdfc --config ./config/pdfchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pdfc init` | Create the SQLite database and schema |
//! | `pdfc add <file>` | Store a local PDF and register it |
//! | `pdfc list` | List registered documents |
//! | `pdfc ask <id> "<question>"` | Answer one question about a document |
//! | `pdfc serve` | Start the HTTP API server |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use pdfchat::config::{load_config, Config};
use pdfchat::provider::OpenAiProvider;
use pdfchat::query::QueryPipeline;
use pdfchat::storage::ObjectStorage;
use pdfchat::{db, server, storage, store};

/// pdfchat — ask questions about stored PDF documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/pdfchat.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "pdfc",
    about = "pdfchat — ask natural-language questions about stored PDF documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/pdfchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `pdfs` and
    /// `chat_messages` tables. Idempotent — running it again is safe.
    Init,

    /// Store a local PDF file and register it as a document.
    Add {
        /// Path to the PDF file.
        file: PathBuf,

        /// Display name for the document. Defaults to the file name.
        #[arg(long)]
        name: Option<String>,
    },

    /// List registered documents, newest first.
    List,

    /// Answer one question about a registered document.
    ///
    /// Runs the full query pipeline (fetch, extract, chunk, rank,
    /// assemble, generate) and prints the answer. Unlike the HTTP API,
    /// nothing is written to the chat history.
    Ask {
        /// Document id (as printed by `add` or `list`).
        id: String,

        /// The question to ask.
        question: String,
    },

    /// Start the HTTP API server.
    ///
    /// Serves `POST /query`, `GET /documents`,
    /// `GET /documents/{id}/messages`, and `GET /health` with permissive
    /// CORS, on the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pdfchat=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => run_init(&config).await,
        Commands::Add { file, name } => run_add(&config, &file, name).await,
        Commands::List => run_list(&config).await,
        Commands::Ask { id, question } => run_ask(&config, &id, &question).await,
        Commands::Serve => server::run_server(&config).await,
    }
}

async fn run_init(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::run_migrations(&pool).await?;
    pool.close().await;
    println!("Database initialized at {}", config.db.path.display());
    Ok(())
}

async fn run_add(config: &Config, file: &PathBuf, name: Option<String>) -> Result<()> {
    let bytes = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    if !bytes.starts_with(b"%PDF") {
        anyhow::bail!("{} does not look like a PDF file", file.display());
    }

    let name = name.unwrap_or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled.pdf".to_string())
    });

    let storage = storage::create_storage(&config.storage)?;
    let key = format!("{}.pdf", uuid::Uuid::new_v4());
    storage.put(&key, &bytes).await?;

    let pool = db::connect(config).await?;
    let doc = store::insert_pdf(&pool, &name, &key).await?;
    pool.close().await;

    println!("Added {} ({} bytes)", doc.name, bytes.len());
    println!("  id: {}", doc.id);
    Ok(())
}

async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let docs = store::list_pdfs(&pool).await?;
    pool.close().await;

    if docs.is_empty() {
        println!("No documents. Add one with: pdfc add <file>");
        return Ok(());
    }

    for doc in docs {
        let created = chrono::DateTime::from_timestamp(doc.created_at, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}  {}  {}", doc.id, created, doc.name);
    }
    Ok(())
}

async fn run_ask(config: &Config, id: &str, question: &str) -> Result<()> {
    let storage = storage::create_storage(&config.storage)?;
    let provider = Arc::new(OpenAiProvider::new(&config.provider)?);
    let pipeline = QueryPipeline::new(config, storage, provider);

    let pool = db::connect(config).await?;
    let answer = pipeline.answer(&pool, id, question).await?;
    pool.close().await;

    println!("{}", answer);
    Ok(())
}
