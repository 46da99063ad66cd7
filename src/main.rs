//! # doc-corpus CLI (`corpus`)
//!
//! The `corpus` binary reads a markdown documentation tree and provides
//! listing, retrieval, linting, statistics, JSON export, and a read-only
//! HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! corpus [--config ./corpus.toml] [--root ./docs] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `corpus list` | List document paths, titles, and topic categories |
//! | `corpus get <path>` | Print one document with its snippets |
//! | `corpus lint` | Check titles, code fences, paths, and encoding |
//! | `corpus stats` | Summarize documents, categories, and snippet languages |
//! | `corpus export` | Write every parsed document as JSON |
//! | `corpus serve` | Start the read-only JSON HTTP API |
//! | `corpus completions <shell>` | Print shell completions |

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use doc_corpus::progress::ProgressMode;
use doc_corpus::store::FsStore;
use doc_corpus::{config, export, get, lint_cmd, list, logging, server, stats};

/// doc-corpus: a read-only content store and linter for markdown
/// documentation trees.
#[derive(Parser)]
#[command(name = "corpus", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// Defaults to `./corpus.toml` when that file exists; otherwise built-in
    /// defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store root directory. Overrides `[store].root`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List documents in the store.
    List {
        /// Only documents whose topic category (parent directory) matches.
        #[arg(long)]
        topic: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print a document by its store-relative path.
    ///
    /// Exits with status 1 if the path does not name a document.
    Get {
        /// Document path, e.g. `aws/compute_services/aws_batch.md`.
        path: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Run structural checks over every document.
    ///
    /// Exits non-zero when errors are found, or warnings with
    /// `lint.deny_warnings = true`.
    Lint {
        /// Progress on stderr. Defaults to `human` on a terminal, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summarize the corpus.
    Stats,

    /// Export all parsed documents as JSON.
    Export {
        /// Output file. Writes to stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Start the read-only JSON HTTP API on `[server].bind`.
    Serve,

    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Commands that don't require a store
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "corpus", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::resolve_config(cli.config.as_deref(), cli.root.as_deref())?;
    let store = FsStore::new(&cfg.store)
        .with_context(|| format!("Failed to open content store at {}", cfg.store.root.display()))?;
    let root_label = cfg.store.root.display().to_string();

    match cli.command {
        Commands::List { topic, json } => {
            list::run_list(&store, topic.as_deref(), json)?;
        }
        Commands::Get { path, json } => {
            get::run_get(&store, &path, json)?;
        }
        Commands::Lint { progress, json } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            lint_cmd::run_lint(&cfg, &store, mode, json)?;
        }
        Commands::Stats => {
            stats::run_stats(&store, &root_label)?;
        }
        Commands::Export { output } => {
            export::run_export(&store, &root_label, output.as_deref())?;
        }
        Commands::Serve => {
            server::run_server(&cfg, Arc::new(store)).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
