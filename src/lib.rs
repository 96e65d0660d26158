pub mod api;
pub mod config;
pub mod model;
pub mod recent;
pub mod search;
pub mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use api::Catalog;
use api::client::HttpCatalog;
use config::ClientConfig;
use recent::{RecentSearches, recent_path_for};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "medi",
    version,
    about = "Incremental medicine search over the catalog API"
)]
pub struct Cli {
    /// Catalog API base URL (overrides MEDI_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Override data dir (recent searches, logs)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive search bar
    Tui {
        /// Render once and exit (headless-friendly)
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Exit on the first opened drug and print its signature to stdout
        #[arg(long, default_value_t = false)]
        print: bool,
    },
    /// One-shot lookup, printed as text or JSON
    Search {
        query: String,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve a brand name to its signature
    Resolve {
        name: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List (or clear) recent searches
    Recent {
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let mut config = ClientConfig::from_env();
    if let Some(base) = &cli.api_base {
        config = config.with_api_base(base.clone());
    }

    match cli.command {
        Commands::Tui { once, print } => {
            // Keep logs off the alternate screen.
            let _guard = init_file_logging(&data_dir)?;
            let opts = ui::tui::TuiOptions {
                config,
                data_dir,
                once,
                exit_on_open: print,
            };
            let opened = tokio::task::block_in_place(|| ui::tui::run_tui(opts))?;
            if print && let Some(sig) = opened {
                println!("{sig}");
            }
            Ok(())
        }
        Commands::Search { query, limit, json } => {
            init_stderr_logging();
            let limit = limit.unwrap_or(config.search_limit);
            let catalog = HttpCatalog::new(config)?;
            let hits = catalog.lookup(&query, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else if hits.is_empty() {
                println!("No results found");
            } else {
                for hit in &hits {
                    println!("{}", ui::data::candidate_text(hit));
                }
            }
            Ok(())
        }
        Commands::Resolve { name, json } => {
            init_stderr_logging();
            let catalog = HttpCatalog::new(config)?;
            let resolved = catalog.resolve_signature(&name).await?;
            let signature = resolved
                .as_ref()
                .and_then(|c| c.usable_signature())
                .with_context(|| format!("no signature found for {name:?}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{signature}");
            }
            Ok(())
        }
        Commands::Recent { clear } => {
            init_stderr_logging();
            let mut recent = RecentSearches::load(recent_path_for(&data_dir));
            if clear {
                recent.clear();
                recent.save()?;
                println!("Cleared recent searches");
            } else if recent.is_empty() {
                println!("No recent searches");
            } else {
                for entry in recent.entries() {
                    println!("{entry}");
                }
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "medi", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("medi_search=warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_file_logging(
    data_dir: &std::path::Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(&log_dir, "medi.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("medi_search=info"))
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    Ok(guard)
}

pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = dotenvy::var("MEDI_DATA_DIR") {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("com", "medibot", "medi-search")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".medi-search"))
}
