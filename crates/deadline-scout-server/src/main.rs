//! Deadline Scout: entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use deadline_scout_server::cli::{enrich_cmd, output, results_cmd, search_cmd, serve};
use deadline_scout_server::config::resolve_store_path;
use deadline_scout_server::{ScoutConfig, SearchQuery};

#[derive(Parser)]
#[command(
    name = "deadline-scout",
    about = "Find calls for submissions and their closing dates",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Maximum number of pages fetched at once.
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Per-page fetch timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Report each expiry date once per page.
    #[arg(long, global = true)]
    dedup_dates: bool,

    /// Result store path, or `off` to disable persistence.
    #[arg(long, global = true)]
    store: Option<String>,

    /// Print a readable listing instead of pretty JSON.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API (default).
    Serve {
        /// Listen port (overrides PORT).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Search the web and enrich every hit.
    Search {
        /// Free-text part of the query.
        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        keyword1: Option<String>,

        #[arg(long)]
        keyword2: Option<String>,

        /// Word to exclude from results.
        #[arg(long)]
        exclude: Option<String>,

        /// Append the results to the result store.
        #[arg(long)]
        save: bool,
    },

    /// Enrich explicit URLs without searching.
    Enrich {
        /// Page URLs; each URL doubles as its title.
        urls: Vec<String>,

        /// JSON file with an array of {title, url} objects.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Append the results to the result store.
        #[arg(long)]
        save: bool,
    },

    /// Show the most recently stored results.
    Results {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   deadline-scout completions bash > ~/.local/share/bash-completion/completions/deadline-scout
    ///   deadline-scout completions zsh > ~/.zfunc/_deadline-scout
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

impl Cli {
    /// Layer command-line overrides on top of the environment configuration.
    fn apply_overrides(&self, config: &mut ScoutConfig) {
        if let Some(n) = self.concurrency {
            config.concurrency = n.max(1);
        }
        if let Some(ms) = self.timeout_ms {
            config.fetch_timeout_ms = ms;
        }
        if self.dedup_dates {
            config.dedup_dates = true;
        }
        if let Some(store) = &self.store {
            config.store_path = resolve_store_path(Some(store));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    output::set_plain(cli.plain);

    let mut config = ScoutConfig::from_env()?;
    cli.apply_overrides(&mut config);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve::run(&config).await?;
        }

        Commands::Search {
            text,
            keyword1,
            keyword2,
            exclude,
            save,
        } => {
            let query = SearchQuery {
                text_box_query: text,
                keyword1,
                keyword2,
                exclude_word: exclude,
            };
            search_cmd::run(&config, query, save).await?;
        }

        Commands::Enrich { urls, file, save } => {
            enrich_cmd::run(&config, &urls, file.as_deref(), save).await?;
        }

        Commands::Results { limit } => {
            results_cmd::run(&config, limit)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "deadline-scout", &mut std::io::stdout());
        }
    }

    Ok(())
}
