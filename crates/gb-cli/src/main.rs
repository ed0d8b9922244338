//! CLI entry point for ghboard.
//!
//! Hydrates every store from one dashboard query, then lists, searches or
//! mutates entities through the same services a UI would use.
//!
//! # Usage
//!
//! ```bash
//! ghboard [OPTIONS] <COMMAND>
//!
//! # Entity counts after startup
//! GITHUB_TOKEN=... ghboard summary
//!
//! # Open issues mentioning "crash", newest first, as JSON
//! ghboard --json issues --query crash --filter state=OPEN --sort updated_at --desc
//!
//! # Close an issue
//! ghboard close-issue I_kwDOAbc123
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod output;

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use gb_api::HttpExecutor;
use gb_core::{Config, EntityId, Issue, Searchable, SortDirection};
use gb_store::{AppContext, EntityStore, SearchCriteria, StoreError};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::{Row, write_table};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Terminal dashboard for GitHub Projects v2.
///
/// Loads projects, repositories, issues, labels, users and collaborators in
/// one GraphQL round trip and works on the in-memory copy.
#[derive(Parser)]
#[command(name = "ghboard", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, env = "GHBOARD_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// GitHub token (overrides the configuration file).
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GraphQL endpoint (overrides the configuration file).
    #[arg(long, global = true, env = "GHBOARD_ENDPOINT")]
    endpoint: Option<String>,

    /// How many times to retry a failed startup.
    #[arg(long, global = true, default_value_t = 1)]
    retries: u32,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show how many entities of each kind were loaded.
    Summary,

    /// List Projects v2 boards.
    Projects(ListArgs),

    /// List repositories.
    Repos(ListArgs),

    /// List issues.
    Issues(ListArgs),

    /// List labels.
    Labels(ListArgs),

    /// List users.
    Users(ListArgs),

    /// List collaborators.
    Collaborators {
        /// Only collaborators of this repository id, highest permission first.
        #[arg(long)]
        repository: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Close an issue.
    CloseIssue {
        /// Issue node id.
        id: String,
    },

    /// Reopen a closed issue.
    ReopenIssue {
        /// Issue node id.
        id: String,
    },
}

/// Search, sort, filter and page options shared by list commands.
#[derive(Args, Clone)]
struct ListArgs {
    /// Case-insensitive free-text query.
    #[arg(short, long, default_value = "")]
    query: String,

    /// Field to sort by (entity specific, e.g. `title`, `updated_at`).
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Filter as `key=value`; the value is parsed as JSON when possible.
    #[arg(short, long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, Value)>,

    /// Page number, starting at 1.
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Items per page (defaults to the configured page size).
    #[arg(long)]
    page_size: Option<usize>,
}

/// Parses `key=value`, reading `value` as JSON and falling back to a string.
fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing filter key in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `info` by default, with the HTTP stack held at `warn`.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},hyper=warn,hyper_util=warn,reqwest=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result is invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(token) = &cli.token {
        config.api.token = Some(token.clone());
    }
    if let Some(endpoint) = &cli.endpoint {
        config.api.endpoint.clone_from(endpoint);
    }

    config.validate()?;
    Ok(config)
}

/// Runs startup, retrying retryable failures up to `retries` times.
async fn initialize_with_retries(
    ctx: &AppContext<HttpExecutor>,
    retries: u32,
) -> color_eyre::Result<()> {
    let initializer = ctx.initializer();
    let mut result = initializer.initialize().await;
    let mut attempt = 0;

    while let Err(err) = &result {
        if attempt >= retries || !err.is_retryable() {
            break;
        }
        attempt += 1;
        warn!(attempt, error = %err, "startup failed, retrying");
        result = initializer.retry().await;
    }

    result.map_err(|err: StoreError| color_eyre::eyre::eyre!("startup failed: {err}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Entity counts after hydration.
#[derive(Serialize)]
struct DashboardCounts {
    projects: usize,
    repositories: usize,
    issues: usize,
    labels: usize,
    users: usize,
    collaborators: usize,
    viewer: Option<String>,
}

fn cmd_summary(ctx: &AppContext<HttpExecutor>, json: bool) -> color_eyre::Result<()> {
    let stores = ctx.stores();
    let counts = DashboardCounts {
        projects: stores.projects.len(),
        repositories: stores.repositories.len(),
        issues: stores.issues.len(),
        labels: stores.labels.len(),
        users: stores.users.len(),
        collaborators: stores.collaborators.len(),
        viewer: ctx.users().viewer().map(|user| user.login),
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &counts)?;
        let _ = writeln!(stdout);
        return Ok(());
    }

    let _ = writeln!(stdout, "Viewer:         {}", counts.viewer.as_deref().unwrap_or("-"));
    let _ = writeln!(stdout, "Projects:       {}", counts.projects);
    let _ = writeln!(stdout, "Repositories:   {}", counts.repositories);
    let _ = writeln!(stdout, "Issues:         {}", counts.issues);
    let _ = writeln!(stdout, "Labels:         {}", counts.labels);
    let _ = writeln!(stdout, "Users:          {}", counts.users);
    let _ = writeln!(stdout, "Collaborators:  {}", counts.collaborators);
    Ok(())
}

/// One page of search results.
#[derive(Serialize)]
struct Page<T> {
    page: usize,
    total_pages: usize,
    total_results: usize,
    items: Vec<T>,
}

fn criteria_from(args: &ListArgs, default_page_size: usize) -> SearchCriteria {
    let mut criteria = SearchCriteria::with_page_size(args.page_size.unwrap_or(default_page_size))
        .with_query(args.query.clone());
    if let Some(field) = &args.sort {
        let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
        criteria = criteria.with_sort(field.clone(), direction);
    }
    for (key, value) in &args.filters {
        criteria = criteria.with_filter(key.clone(), value.clone());
    }
    let page_size = criteria.page_size();
    criteria.with_page(args.page, page_size)
}

fn cmd_list<T>(
    store: &EntityStore<T>,
    args: &ListArgs,
    default_page_size: usize,
    json: bool,
) -> color_eyre::Result<()>
where
    T: Searchable + Row + Serialize,
{
    store.search_with(criteria_from(args, default_page_size));
    let page = Page {
        page: store.criteria().page(),
        total_pages: store.total_pages(),
        total_results: store.total_results(),
        items: store.paginated_results(),
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &page)?;
        let _ = writeln!(stdout);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = page.items.iter().map(Row::cells).collect();
    write_table(&mut stdout, T::HEADERS, &rows)?;
    let _ = writeln!(
        stdout,
        "\npage {}/{} ({} results)",
        page.page,
        page.total_pages.max(1),
        page.total_results
    );
    Ok(())
}

fn cmd_repository_collaborators(
    ctx: &AppContext<HttpExecutor>,
    repository: &str,
    json: bool,
) -> color_eyre::Result<()> {
    let members = ctx.collaborators().for_repository(&EntityId::from(repository));

    let mut stdout = std::io::stdout().lock();
    if json {
        let rows: Vec<Value> = members
            .iter()
            .map(|(collaborator, permission)| {
                serde_json::json!({
                    "id": collaborator.id,
                    "login": collaborator.login,
                    "permission": permission,
                })
            })
            .collect();
        serde_json::to_writer_pretty(&mut stdout, &rows)?;
        let _ = writeln!(stdout);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = members
        .iter()
        .map(|(collaborator, permission)| {
            vec![
                collaborator.id.to_string(),
                collaborator.login.clone(),
                permission.as_str().to_lowercase(),
            ]
        })
        .collect();
    write_table(&mut stdout, &["ID", "LOGIN", "PERMISSION"], &rows)?;
    Ok(())
}

fn print_issue(issue: &Issue, json: bool) -> color_eyre::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, issue)?;
        let _ = writeln!(stdout);
    } else {
        let _ = writeln!(
            stdout,
            "{}#{} {} is now {}",
            issue.repository.name_with_owner,
            issue.number,
            issue.title,
            issue.state.as_str().to_lowercase()
        );
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let config = build_config(&cli)?;
    let page_size = config.search.default_page_size;
    let ctx = AppContext::connect(config)?;

    initialize_with_retries(&ctx, cli.retries).await?;
    info!("dashboard ready");

    let stores = ctx.stores();
    match &cli.command {
        Commands::Summary => cmd_summary(&ctx, cli.json),
        Commands::Projects(args) => cmd_list(&stores.projects, args, page_size, cli.json),
        Commands::Repos(args) => cmd_list(&stores.repositories, args, page_size, cli.json),
        Commands::Issues(args) => cmd_list(&stores.issues, args, page_size, cli.json),
        Commands::Labels(args) => cmd_list(&stores.labels, args, page_size, cli.json),
        Commands::Users(args) => cmd_list(&stores.users, args, page_size, cli.json),
        Commands::Collaborators { repository: Some(id), .. } => {
            cmd_repository_collaborators(&ctx, id, cli.json)
        }
        Commands::Collaborators { list, .. } => {
            cmd_list(&stores.collaborators, list, page_size, cli.json)
        }
        Commands::CloseIssue { id } => {
            let issue = ctx.issues().close(&EntityId::from(id.as_str())).await?;
            print_issue(&issue, cli.json)
        }
        Commands::ReopenIssue { id } => {
            let issue = ctx.issues().reopen(&EntityId::from(id.as_str())).await?;
            print_issue(&issue, cli.json)
        }
    }
}
