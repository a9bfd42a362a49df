use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing::{debug, warn};
use visual_matcher::config::{LoggingSettings, Settings};
use visual_matcher::{MatcherClient, SearchSession, ViewState};

/// Visual Product Matcher client.
#[derive(Parser, Debug)]
#[command(name = "visual-matcher", version, about = "Find visually similar products")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalog with an image file and/or an image URL.
    Search {
        /// Image file to search with.
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Image URL to search with. May be combined with --file; the
        /// backend prefers the file when both are given.
        #[arg(short, long)]
        url: Option<String>,
        /// Number of results to return.
        #[arg(short = 'k', long)]
        top_k: Option<u16>,
        /// Minimum similarity score in [0, 1].
        #[arg(short = 's', long)]
        min_similarity: Option<f64>,
        /// Print the raw JSON response instead of the table.
        #[arg(long)]
        json: bool,
        /// Open the query preview with the system viewer.
        #[arg(long)]
        show_preview: bool,
    },
    /// Fetch the backend status object.
    Health {
        /// Print the raw JSON status instead of the summary.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load()
        .map_err(|e| anyhow!("failed to load configuration: {}", e))?;

    init_logging(&settings.logging);
    debug!("Using backend at {}", settings.api.base_url);

    let client = MatcherClient::new(settings.api.base_url.clone(), settings.api.timeout_secs);

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            file,
            url,
            top_k,
            min_similarity,
            json,
            show_preview,
        } => {
            run_search(
                &client,
                &settings,
                file,
                url,
                top_k,
                min_similarity,
                json,
                show_preview,
            )
            .await
        }
        Commands::Health { json } => run_health(&client, json).await,
    }
}

fn init_logging(settings: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_search(
    client: &MatcherClient,
    settings: &Settings,
    file: Option<PathBuf>,
    url: Option<String>,
    top_k: Option<u16>,
    min_similarity: Option<f64>,
    json: bool,
    show_preview: bool,
) -> Result<()> {
    // Startup connectivity indicator; a failed probe only warns.
    match client.health().await {
        Ok(status) => {
            eprintln!("{} {}", style("backend:").dim(), style(status.summary()).green());
        }
        Err(e) => {
            eprintln!(
                "{} {}",
                style("backend unreachable:").yellow().bold(),
                style(e).yellow()
            );
        }
    }

    let mut session = SearchSession::new(&settings.search);

    if let Some(value) = top_k {
        session.set_top_k(value);
    }
    if let Some(value) = min_similarity {
        session.set_min_similarity(value);
    }
    if let Some(text) = url {
        session.set_url(text);
    }
    if let Some(path) = &file {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image file {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        session.set_file(file_name, bytes)?;
    }

    if show_preview {
        if let Some(preview) = session.preview() {
            let location = preview.location();
            if let Err(e) = open::that(&location) {
                warn!("Failed to open preview {}: {}", location, e);
            }
        }
    }

    let request = session
        .begin_search()
        .context("nothing to search with: pass --file and/or --url")?;

    eprintln!("{}", style("searching...").dim());
    let outcome = client.search(&request).await;

    if json {
        if let Ok(response) = &outcome {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }

    session.finish_search(outcome);

    match session.view() {
        ViewState::Error(detail) => {
            eprintln!("{} {}", style("search failed:").red().bold(), detail);
            Err(anyhow!("search failed"))
        }
        ViewState::NoResults => {
            println!(
                "{}",
                style("no matching products above the similarity threshold").yellow()
            );
            Ok(())
        }
        ViewState::Results(items) => {
            if !json {
                print_results(items, client.base_url());
            }
            Ok(())
        }
        // begin/finish bracket the request, so the session cannot still be
        // loading or idle here
        ViewState::Idle | ViewState::Loading => Ok(()),
    }
}

fn print_results(items: &[visual_matcher::ResultItem], base_url: &str) {
    println!(
        "{}",
        style(format!("{} result(s)", items.len())).cyan().bold()
    );

    for (rank, item) in items.iter().enumerate() {
        let mut details: Vec<String> = Vec::new();
        if let Some(brand) = item.brand.as_deref().filter(|b| !b.trim().is_empty()) {
            details.push(brand.to_string());
        }
        if let Some(category) = item.category.as_deref().filter(|c| !c.trim().is_empty()) {
            details.push(category.to_string());
        }
        if let Some(price) = &item.price {
            details.push(price.to_string());
        }

        println!(
            "{:>3}. {} {} {}",
            rank + 1,
            style(format!("{:5.1}%", item.score_percent())).green(),
            style(item.display_name()).bold(),
            style(format!("[{}]", item.id)).dim()
        );
        if !details.is_empty() {
            println!("     {}", style(details.join(" | ")).dim());
        }
        if !item.image_url.trim().is_empty() {
            println!("     {}", style(item.resolve_image_url(base_url)).blue());
        }
    }
}

async fn run_health(client: &MatcherClient, json: bool) -> Result<()> {
    match client.health().await {
        Ok(status) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!(
                    "{} {}",
                    style("backend:").bold(),
                    style(status.summary()).green()
                );
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("backend unreachable:").red().bold(), e);
            Err(anyhow!("health check failed"))
        }
    }
}
