mod sinks;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use harvest_client::{ReqwestFetcher, ScraperListParser, ScraperPriceParser};
use harvest_core::crawl::{CrawlConfig, CrawlService};
use harvest_core::search::{DEFAULT_BASE_URL, SearchQuery};
use harvest_core::throttle::PageThrottle;
use harvest_db::{DatabaseConfig, ListingRepository};

use crate::sinks::{CsvSink, SinkKind, StdoutSink};

/// Default filter: the workspace crates at info, dependencies at their own
/// levels only via `RUST_LOG`. Crate names use underscores, so a bare
/// `harvest` directive would match none of them.
const DEFAULT_LOG_FILTER: &str =
    "harvest_cli=info,harvest_core=info,harvest_client=info,harvest_db=info";

#[derive(Parser)]
#[command(name = "harvest", version, about = "Incremental vehicle-listing harvester")]
struct Cli {
    /// CSV output file
    #[arg(long, env = "HARVEST_CSV", default_value = "cars.csv")]
    csv: PathBuf,

    /// Disable the CSV sink
    #[arg(long, default_value_t = false)]
    no_csv: bool,

    /// SQLite database file
    #[arg(long, env = "HARVEST_DB", default_value = "cars.db")]
    db: PathBuf,

    /// Disable the SQLite sink
    #[arg(long, default_value_t = false)]
    no_db: bool,

    /// Also stream each record to stdout
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// Listings requested per search-results page
    #[arg(long, default_value_t = 100)]
    page_size: u32,

    /// Zero-based page index to start from
    #[arg(long, default_value_t = 0)]
    start_page: u32,

    /// Stop after harvesting this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Base pause before each search-page request, in seconds
    #[arg(long, default_value_t = 2)]
    delay_secs: u64,

    /// Maximum random extra pause on top of the base, in seconds
    #[arg(long, default_value_t = 3)]
    jitter_secs: u64,

    /// HTTP timeout per request, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Site origin to harvest (override for a local fixture server)
    #[arg(long, env = "HARVEST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing; RUST_LOG overrides the defaults.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut sinks: Vec<SinkKind> = Vec::new();
    if !cli.no_csv {
        let sink = CsvSink::create(&cli.csv).map_err(|e| anyhow::anyhow!(e))?;
        tracing::info!(path = %cli.csv.display(), "Writing CSV");
        sinks.push(SinkKind::Csv(sink));
    }
    if !cli.no_db {
        let config = DatabaseConfig::new(cli.db.to_string_lossy());
        let repo = ListingRepository::connect(&config)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        tracing::info!(path = %cli.db.display(), "Writing SQLite");
        sinks.push(SinkKind::Db(repo));
    }
    if cli.stdout {
        sinks.push(SinkKind::Stdout(StdoutSink));
    }
    if sinks.is_empty() {
        bail!("all sinks disabled; enable at least one of CSV, SQLite, or --stdout");
    }

    let query =
        SearchQuery::with_base(&cli.base_url, cli.page_size).map_err(|e| anyhow::anyhow!(e))?;

    let throttle = PageThrottle::new(Duration::from_secs(cli.delay_secs))
        .with_jitter(Duration::from_secs(cli.jitter_secs));
    let config = CrawlConfig {
        start_page: cli.start_page,
        max_pages: cli.max_pages,
        throttle,
    };

    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(cli.timeout_secs))
        .context("Failed to create HTTP client")?;
    let list_parser = ScraperListParser::new().map_err(|e| anyhow::anyhow!(e))?;
    let price_parser = ScraperPriceParser::new().map_err(|e| anyhow::anyhow!(e))?;

    let mut service = CrawlService::new(fetcher, list_parser, price_parser, sinks, query, config);
    let summary = service.run().await.map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        pages = summary.pages,
        listings = summary.listings,
        "Harvest finished"
    );

    Ok(())
}
