//! # Saferoute CLI
//!
//! Command-line interface for the saferoute library.
//! Requests the shortest and the safest walking route between two points.

use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, error};
use saferoute::{
    retry_transport, Backend, BackendConfig, Coordinate, HeatmapFetcher, RetryPolicy, RouteAggregator, RouteMode,
};

mod cli;

/// Command-line interface for saferoute
#[derive(Parser, Debug)]
#[command(name = "saferoute")]
#[command(about = "Safety-aware walking routes between two coordinates")]
#[command(long_about = "Requests the shortest route and the safest route for the current time of day:
  saferoute 37.50 127.00 37.51 127.01                       # Route table
  saferoute 37.50 127.00 37.51 127.01 --json                # JSON output
  saferoute 37.50 127.00 37.51 127.01 --heatmap safest_day  # Plus heatmap along the day route

Backend:
  SAFEROUTE_BASE_URL, SAFEROUTE_TIMEZONE_URL, SAFEROUTE_TIMEOUT_SECS and
  SAFEROUTE_HEATMAP_TIMEOUT_SECS override the defaults")]
#[command(version = env!("SAFEROUTE_VERSION"))]
struct Cli {
    /// Start latitude
    #[arg(allow_negative_numbers = true)]
    start_lat: f64,

    /// Start longitude
    #[arg(allow_negative_numbers = true)]
    start_lng: f64,

    /// Destination latitude
    #[arg(allow_negative_numbers = true)]
    end_lat: f64,

    /// Destination longitude
    #[arg(allow_negative_numbers = true)]
    end_lng: f64,

    /// Fetch the safety heatmap along the route with this mode (shortest, safest_day, safest_night)
    #[arg(long)]
    heatmap: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Routing backend base URL (overrides SAFEROUTE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Retry the whole request this many times on network failures
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Show what would be requested without contacting the backend
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "saferoute=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    debug!("🧭 Saferoute v{} starting...", env!("SAFEROUTE_VERSION"));

    let mut config = BackendConfig::from_env().context("Invalid backend configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }

    let heatmap_mode = match &cli.heatmap {
        Some(mode) => Some(mode.parse::<RouteMode>()?),
        None => None,
    };

    let start = Coordinate::new(cli.start_lat, cli.start_lng);
    let end = Coordinate::new(cli.end_lat, cli.end_lng);

    if cli.dry_run {
        eprintln!("🔍 [DRY RUN] Would request routes {start} -> {end} from {}", config.base_url);
        if let Some(mode) = heatmap_mode {
            eprintln!("🔍 [DRY RUN] Would request {} heatmap (radius {}m)", mode.heatmap_bucket().as_wire(), config.heatmap_radius_m);
        }
        return Ok(());
    }

    let backend = Backend::new(config);
    let aggregator = RouteAggregator::new(backend.clone());
    let policy = RetryPolicy::new(cli.retries);

    let progress = spinner(cli.json, "🌐 Requesting routes");
    let result = match retry_transport(policy, || aggregator.request_all_routes(start, end)).await {
        Ok(result) => {
            progress.finish("✅ Routes received");
            result
        }
        Err(e) => {
            progress.fail("❌ No routes");
            return Err(e).context("Route request failed");
        }
    };

    if cli.json {
        println!("{}", cli::render::routes_json(&result)?);
    } else {
        print!("{}", cli::render::route_table(&result));
    }

    if let Some(mode) = heatmap_mode {
        let Some(route) = result.candidate(mode) else {
            bail!("No {mode} route in the result to fetch a heatmap for");
        };

        let progress = spinner(cli.json, "🌡️  Requesting safety heatmap");
        let fetcher = HeatmapFetcher::new(backend);
        match retry_transport(policy, || fetcher.fetch_heatmap(&route.path, mode)).await {
            Ok(points) => {
                progress.finish("✅ Heatmap received");
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&points)?);
                } else {
                    print!("{}", cli::render::heatmap_summary(&points));
                }
            }
            Err(e) => {
                progress.fail("❌ Heatmap unavailable");
                return Err(e).context("Heatmap request failed");
            }
        }
    }

    Ok(())
}

fn spinner(quiet: bool, message: &str) -> cli::ProgressManager {
    if quiet {
        cli::ProgressManager::hidden()
    } else {
        cli::ProgressManager::new(message)
    }
}
