use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client_geo_enrichment::config::Config;
use client_geo_enrichment::geocoder::NominatimClient;
use client_geo_enrichment::pipeline::EnrichmentPipeline;
use client_geo_enrichment::resolver::GeocodeResolver;
use client_geo_enrichment::table;

/// Validate and enrich client CSV data
#[derive(Debug, Parser)]
#[command(name = "client-enrich", version)]
struct Cli {
    /// Input roster CSV
    input_file: PathBuf,

    /// Where to write the enriched CSV
    output_file: PathBuf,

    /// Only process the first N rows
    #[arg(long)]
    limit: Option<usize>,

    /// Also write a JSON run report with every skipped row and its reason
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Main entry point for the application.
///
/// Loads the roster, runs every row through validation and geocoding, then
/// writes the accepted rows. A roster that cannot be loaded aborts the run
/// before any output is written.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client_geo_enrichment=info,client_enrich=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    let table = table::load_records(&cli.input_file, cli.limit)
        .map_err(|e| anyhow::anyhow!("Error loading input file: {}", e))?;

    let geocoder = NominatimClient::from_config(&config)?;
    tracing::info!("✓ Geocoding client initialized: {}", config.geocoder_base_url);

    let resolver = GeocodeResolver::from_config(Arc::new(geocoder), &config);
    let pipeline = EnrichmentPipeline::from_config(resolver, &config);

    let run = pipeline.run(table.records).await;

    table::write_records(&cli.output_file, &table.headers, &run.accepted)?;

    if let Some(report_path) = cli.report.as_deref() {
        run.report.write_json(report_path)?;
    }

    Ok(())
}
