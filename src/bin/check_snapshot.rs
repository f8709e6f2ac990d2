use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use solar_analytics::aggregation;
use solar_analytics::config::{Config, DEFAULT_DATA_SOURCE};
use solar_analytics::loader::SnapshotLoader;
use solar_analytics::utils::format_day;

#[derive(Parser)]
#[command(name = "check-snapshot")]
#[command(about = "Check that a snapshot loads and summarize its contents", long_about = None)]
struct Cli {
    /// Snapshot file path or http(s) URL
    #[arg(env = "SOLAR_DATA_SOURCE", default_value = DEFAULT_DATA_SOURCE)]
    source: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config {
        data_source: cli.source,
        ..Config::from_env()
    };
    let loader = SnapshotLoader::from_config(&config)?;

    println!("Checking snapshot {}...\n", loader.source());
    let collection = loader.load().await?;

    if collection.is_empty() {
        println!("Snapshot contains no years");
        return Ok(());
    }

    println!("Years in snapshot:");
    for year in collection.available_years() {
        let records = collection.year_records(year);
        let totals = aggregation::totals(records);
        let incomplete = records.iter().filter(|r| !r.is_complete).count();
        println!(
            "  {}: {} days ({} incomplete), production {:.2} kWh, consumption {:.2} kWh",
            year,
            records.len(),
            incomplete,
            totals.production,
            totals.consumption
        );
        let first = records.iter().map(|r| r.day).min();
        let last = records.iter().map(|r| r.day).max();
        if let (Some(first), Some(last)) = (first, last) {
            println!(
                "        covers {} to {}",
                format_day(year, first),
                format_day(year, last)
            );
        }
    }

    println!("\nTotal days: {}", collection.total_days());

    Ok(())
}
