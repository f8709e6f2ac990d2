use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use solar_analytics::classification::AnomalySeverity;
use solar_analytics::config::Config;
use solar_analytics::data::{
    ConditionBreakdown, CorrelationResult, EnergyTotals, ProductionSummary, SeasonSummary,
    SeverityCount, WeatherFactor, WeatherSummary, YearScope,
};
use solar_analytics::loader::SnapshotLoader;
use solar_analytics::services::SolarDataService;

#[derive(Parser)]
#[command(name = "solar-analytics")]
#[command(about = "Reports over a solar production and weather snapshot", long_about = None)]
struct Cli {
    /// Snapshot file path or http(s) URL (overrides SOLAR_DATA_SOURCE)
    #[arg(long, global = true)]
    data: Option<String>,

    /// Year to report on (defaults to the latest year in the snapshot)
    #[arg(long, global = true, conflicts_with = "all_years")]
    year: Option<i32>,

    /// Report across every year in the snapshot
    #[arg(long, global = true)]
    all_years: bool,

    /// Number of days in ranked lists (overrides SOLAR_DEFAULT_RESULT_COUNT)
    #[arg(long, global = true)]
    count: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Energy totals, production statistics and anomaly counts
    Summary,
    /// 30-day bucket statistics
    Monthly,
    /// 7-day bucket statistics
    Weekly,
    /// Highest production days
    Top,
    /// Lowest production days
    Bottom,
    /// Least sunshine, then most precipitation
    WorstWeather,
    /// Mean efficiency, high/low efficiency day counts, best and worst day
    Efficiency,
    /// Flagged anomalies grouped by weather condition
    AnomalyPatterns,
    /// Days at or above a minimum anomaly severity
    Anomalies {
        /// none, low, medium or high
        #[arg(long, default_value = "low")]
        min_severity: AnomalySeverity,
    },
    /// Weather statistics, condition breakdown and seasons
    Weather,
    /// Correlation of weather factors with production
    Correlation,
    /// Days within an inclusive day-of-year range
    Days {
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long, default_value_t = 366)]
        end: u32,
    },
}

#[derive(Serialize)]
struct SummaryReport {
    /// `None` when the report spans all years
    year: Option<i32>,
    totals: EnergyTotals,
    energy_balance: f64,
    self_consumption: f64,
    production: ProductionSummary,
    severities: Vec<SeverityCount>,
}

#[derive(Serialize)]
struct WeatherReport {
    year: Option<i32>,
    summary: WeatherSummary,
    conditions: Vec<ConditionBreakdown>,
    seasons: Vec<SeasonSummary>,
}

#[derive(Serialize)]
struct CorrelationReport {
    year: Option<i32>,
    #[serde(flatten)]
    result: CorrelationResult,
    strongest: WeatherFactor,
}

fn year_of(scope: YearScope) -> Option<i32> {
    match scope {
        YearScope::Year(year) => Some(year),
        YearScope::AllYears => None,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,solar_analytics=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(data) = cli.data.clone() {
        config.data_source = data;
    }
    debug!("Using config: {:?}", config);
    let count = cli.count.unwrap_or(config.default_result_count);

    let loader = SnapshotLoader::from_config(&config)?;
    info!("Loading snapshot from {}", loader.source());
    let service = SolarDataService::load(&loader).await?;

    let scope = if cli.all_years {
        YearScope::AllYears
    } else {
        service
            .resolve_scope(cli.year)
            .ok_or("Snapshot contains no data")?
    };
    let year = year_of(scope);

    match cli.command {
        Command::Summary => {
            let totals = service.totals(scope);
            print_json(&SummaryReport {
                year,
                energy_balance: totals.energy_balance(),
                self_consumption: totals.self_consumption(),
                totals,
                production: service.production_summary(scope),
                severities: service.severity_breakdown(scope),
            })?;
        }
        Command::Monthly => print_json(&service.monthly_statistics(scope))?,
        Command::Weekly => print_json(&service.weekly_statistics(scope))?,
        Command::Top => print_json(&service.top_production_days(scope, count))?,
        Command::Bottom => print_json(&service.bottom_production_days(scope, count))?,
        Command::WorstWeather => print_json(&service.worst_weather_days(scope, count))?,
        Command::Efficiency => print_json(&service.efficiency_analysis(scope))?,
        Command::AnomalyPatterns => print_json(&service.anomaly_patterns(scope))?,
        Command::Anomalies { min_severity } => {
            print_json(&service.anomalous_days(scope, min_severity))?
        }
        Command::Weather => print_json(&WeatherReport {
            year,
            summary: service.weather_summary(scope),
            conditions: service.condition_breakdown(scope),
            seasons: service.seasonal_summary(scope),
        })?,
        Command::Correlation => {
            let result = service.weather_correlation(scope)?;
            print_json(&CorrelationReport {
                year,
                strongest: result.strongest(),
                result,
            })?;
        }
        Command::Days { start, end } => print_json(&service.day_range(scope, start, end))?,
    }

    Ok(())
}
