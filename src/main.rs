use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fleetwatch::ingest;
use fleetwatch::session::{FleetMonitor, SessionReport};
use fleetwatch::MonitorConfig;

/// Load vehicle telemetry, simulate live updates, and report fleet averages and alerts.
#[derive(Debug, Parser)]
#[command(name = "fleetwatch", version)]
struct Cli {
    /// CSV input with `id,speed,temperature,fuel` per line.
    input: PathBuf,

    /// JSON config file; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Writer pacing interval in milliseconds.
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Aggregation passes per measurement window.
    #[arg(long)]
    iterations: Option<u64>,

    /// Print the session report as JSON.
    #[arg(long)]
    json: bool,
}

enum Outcome {
    Completed,
    NoRecords,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::NoRecords) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_path(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(pacing_ms) = cli.pacing_ms {
        config.pacing_ms = pacing_ms;
    }
    if let Some(iterations) = cli.iterations {
        config.measure_iterations = iterations;
    }
    config.validate()?;

    let report = ingest::load_from_path(&cli.input)
        .with_context(|| format!("Cannot open file {}", cli.input.display()))?;

    let mut monitor = FleetMonitor::new(config);
    let loaded = monitor.load(report);
    // stdout carries nothing but the report in JSON mode.
    if cli.json {
        tracing::info!(loaded, rejected = monitor.rejected(), "Input loaded");
    } else {
        println!("Loaded {} vehicles from file", loaded);
        if monitor.rejected() > 0 {
            println!("Skipped {} malformed line(s).", monitor.rejected());
        }
    }

    if loaded == 0 {
        tracing::error!("No valid vehicle data loaded. Please check your CSV file.");
        return Ok(Outcome::NoRecords);
    }

    let session = monitor.run().await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_report(&session);
    }
    Ok(Outcome::Completed)
}

fn print_report(report: &SessionReport) {
    let perf = &report.performance;
    println!(
        "Performance Comparison ({} iterations):",
        perf.concurrent.passes
    );
    println!("  Single-threaded aggregation: {:.2} ms", perf.baseline.elapsed_ms);
    println!("  Multi-threaded aggregation:  {:.2} ms", perf.concurrent.elapsed_ms);
    println!(
        "  Writer updates: {} across {} writers\n",
        report.writer_updates, report.writers
    );

    println!("Sample Aggregates (multi-threaded):");
    println!("  Average Speed: {:.2} km/h", report.stats.average_speed);
    println!("  Average Temperature: {:.2} °C", report.stats.average_temperature);
    println!("  Average Fuel: {:.2} %", report.stats.average_fuel);

    if report.alerts.is_empty() {
        println!("\nNo alerts.");
        return;
    }
    println!("\nAlerts:");
    for vehicle in &report.alerts {
        let names: Vec<String> = vehicle.alerts.iter().map(|a| a.to_string()).collect();
        println!("  Vehicle {}: {}", vehicle.vehicle_id, names.join(", "));
    }
}
