//! SoundGuard - Main Entry Point

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use soundguard_core::api::{AnalysisResponse, ErrorResponse, SensorDataInput, SimulateRequest};
use soundguard_core::constants::{APP_NAME, APP_VERSION};
use soundguard_core::logic::config::Config;
use soundguard_core::logic::pipeline::{AnalyzeError, Analyzer};
use soundguard_core::logic::refresh_loop::RefreshController;

#[derive(Parser, Debug)]
#[command(name = "soundguard")]
#[command(about = "Smart-home sound anomaly analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh in the background and print an analysis every cache period until Ctrl-C
    Run,
    /// Analyze the latest reading once
    Analyze,
    /// Analyze a synthetic reading
    Simulate {
        #[arg(long)]
        amplitude: f64,
        #[arg(long)]
        pattern_id: i64,
        #[arg(long)]
        flame: bool,
        #[arg(long)]
        motion: bool,
    },
    /// Print the status snapshot
    Status,
}

const EXIT_NO_DATA: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;

    log::info!("Starting {} v{} (channel {})", APP_NAME, APP_VERSION, config.channel_id);

    let analyzer = Arc::new(Analyzer::from_config(&config).context("failed to build telemetry client")?);

    match cli.command {
        Command::Run => run(analyzer).await,
        Command::Analyze => match analyzer.analyze(Utc::now()).await {
            Ok(result) => {
                print_json(&AnalysisResponse::from(&result))?;
                Ok(ExitCode::SUCCESS)
            }
            Err(e @ AnalyzeError::NoData) => {
                print_json(&ErrorResponse::new(e.to_string()))?;
                Ok(ExitCode::from(EXIT_NO_DATA))
            }
        },
        Command::Simulate { amplitude, pattern_id, flame, motion } => {
            let request = SimulateRequest {
                sensor_data: Some(SensorDataInput {
                    amplitude: Some(Value::from(amplitude)),
                    pattern_id: Some(Value::from(pattern_id)),
                    flame_detected: Some(Value::from(flame)),
                    motion_detected: Some(Value::from(motion)),
                }),
            };
            let reading = request.into_reading()?;
            let result = analyzer.analyze_given(reading).await;
            print_json(&AnalysisResponse::from(&result))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            print_json(&analyzer.status(Utc::now()).await)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run<S>(analyzer: Arc<Analyzer<S>>) -> Result<ExitCode>
where
    S: soundguard_core::logic::telemetry::TelemetrySource + 'static,
{
    let mut controller = RefreshController::new();
    controller.start(Arc::clone(&analyzer))?;

    let mut ticker = tokio::time::interval(analyzer.cache_ttl());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match analyzer.analyze(Utc::now()).await {
                    Ok(result) => print_json(&AnalysisResponse::from(&result))?,
                    Err(e) => log::warn!("Analysis skipped: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutdown requested");
                break;
            }
        }
    }

    controller.stop().await?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
