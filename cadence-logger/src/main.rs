use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use uuid::Uuid;

use cadence_logger::commands::{execute, teardown, CommandOutcome, OperatorCommand, HELP};
use cadence_logger::config::{LoggerConfig, SourceKind};
use cadence_logger::logger::init_logger;
use cadence_logger::viewer::CommandViewer;
use cadence_logger::{ControllerSettings, MeasurementController, SensorSource};
use common::types::SensorType;
use phyphox_rs::{run_mock_service, run_service};
use publisher::Listener;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Records phone accelerometer and gyroscope readings tagged with a cadence
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor source: phyphox or mock
    #[arg(short, long)]
    source: Option<SourceKind>,

    /// Address of the Phyphox remote access server
    #[arg(long)]
    base_url: Option<String>,

    /// Initial cadence
    #[arg(long)]
    cadence: Option<String>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

/// Acquisition loop of the sensor source and how to stop it
struct RunningSource {
    source: Arc<SensorSource>,
    handle: JoinHandle<()>,
    stop: Box<dyn Fn() + Send + Sync>,
}

fn load_config(args: &Args) -> Result<LoggerConfig> {
    let mut config = match &args.config {
        Some(path) => LoggerConfig::load_from_file(path)
            .with_context(|| format!("Cannot load configuration {}", path.display()))?,
        None => LoggerConfig::default(),
    };
    if let Some(kind) = args.source {
        config.source.kind = kind;
    }
    if let Some(base_url) = &args.base_url {
        config.source.base_url = base_url.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn start_source(config: &LoggerConfig) -> Result<RunningSource> {
    let sensor_cluster = vec![
        SensorType::Accelerometer(Uuid::new_v4()),
        SensorType::Gyroscope(Uuid::new_v4()),
    ];
    let source = &config.source;
    let running = match source.kind {
        SourceKind::Phyphox => {
            let (handle, service) = run_service(
                &source.base_url,
                &source.tag,
                sensor_cluster,
                source.update_period_millis,
            )?;
            let stopper = service.clone();
            RunningSource {
                source: service,
                handle,
                stop: Box::new(move || stopper.stop()),
            }
        }
        SourceKind::Mock => {
            let (handle, service) = run_mock_service(
                &source.tag,
                sensor_cluster,
                source.update_period_millis,
                source.capture_sampling_period_millis,
                source.add_sensor_noise,
                None,
            )?;
            let stopper = service.clone();
            RunningSource {
                source: service,
                handle,
                stop: Box::new(move || stopper.stop()),
            }
        }
    };
    info!("Sensor source {} started", source.kind);
    Ok(running)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let config = load_config(&args)?;
    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Cannot save configuration {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let running = start_source(&config)?;
    let viewer = Arc::new(CommandViewer::new(&config.viewer.program));
    let controller = MeasurementController::new(
        running.source.clone(),
        ControllerSettings::from(&config),
        viewer,
    );
    if let Some(cadence) = &args.cadence {
        controller.set_cadence(cadence).await;
    }

    let mut printer = Listener::new(|_id, message: Arc<String>| async move {
        println!(">> {}", message);
    });
    controller.messages().subscribe(&mut printer).await;

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Cannot read from stdin: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<OperatorCommand>() {
                    Ok(command) => match execute(&controller, command).await {
                        CommandOutcome::Continue => {}
                        CommandOutcome::Reply(reply) => println!("{}", reply),
                        CommandOutcome::Quit => break,
                    },
                    Err(e) => println!("{}. Type help for the list of commands.", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
                break;
            }
        }
    }

    let RunningSource { handle, stop, .. } = running;
    teardown(&controller, move || stop(), handle, SHUTDOWN_TIMEOUT).await;
    info!("Bye");
    Ok(())
}
