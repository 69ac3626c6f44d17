//! # triage
//!
//! Document triage service binary: runs the HTTP server or triages a single
//! document from the command line.

#![deny(unsafe_code)]

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use triage_core::DocumentMetadata;
use triage_engine::{EngineConfig, TriageEngine, WorkingHours};
use triage_server::{AppState, ServerConfig};
use triage_settings::TriageSettings;
use triage_telemetry::{init_telemetry, TelemetryConfig};

/// Document triage service.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about = "Document triage service")]
struct Cli {
    /// Settings file (defaults to `~/.triage/settings.json`).
    #[arg(long, global = true, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP endpoint.
    Serve {
        /// Host to bind (overrides settings).
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, 0 for auto-assign (overrides settings).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Triage one document given as a JSON file, or `-` for stdin.
    Process {
        input: String,
    },
}

fn load(cli: &Cli) -> Result<TriageSettings> {
    let settings = match &cli.config {
        Some(path) => triage_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => triage_settings::load_settings().context("Failed to load settings")?,
    };
    Ok(settings)
}

fn engine_config(settings: &TriageSettings) -> Result<EngineConfig> {
    let escalation = &settings.escalation;
    let working_hours = WorkingHours::new(
        escalation.utc_offset_minutes,
        escalation.work_start_hour,
        escalation.work_end_hour,
    )
    .context("Invalid escalation settings")?;
    Ok(EngineConfig {
        summary_max_chars: settings.pipeline.summary_max_chars,
        working_hours,
    })
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

async fn serve(settings: TriageSettings, host: Option<String>, port: Option<u16>) -> Result<()> {
    let guard = init_telemetry(TelemetryConfig::from_level_str(
        &settings.logging.level,
        settings.logging.json,
    ));

    let engine = TriageEngine::new(engine_config(&settings)?);
    let config = ServerConfig {
        host: host.unwrap_or(settings.server.host),
        port: port.unwrap_or(settings.server.port),
        request_timeout_secs: settings.server.request_timeout_secs,
        max_body_bytes: settings.server.max_body_bytes,
    };

    let handle = triage_server::start(config, AppState::new(engine, guard.metrics()))
        .await
        .context("Failed to start server")?;
    tracing::info!(port = handle.port, "triage server ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl+c")?;

    tracing::info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

fn process(settings: TriageSettings, input: &str) -> Result<()> {
    // stdout carries the result
    let _guard = init_telemetry(TelemetryConfig {
        to_stderr: true,
        ..TelemetryConfig::from_level_str(&settings.logging.level, settings.logging.json)
    });

    let engine = TriageEngine::new(engine_config(&settings)?);
    let raw = read_input(input)?;
    let metadata: DocumentMetadata =
        serde_json::from_str(&raw).context("Input is not a document metadata object")?;
    let result = engine.process(&metadata)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load(&cli)?;

    match cli.command {
        Command::Serve { host, port } => serve(settings, host, port).await,
        Command::Process { input } => process(settings, &input),
    }
}
