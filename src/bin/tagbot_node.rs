use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tagbot_core::common::error::EventError;
use tagbot_core::config::TagConfig;
use tagbot_core::events::{EventSink, OutboundEvent, EVENT_NAMESPACE};
use tagbot_core::logging::init_tracing;
use tagbot_core::{sim, TagBot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Runs the tag game core, reading one JSON directive payload per stdin
/// line and writing outbound events to stdout as JSON lines.
#[derive(Debug, Parser)]
#[command(name = "tagbot_node", version, about)]
struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, overrides the config file (RUST_LOG still wins)
    #[arg(long)]
    log_filter: Option<String>,

    /// Address reported to the connection hooks
    #[arg(long, default_value = "stdin")]
    device_addr: String,
}

/// Writes each event as `{"namespace", "name", "payload"}` on stdout
struct StdoutEventSink;

impl EventSink for StdoutEventSink {
    fn send(&self, event: OutboundEvent) -> Result<(), EventError> {
        let line = serde_json::to_string(&json!({
            "namespace": EVENT_NAMESPACE,
            "name": event.name.as_str(),
            "payload": event.payload,
        }))?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TagConfig::load(path)?,
        None => TagConfig::default(),
    };
    if let Some(filter) = args.log_filter {
        config.logging.filter = filter;
    }
    init_tracing(&config.logging)?;

    let peripherals = sim::peripherals(&config.drive, Arc::new(StdoutEventSink));
    let mut bot = TagBot::new(config, peripherals)?;
    bot.init().context("failed to start tagbot core")?;
    bot.on_connected(&args.device_addr);

    let router = bot.router();
    let mut directives = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => router.handle_bytes(line.as_bytes()).await,
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "failed to read directive stream");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut directives => info!("directive stream closed"),
        result = tokio::signal::ctrl_c() => {
            result.context("unable to listen for Ctrl+C")?;
            info!("received Ctrl+C");
            directives.abort();
        }
    }

    bot.on_disconnected(&args.device_addr);
    bot.shutdown().await?;
    Ok(())
}
