//! statuscast - status update fan-out
//!
//! CLI entry point for publishing and watching status updates.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use futures::StreamExt;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use statuscast::cli::{Cli, Command, OutputFormat};
use statuscast::codec::PayloadFormat;
use statuscast::config::Config;
use statuscast::coordinator::{Coordinator, CoordinatorError};
use statuscast::{RedisBroker, StatusEvent, StatusPublisher};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("statuscast")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("statuscast.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("statuscast loaded config: broker={}", config.broker.url);

    match cli.command {
        Command::Publish {
            id,
            code,
            payload_format,
        } => {
            debug!(id, code, ?payload_format, "main: matched Publish command");
            cmd_publish(&config, id, code, payload_format).await
        }
        Command::Watch { count, format } => {
            debug!(?count, %format, "main: matched Watch command");
            cmd_watch(&config, count, format).await
        }
        Command::Ping => {
            debug!("main: matched Ping command");
            cmd_ping(&config).await
        }
    }
}

async fn cmd_publish(config: &Config, id: i32, code: i32, payload_format: Option<PayloadFormat>) -> Result<()> {
    let broker = RedisBroker::connect(&config.broker.url)
        .await
        .context("Failed to connect to broker")?;

    let format = payload_format.unwrap_or(config.wire.payload_format);
    let publisher = StatusPublisher::new(Arc::new(broker), format);
    let status = publisher.publish(id, code).await?;

    println!("{} {}", "Published".green(), status);
    Ok(())
}

async fn cmd_watch(config: &Config, count: Option<usize>, format: OutputFormat) -> Result<()> {
    let broker = RedisBroker::connect(&config.broker.url)
        .await
        .context("Failed to connect to broker")?;

    let coordinator = Coordinator::new(config.coordinator.clone());
    let handle = coordinator.handle();
    let mut coord_task = tokio::spawn(coordinator.run(broker));

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling subscription");
            ctrl_c.cancel();
        }
    });

    // The Coordinator only serves requests once the feed is confirmed
    let mut stream = tokio::select! {
        stream = handle.subscribe(cancel.clone()) => stream?,
        exit = &mut coord_task => return coordinator_exit(exit, &config.broker.url),
    };

    let mut seen = 0usize;
    loop {
        tokio::select! {
            event = stream.next() => match event {
                Some(event) => {
                    print_event(&event, &format)?;
                    seen += 1;
                    if count.is_some_and(|count| seen >= count) {
                        cancel.cancel();
                        break;
                    }
                }
                None => break,
            },
            exit = &mut coord_task => return coordinator_exit(exit, &config.broker.url),
        }
    }

    info!(seen, "Watch finished");
    Ok(())
}

async fn cmd_ping(config: &Config) -> Result<()> {
    let broker = RedisBroker::connect(&config.broker.url)
        .await
        .context("Failed to connect to broker")?;

    let pong = broker.ping().await.context("PING failed")?;
    println!("{} {} ({})", "✓".green(), config.broker.url, pong);
    Ok(())
}

fn print_event(event: &StatusEvent, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!(
                "{} {} {} {}",
                "status".cyan(),
                event.id.to_string().bold(),
                "->".dimmed(),
                event.code.to_string().green()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    Ok(())
}

fn coordinator_exit(
    exit: std::result::Result<std::result::Result<(), CoordinatorError>, JoinError>,
    url: &str,
) -> Result<()> {
    match exit {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            warn!(error = %e, "Coordinator exited");
            let connection_lost = match &e {
                CoordinatorError::Confirmation { source, .. } => source.is_connection(),
                CoordinatorError::FeedClosed => true,
                CoordinatorError::ChannelClosed => false,
            };
            if connection_lost {
                eprintln!("{} Lost connection to {}", "✗".red(), url);
            }
            Err(e).context("Coordinator failed")
        }
        Err(e) => Err(e).context("Coordinator task panicked"),
    }
}
