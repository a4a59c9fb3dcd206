use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rtc_handshake::{ChannelAdapter, ConnectionCoordinator, CoordinatorConfig, InfoKind};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Runs a complete offer/answer handshake between two in-process peers and exchanges a
/// message over the negotiated data channel.
#[derive(Parser)]
#[command(name = "rtc-loopback")]
#[command(version, about)]
struct Cli {
    /// Label of the data channel the initiator opens.
    #[arg(long, default_value = "chat")]
    label: String,

    /// Message the joining peer sends once the channel is open.
    #[arg(short, long, default_value = "ping")]
    message: String,

    /// How long to wait for the channel to open and for the reply.
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,

    /// JSON file with a coordinator configuration (ice servers, timeouts).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gather host candidates only, without contacting any STUN/TURN server.
    #[arg(long, conflicts_with = "config")]
    host_only: bool,

    /// Log handshake internals.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let timeout = Duration::from_secs(cli.timeout_secs);

    println!("{}", "🚀 Starting loopback handshake...".green().bold());

    let initiator = ConnectionCoordinator::new(config.clone())
        .await
        .context("Failed to create the initiating peer")?;
    let responder = ConnectionCoordinator::new(config)
        .await
        .context("Failed to create the joining peer")?;
    debug!("Initiator {}, responder {}", initiator.id(), responder.id());

    spawn_info_logger("initiator", &initiator);
    spawn_info_logger("responder", &responder);
    let mut incoming = responder.data_channels();

    println!("{}", "📡 Creating offer...".cyan());
    let offer = initiator.initiate(&cli.label, None).await?;
    println!(
        "   offer ready ({} bytes of SDP)",
        offer.local_description().sdp.len()
    );

    println!("{}", "📡 Joining with the offer...".cyan());
    let answer = responder.join(offer.local_description().clone()).await?;
    println!(
        "   answer ready ({} bytes of SDP)",
        answer.local_description().sdp.len()
    );

    println!("{}", "📡 Applying the answer...".cyan());
    offer
        .apply_answer(answer.into_local_description())
        .await?;

    let remote = tokio::time::timeout(timeout, incoming.recv())
        .await
        .context("The joining peer never received a data channel")?
        .context("Data channel stream closed")?;

    spawn_responder(offer.channel().clone(), timeout);

    let mut replies = remote.messages();
    remote.wait_open(timeout).await?;
    println!(
        "{} '{}'",
        "🔗 Data channel open:".green(),
        remote.label().bold()
    );

    remote.send_text(cli.message.clone()).await?;
    println!("   → {}", cli.message.yellow());

    let reply = tokio::time::timeout(timeout, replies.recv())
        .await
        .context("No reply within the timeout")?
        .context("Message stream closed")?;
    let reply_text = reply
        .as_text()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("<{} binary bytes>", reply.data.len()));
    println!("   ← {}", reply_text.yellow());

    initiator.close().await?;
    responder.close().await?;

    println!("{}", "✨ Loopback completed successfully!".green().bold());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rtc_handshake={}", default_level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> Result<CoordinatorConfig> {
    if cli.host_only {
        return Ok(CoordinatorConfig::host_only());
    }

    let Some(path) = &cli.config else {
        return Ok(CoordinatorConfig::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    CoordinatorConfig::from_json(&json)
        .with_context(|| format!("Invalid coordinator config in {}", path.display()))
}

fn spawn_info_logger(name: &'static str, coordinator: &ConnectionCoordinator) {
    let mut events = coordinator.info();

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event.kind {
                InfoKind::NewCandidateDiscovered { .. } => debug!("{}: {}", name, event),
                _ => info!("{}: {}", name, event),
            }
        }
    });
}

/// Answers every text message on `channel` with `pong`.
fn spawn_responder(channel: ChannelAdapter, timeout: Duration) {
    let mut messages = channel.messages();

    tokio::spawn(async move {
        if let Err(e) = channel.wait_open(timeout).await {
            warn!("Initiator channel: {:#}", e);
            return;
        }

        while let Some(message) = messages.recv().await {
            let Some(text) = message.as_text() else {
                continue;
            };
            info!("Initiator received '{}'", text);

            if let Err(e) = channel.send_text("pong").await {
                warn!("Failed to reply: {:#}", e);
                break;
            }
        }
    });
}
