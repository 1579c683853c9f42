// src/main.rs
use anyhow::{Context, Result};
use hand_retarget::assets::InMemoryAssets;
use hand_retarget::config::RetargetConfig;
use hand_retarget::data::FrameLog;
use hand_retarget::session::HandSession;
use hand_retarget::skeleton::HandSide;
use hand_retarget::tracking::{
    AuthorizationMonitor, AuthorizationStatus, SimulatedHandTracker, SimulationConfig,
};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<PathBuf>,
    frames: Option<usize>,
    dropout_every: Option<usize>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        frames: None,
        dropout_every: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--frames" => {
                let value = iter.next().context("--frames needs a value")?;
                args.frames = Some(value.parse().context("Invalid --frames")?);
            }
            "--dropout" => {
                let value = iter.next().context("--dropout needs a value")?;
                args.dropout_every = Some(value.parse().context("Invalid --dropout")?);
            }
            _ => args.config = Some(PathBuf::from(arg)),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let config = RetargetConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let assets = InMemoryAssets::with_standard_gloves(&config.left_glove, &config.right_glove);
    let mut session = HandSession::new(&config, &assets);

    // The simulator has no permission prompt, so authorization is granted up front.
    let monitor = AuthorizationMonitor::new(AuthorizationStatus::Allowed);
    info!("Hand tracking authorization: {:?}", monitor.status());

    let mut tracker = SimulatedHandTracker::new(
        SimulationConfig {
            rate_hz: config.simulation_rate_hz,
            frame_limit: args.frames.or(Some(900)),
            dropout_every: args.dropout_every,
            ..Default::default()
        },
        monitor.subscribe(),
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let mut frame_log = FrameLog::new(&config.output_directory, None);
    let summary = session.run(&mut tracker, cancel_rx, Some(&mut frame_log)).await;

    println!("=== Session {} ===", frame_log.session_name());
    println!(
        "Gloves bound: left={}, right={}",
        summary.left_bound, summary.right_bound
    );
    println!(
        "Updates: {} applied, {} hidden, {} ignored",
        summary.stats.applied, summary.stats.hidden, summary.stats.ignored
    );
    for side in HandSide::BOTH {
        if let Some(rate) = frame_log.tracking_success_rate(side) {
            println!("Tracking success rate ({}): {:.1}%", side, rate);
        }
    }

    if !frame_log.is_empty() {
        let path = frame_log.export_csv().context("Failed to export frame log")?;
        println!("Frame log written to {}", path.display());
    }

    Ok(())
}
