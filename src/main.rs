//! TrendRadar binary entrypoint.
//! Runs one collection + analysis pass and exits.

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_radar::config::RadarConfig;
use trend_radar::ingest::config::{default_platforms, load_platforms_default};
use trend_radar::ingest::newsnow::NewsNowProvider;
use trend_radar::metrics::Metrics;
use trend_radar::notify::{FeishuNotifier, Notifier};
use trend_radar::{run, RunOutcome};

/// Compact logs by default; JSON lines when RADAR_LOG_JSON=1.
/// Filter comes from RUST_LOG, falling back to `trend_radar=info,warn`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trend_radar=info,warn"));

    let json = std::env::var("RADAR_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env when present; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = RadarConfig::from_env();

    let metrics = match &cfg.metrics_textfile {
        Some(_) => match Metrics::init() {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = ?e, "metrics disabled");
                None
            }
        },
        None => None,
    };

    let platforms = load_platforms_default().unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "platform list unreadable; using built-in list");
        default_platforms()
    });

    let provider = NewsNowProvider::new(cfg.api_base_url.clone(), cfg.backup_api_urls.clone())
        .with_timeout(cfg.request_timeout_secs)
        .with_max_items(cfg.max_results_per_platform);
    let notifier = cfg.webhook_url.clone().map(FeishuNotifier::new);

    let outcome = run(
        &cfg,
        &provider,
        &platforms,
        notifier.as_ref().map(|n| n as &dyn Notifier),
        Path::new("."),
    )
    .await;

    if let (Some(m), Some(path)) = (&metrics, &cfg.metrics_textfile) {
        if let Err(e) = m.write_textfile(path) {
            tracing::warn!(error = ?e, "writing metrics text file failed");
        }
    }

    match outcome {
        RunOutcome::NoData => {
            tracing::error!("no data collected from any platform");
            std::process::exit(2);
        }
        RunOutcome::Completed(summary) => {
            tracing::info!(
                notified = summary.notified,
                html = ?summary.html_path,
                "run complete"
            );
            Ok(())
        }
    }
}
