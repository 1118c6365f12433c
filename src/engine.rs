//! # Run pipeline
//! One invocation end to end: window → rules → collect → aggregate → render →
//! notify → persist.
//!
//! Only an empty collection stops the run early ([`RunOutcome::NoData`]).
//! Webhook and disk failures are logged and never change the analysis.

use metrics::counter;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::aggregate::{AnalysisResult, Aggregator};
use crate::config::RadarConfig;
use crate::ingest::collect_all;
use crate::ingest::types::{HeadlineProvider, Platform};
use crate::keywords::KeywordRuleSet;
use crate::notify::Notifier;
use crate::report::html::render_html;
use crate::report::persist::save_html_report;
use crate::report::{render_chat, ChatReport};
use crate::window;

#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing was collected from any platform; no result was produced.
    NoData,
    Completed(Box<RunSummary>),
}

#[derive(Debug)]
pub struct RunSummary {
    pub result: AnalysisResult,
    pub chat: ChatReport,
    /// True when a notifier accepted the message.
    pub notified: bool,
    /// Dated HTML path, when the page was written.
    pub html_path: Option<PathBuf>,
}

/// Execute one run. `index_dir` receives the copy of the page as `index.html`.
pub async fn run(
    cfg: &RadarConfig,
    provider: &dyn HeadlineProvider,
    platforms: &[Platform],
    notifier: Option<&dyn Notifier>,
    index_dir: &Path,
) -> RunOutcome {
    let window = window::resolve(&cfg.time);
    let rules = KeywordRuleSet::load_from_path(&cfg.keywords_path);
    info!(
        target: "engine",
        mode = window.mode.as_str(),
        period = %window.description,
        keywords = rules.frequency_words().len(),
        platforms = platforms.len(),
        "starting run"
    );

    let headlines = collect_all(provider, platforms, cfg.request_delay).await;
    if headlines.is_empty() {
        error!(target: "engine", "no headlines collected; stopping");
        counter!("radar_runs_total", "outcome" => "no_data").increment(1);
        return RunOutcome::NoData;
    }

    let result = Aggregator::new(&rules)
        .with_window(window)
        .monitoring(platforms.len())
        .aggregate(&headlines);
    counter!("radar_matched_total").increment(result.matched_count as u64);
    counter!("radar_filtered_total").increment(result.filtered_count as u64);

    let chat = render_chat(&result, &cfg.report);

    let notified = match notifier {
        Some(n) => match n.send(&chat).await {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "engine", notifier = n.name(), error = ?e, "notification failed");
                false
            }
        },
        None if !cfg.continue_without_webhook => {
            warn!(target: "engine", "no webhook configured and continuing without one is disabled");
            counter!("radar_runs_total", "outcome" => "stopped").increment(1);
            return RunOutcome::Completed(Box::new(RunSummary {
                result,
                chat,
                notified: false,
                html_path: None,
            }));
        }
        None => {
            info!(target: "engine", "no webhook configured; skipping notification");
            false
        }
    };

    let page = render_html(&result);
    let html_path = match save_html_report(
        &page,
        &cfg.output_dir,
        index_dir,
        result.analysis_time.date(),
    ) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!(target: "engine", error = ?e, "saving HTML report failed");
            None
        }
    };

    log_summary(&result);
    counter!("radar_runs_total", "outcome" => "completed").increment(1);

    RunOutcome::Completed(Box::new(RunSummary {
        result,
        chat,
        notified,
        html_path,
    }))
}

fn log_summary(r: &AnalysisResult) {
    let (top, top_count) = r.top_keyword().unwrap_or(("-", 0));
    info!(
        target: "engine",
        collected = r.total_items,
        matched = r.matched_count,
        filtered = r.filtered_count,
        keywords = r.keyword_groups.len(),
        top_keyword = top,
        top_count,
        "run summary"
    );
}
