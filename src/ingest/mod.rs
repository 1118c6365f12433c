// src/ingest/mod.rs
pub mod config;
pub mod newsnow;
pub mod types;

use crate::ingest::types::{Headline, HeadlineProvider, Platform};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::time::Duration;

/// One-time metrics registration (so series show up in the exposition).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_headlines_total",
            "Headlines kept after title cleaning."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Platforms that failed on every base URL."
        );
        describe_counter!(
            "ingest_backup_used_total",
            "Platforms served by a backup base URL."
        );
        describe_histogram!("ingest_fetch_ms", "Per-platform fetch time in milliseconds.");
        describe_gauge!(
            "ingest_platforms_ok",
            "Platforms that returned at least one headline in the last run."
        );
    });
}

/// Clean a raw feed title: decode entities, drop characters outside CJK
/// ideographs / word chars / basic punctuation, collapse whitespace.
pub fn clean_title(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    // 1) HTML entity decode
    let out = html_escape::decode_html_entities(s).to_string();

    // 2) Drop anything not CJK, word, whitespace or - . ! ? , : ; ( ) [ ] " ' /
    static RE_DISALLOWED: OnceCell<regex::Regex> = OnceCell::new();
    let re_disallowed = RE_DISALLOWED.get_or_init(|| {
        regex::Regex::new(r#"[^\x{4e00}-\x{9fff}\w\s\-.!?,:;()\[\]"'/]"#).unwrap()
    });
    let out = re_disallowed.replace_all(&out, "");

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Fetch every platform in order, pausing `delay` between requests.
/// A failing platform is logged and skipped; it never aborts collection.
pub async fn collect_all(
    provider: &dyn HeadlineProvider,
    platforms: &[Platform],
    delay: Duration,
) -> Vec<Headline> {
    ensure_metrics_described();

    let mut all = Vec::new();
    let mut ok = 0usize;
    for (i, p) in platforms.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match provider.fetch_platform(p).await {
            Ok(items) if items.is_empty() => {
                tracing::warn!(target: "ingest", platform = %p.name, "no headlines returned");
            }
            Ok(mut items) => {
                tracing::info!(target: "ingest", platform = %p.name, count = items.len(), "headlines fetched");
                counter!("ingest_headlines_total").increment(items.len() as u64);
                ok += 1;
                all.append(&mut items);
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, platform = %p.name, provider = provider.name(), "platform fetch failed");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    gauge!("ingest_platforms_ok").set(ok as f64);
    tracing::info!(
        target: "ingest",
        ok,
        platforms = platforms.len(),
        headlines = all.len(),
        "collection finished"
    );
    all
}
