// tests/run_pipeline.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Local;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use trend_radar::engine::RunSummary;
use trend_radar::notify::Notifier;
use trend_radar::report::persist::INDEX_FILE_NAME;
use trend_radar::report::ChatReport;
use trend_radar::{run, Headline, HeadlineProvider, Platform, RadarConfig, RunOutcome};

struct FixtureProvider {
    feeds: HashMap<&'static str, Vec<&'static str>>,
}

#[async_trait]
impl HeadlineProvider for FixtureProvider {
    async fn fetch_platform(&self, p: &Platform) -> Result<Vec<Headline>> {
        let titles = self
            .feeds
            .get(p.id.as_str())
            .ok_or_else(|| anyhow!("unknown platform {}", p.id))?;
        Ok(titles
            .iter()
            .enumerate()
            .map(|(i, t)| Headline {
                title: t.to_string(),
                url: format!("https://{}.test/{i}", p.id),
                rank: (i + 1) as u32,
                platform: p.name.clone(),
                collected_at: Local::now().naive_local(),
            })
            .collect())
    }
    fn name(&self) -> &'static str {
        "fixture"
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, report: &ChatReport) -> Result<()> {
        if self.fail {
            return Err(anyhow!("webhook down"));
        }
        self.sent.lock().unwrap().push(report.to_message());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

fn provider() -> FixtureProvider {
    let mut feeds = HashMap::new();
    feeds.insert("weibo", vec!["AI 芯片发布", "股市 大涨", "明星 广告 代言"]);
    feeds.insert("zhihu", vec!["如何看待 AI 教育", "天气 晴"]);
    FixtureProvider { feeds }
}

fn platforms() -> Vec<Platform> {
    vec![
        Platform::new("weibo", "微博"),
        Platform::new("zhihu", "知乎"),
        Platform::new("missing", "不存在"),
    ]
}

fn config(dir: &std::path::Path) -> RadarConfig {
    let kw = dir.join("frequency_words.txt");
    std::fs::write(&kw, "AI\n股市\n教育\n!广告\n").unwrap();
    RadarConfig {
        keywords_path: kw,
        output_dir: dir.join("output"),
        request_delay: Duration::ZERO,
        ..RadarConfig::default()
    }
}

fn completed(outcome: RunOutcome) -> RunSummary {
    match outcome {
        RunOutcome::Completed(s) => *s,
        RunOutcome::NoData => panic!("expected a completed run"),
    }
}

#[tokio::test]
async fn full_run_notifies_and_writes_html() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config(tmp.path());
    let notifier = RecordingNotifier::default();

    let s = completed(run(&cfg, &provider(), &platforms(), Some(&notifier), tmp.path()).await);

    assert_eq!(s.result.total_items, 5);
    assert_eq!(s.result.filtered_count, 1);
    assert_eq!(s.result.matched_count, 3);
    assert_eq!(s.result.top_keyword(), Some(("AI", 2)));
    assert_eq!(s.result.config_summary.platforms_count, 3);
    assert_eq!(s.result.window_description(), "past 1 days 0 hours");

    assert!(s.notified);
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("1. **AI** - 2"));

    let html_path = s.html_path.expect("html written");
    assert!(html_path.starts_with(tmp.path().join("output")));
    let page = std::fs::read_to_string(&html_path).unwrap();
    assert!(page.contains("AI (2)"));
    assert_eq!(
        std::fs::read_to_string(tmp.path().join(INDEX_FILE_NAME)).unwrap(),
        page
    );
}

#[tokio::test]
async fn webhook_failure_does_not_stop_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config(tmp.path());
    let notifier = RecordingNotifier {
        fail: true,
        ..Default::default()
    };

    let s = completed(run(&cfg, &provider(), &platforms(), Some(&notifier), tmp.path()).await);
    assert!(!s.notified);
    assert!(s.html_path.is_some());
}

#[tokio::test]
async fn no_webhook_and_no_continue_skips_html() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = RadarConfig {
        continue_without_webhook: false,
        ..config(tmp.path())
    };

    let s = completed(run(&cfg, &provider(), &platforms(), None, tmp.path()).await);
    assert_eq!(s.result.matched_count, 3);
    assert!(!s.notified);
    assert!(s.html_path.is_none());
    assert!(!tmp.path().join(INDEX_FILE_NAME).exists());
}

#[tokio::test]
async fn empty_collection_is_no_data() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config(tmp.path());
    let empty = FixtureProvider {
        feeds: HashMap::new(),
    };

    let out = run(&cfg, &empty, &platforms(), None, tmp.path()).await;
    assert!(matches!(out, RunOutcome::NoData));
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn missing_keyword_file_uses_builtin_list() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = RadarConfig {
        keywords_path: tmp.path().join("nope.txt"),
        ..config(tmp.path())
    };

    let s = completed(run(&cfg, &provider(), &platforms(), None, tmp.path()).await);
    // 广告 is no longer a filter word with the built-in list
    assert_eq!(s.result.filtered_count, 0);
    assert_eq!(s.result.keyword_groups["AI"].len(), 2);
    assert_eq!(s.result.keyword_groups["股市"].len(), 1);
}
