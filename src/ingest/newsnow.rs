use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use metrics::{counter, histogram};
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::ingest::clean_title;
use crate::ingest::types::{Headline, HeadlineProvider, Platform};

pub const DEFAULT_API_BASE_URL: &str = "https://newsnow.busiyi.world/api/news";
pub const DEFAULT_BACKUP_API_URLS: &[&str] = &[
    "https://api.newsnow.cc/api/news",
    "https://newsnow.busiyi.world/api/news",
    "https://newsnow.cc/api/news",
];
pub const DEFAULT_MAX_ITEMS: usize = 50;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REFERER_URL: &str = "https://newsnow.cc/";

/// Pulls `GET {base}/{platform_id}` from a newsnow-compatible API.
/// The primary base URL is tried first, then each backup in order.
#[derive(Clone)]
pub struct NewsNowProvider {
    base_urls: Vec<String>,
    client: Client,
    timeout: Duration,
    max_items: usize,
}

impl NewsNowProvider {
    pub fn new(primary: impl Into<String>, backups: Vec<String>) -> Self {
        let mut base_urls: Vec<String> = Vec::with_capacity(backups.len() + 1);
        for u in std::iter::once(primary.into()).chain(backups) {
            let u = u.trim().trim_end_matches('/').to_string();
            if !u.is_empty() && !base_urls.contains(&u) {
                base_urls.push(u);
            }
        }
        Self {
            base_urls,
            client: Client::new(),
            timeout: Duration::from_secs(15),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    /// Deduplicated base URLs in the order they are tried.
    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    async fn fetch_from(&self, base: &str, platform: &Platform) -> Result<Vec<Headline>> {
        let url = format!("{base}/{}", platform.id);
        let rsp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(USER_AGENT, BROWSER_UA)
            .header(ACCEPT, "application/json")
            .header(REFERER, REFERER_URL)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} non-2xx"))?;
        let body = rsp.text().await.context("reading feed body")?;
        parse_feed(&body, platform, self.max_items, Local::now().naive_local())
    }
}

#[async_trait]
impl HeadlineProvider for NewsNowProvider {
    async fn fetch_platform(&self, platform: &Platform) -> Result<Vec<Headline>> {
        let t0 = std::time::Instant::now();
        let mut last_err = None;

        for (i, base) in self.base_urls.iter().enumerate() {
            match self.fetch_from(base, platform).await {
                Ok(items) => {
                    if i > 0 {
                        tracing::info!(target: "ingest", platform = %platform.id, base = %base, "served by backup base URL");
                        counter!("ingest_backup_used_total").increment(1);
                    }
                    histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                    return Ok(items);
                }
                Err(e) => {
                    tracing::debug!(target: "ingest", platform = %platform.id, base = %base, error = ?e, "base URL failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e.context(format!(
                "all {} base URLs failed for {}",
                self.base_urls.len(),
                platform.id
            ))),
            None => Err(anyhow!("no base URL configured")),
        }
    }

    fn name(&self) -> &'static str {
        "newsnow"
    }
}

/// Decode one feed body. Accepts `{"data": [...]}`, `{"list": [...]}` or a bare array.
/// Rank is the 1-based position among the first `max_items` entries; entries whose
/// cleaned title is empty are dropped without renumbering the rest.
pub fn parse_feed(
    body: &str,
    platform: &Platform,
    max_items: usize,
    collected_at: NaiveDateTime,
) -> Result<Vec<Headline>> {
    let v: Value = serde_json::from_str(body).context("decoding feed json")?;
    let items: &[Value] = match &v {
        Value::Object(m) => m
            .get("data")
            .or_else(|| m.get("list"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        Value::Array(a) => a.as_slice(),
        _ => {
            tracing::debug!(target: "ingest", platform = %platform.id, "feed body is neither object nor array");
            &[]
        }
    };

    let mut out = Vec::with_capacity(items.len().min(max_items));
    for (i, item) in items.iter().take(max_items).enumerate() {
        let title = clean_title(text_field(item, &["title", "name"]).trim());
        if title.is_empty() {
            continue;
        }
        out.push(Headline {
            title,
            url: text_field(item, &["url", "link"]),
            rank: (i + 1) as u32,
            platform: platform.name.clone(),
            collected_at,
        });
    }
    Ok(out)
}

/// First present, non-null field among `keys`, rendered as text.
fn text_field(item: &Value, keys: &[&str]) -> String {
    for k in keys {
        match item.get(*k) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
        }
    }
    String::new()
}
