//! Run configuration, built once from the environment and passed explicitly.
//!
//! Every setting has a default; a value that fails to parse is logged and the
//! default is used instead. Nothing here aborts a run.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::ingest::newsnow::{DEFAULT_API_BASE_URL, DEFAULT_BACKUP_API_URLS, DEFAULT_MAX_ITEMS};
use crate::keywords::DEFAULT_KEYWORDS_PATH;
use crate::report::ReportLimits;
use crate::window::TimeConfig;

pub const ENV_WEBHOOK_URL: &str = "FEISHU_WEBHOOK_URL";
pub const ENV_CONTINUE_WITHOUT_WEBHOOK: &str = "CONTINUE_WITHOUT_WEBHOOK";
pub const ENV_HISTORY_DAYS: &str = "HISTORY_DAYS";
pub const ENV_HISTORY_HOURS: &str = "HISTORY_HOURS";
pub const ENV_CUSTOM_START_DATE: &str = "CUSTOM_START_DATE";
pub const ENV_CUSTOM_END_DATE: &str = "CUSTOM_END_DATE";
pub const ENV_KEYWORDS_PATH: &str = "KEYWORDS_PATH";
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_BACKUP_API_URLS: &str = "BACKUP_API_URLS";
pub const ENV_MAX_RESULTS_PER_PLATFORM: &str = "MAX_RESULTS_PER_PLATFORM";
pub const ENV_REQUEST_DELAY_MS: &str = "REQUEST_DELAY_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const ENV_TOP_KEYWORDS_LIMIT: &str = "TOP_KEYWORDS_LIMIT";
pub const ENV_TOP_NEWS_PER_KEYWORD: &str = "TOP_NEWS_PER_KEYWORD";
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const ENV_METRICS_TEXTFILE: &str = "METRICS_TEXTFILE";

#[derive(Debug, Clone, PartialEq)]
pub struct RadarConfig {
    pub time: TimeConfig,
    pub keywords_path: PathBuf,
    pub webhook_url: Option<String>,
    /// When false and no webhook is configured, the run stops after analysis.
    pub continue_without_webhook: bool,
    pub api_base_url: String,
    pub backup_api_urls: Vec<String>,
    pub max_results_per_platform: usize,
    pub request_delay: Duration,
    pub request_timeout_secs: u64,
    pub report: ReportLimits,
    pub output_dir: PathBuf,
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            time: TimeConfig::default(),
            keywords_path: PathBuf::from(DEFAULT_KEYWORDS_PATH),
            webhook_url: None,
            continue_without_webhook: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            backup_api_urls: DEFAULT_BACKUP_API_URLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_results_per_platform: DEFAULT_MAX_ITEMS,
            request_delay: Duration::from_millis(300),
            request_timeout_secs: 15,
            report: ReportLimits::default(),
            output_dir: PathBuf::from("output"),
            metrics_textfile: None,
        }
    }
}

impl RadarConfig {
    /// Read from process environment (call `dotenvy::dotenv()` first to pick up `.env`).
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key → value lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let d = Self::default();

        let backup_api_urls = match get(ENV_BACKUP_API_URLS) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => d.backup_api_urls,
        };

        Self {
            time: TimeConfig {
                start_date: get(ENV_CUSTOM_START_DATE),
                end_date: get(ENV_CUSTOM_END_DATE),
                days: parse_or(&get, ENV_HISTORY_DAYS, d.time.days),
                hours: parse_or(&get, ENV_HISTORY_HOURS, d.time.hours),
            },
            keywords_path: get(ENV_KEYWORDS_PATH)
                .map(PathBuf::from)
                .unwrap_or(d.keywords_path),
            webhook_url: get(ENV_WEBHOOK_URL),
            continue_without_webhook: parse_bool_or(
                &get,
                ENV_CONTINUE_WITHOUT_WEBHOOK,
                d.continue_without_webhook,
            ),
            api_base_url: get(ENV_API_BASE_URL).unwrap_or(d.api_base_url),
            backup_api_urls,
            max_results_per_platform: positive_or(
                parse_or(&get, ENV_MAX_RESULTS_PER_PLATFORM, d.max_results_per_platform),
                ENV_MAX_RESULTS_PER_PLATFORM,
                d.max_results_per_platform,
            ),
            request_delay: Duration::from_millis(parse_or(
                &get,
                ENV_REQUEST_DELAY_MS,
                d.request_delay.as_millis() as u64,
            )),
            request_timeout_secs: parse_or(
                &get,
                ENV_REQUEST_TIMEOUT_SECS,
                d.request_timeout_secs,
            ),
            report: ReportLimits {
                top_keywords: parse_or(&get, ENV_TOP_KEYWORDS_LIMIT, d.report.top_keywords),
                top_news_per_keyword: parse_or(
                    &get,
                    ENV_TOP_NEWS_PER_KEYWORD,
                    d.report.top_news_per_keyword,
                ),
                ..d.report
            },
            output_dir: get(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or(d.output_dir),
            metrics_textfile: get(ENV_METRICS_TEXTFILE).map(PathBuf::from),
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(target: "config", key, value = %raw, error = %e, "invalid setting; using default");
            default
        }),
    }
}

/// Zero would yield no headlines at all; treat it as unset.
fn positive_or(value: usize, key: &str, default: usize) -> usize {
    if value == 0 {
        warn!(target: "config", key, "setting must be positive; using default");
        default
    } else {
        value
    }
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> bool
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_ascii_lowercase()) {
        None => default,
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                warn!(target: "config", key, value = %v, "invalid boolean; using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> RadarConfig {
        let m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RadarConfig::from_lookup(|k| m.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(cfg(&[]), RadarConfig::default());
    }

    #[test]
    fn reads_time_and_webhook_settings() {
        let c = cfg(&[
            (ENV_HISTORY_DAYS, "7"),
            (ENV_HISTORY_HOURS, "12"),
            (ENV_CUSTOM_START_DATE, "2024-01-01"),
            (ENV_CUSTOM_END_DATE, " "),
            (ENV_WEBHOOK_URL, "https://hook.test/x"),
            (ENV_CONTINUE_WITHOUT_WEBHOOK, "false"),
        ]);
        assert_eq!(c.time.days, 7);
        assert_eq!(c.time.hours, 12);
        assert_eq!(c.time.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(c.time.end_date, None);
        assert_eq!(c.webhook_url.as_deref(), Some("https://hook.test/x"));
        assert!(!c.continue_without_webhook);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let c = cfg(&[
            (ENV_HISTORY_DAYS, "three"),
            (ENV_MAX_RESULTS_PER_PLATFORM, "-5"),
            (ENV_CONTINUE_WITHOUT_WEBHOOK, "maybe"),
        ]);
        assert_eq!(c.time.days, 1);
        assert_eq!(c.max_results_per_platform, DEFAULT_MAX_ITEMS);
        assert!(c.continue_without_webhook);
    }

    #[test]
    fn zero_results_per_platform_uses_default() {
        let c = cfg(&[(ENV_MAX_RESULTS_PER_PLATFORM, "0")]);
        assert_eq!(c.max_results_per_platform, DEFAULT_MAX_ITEMS);
        let c = cfg(&[(ENV_MAX_RESULTS_PER_PLATFORM, "10")]);
        assert_eq!(c.max_results_per_platform, 10);
    }

    #[test]
    fn backup_urls_are_comma_separated() {
        let c = cfg(&[(ENV_BACKUP_API_URLS, "https://a/api, ,https://b/api ")]);
        assert_eq!(c.backup_api_urls, vec!["https://a/api", "https://b/api"]);
    }

    #[test]
    fn report_limits_and_paths() {
        let c = cfg(&[
            (ENV_TOP_KEYWORDS_LIMIT, "5"),
            (ENV_TOP_NEWS_PER_KEYWORD, "2"),
            (ENV_OUTPUT_DIR, "/tmp/radar"),
            (ENV_METRICS_TEXTFILE, "/tmp/radar.prom"),
            (ENV_REQUEST_DELAY_MS, "0"),
        ]);
        assert_eq!(c.report.top_keywords, 5);
        assert_eq!(c.report.top_news_per_keyword, 2);
        assert_eq!(c.report.detail_keywords, 5);
        assert_eq!(c.output_dir, PathBuf::from("/tmp/radar"));
        assert_eq!(c.metrics_textfile, Some(PathBuf::from("/tmp/radar.prom")));
        assert!(c.request_delay.is_zero());
    }
}
