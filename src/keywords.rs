//! Keyword rules loaded from one line-oriented text file.
//!
//! Line prefixes:
//! - `#` or blank → comment, ignored
//! - `!word`      → filter word (title is dropped when it contains it)
//! - `+word`      → must word (all of them must be contained)
//! - `word`       → frequency word (monitored keyword, order matters)
//!
//! A bare `!` or `+` line is skipped with a warning rather than added as an
//! empty word, which would filter (or must-match) every title.
//!
//! Matching is case-insensitive substring containment. The lowercased forms
//! are precomputed once so classification does not re-fold every word per title.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_KEYWORDS_PATH: &str = "frequency_words.txt";

/// Used when the keyword file cannot be read, so a run still has something to report.
pub const FALLBACK_FREQUENCY_WORDS: &[&str] =
    &["AI", "人工智能", "股市", "房价", "新能源", "教育", "就业"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordRuleSet {
    frequency_words: Vec<String>,
    filter_words: Vec<String>,
    must_words: Vec<String>,
    #[serde(skip)]
    folded: Folded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Folded {
    frequency: Vec<String>,
    filter: Vec<String>,
    must: Vec<String>,
}

fn fold_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

impl KeywordRuleSet {
    /// Build directly from the three lists (tests, programmatic use).
    pub fn new(frequency: Vec<String>, filter: Vec<String>, must: Vec<String>) -> Self {
        let folded = Folded {
            frequency: fold_all(&frequency),
            filter: fold_all(&filter),
            must: fold_all(&must),
        };
        Self {
            frequency_words: frequency,
            filter_words: filter,
            must_words: must,
            folded,
        }
    }

    /// Parse the keyword text format.
    pub fn from_lines(source: &str) -> Self {
        let mut frequency = Vec::new();
        let mut filter = Vec::new();
        let mut must = Vec::new();

        for (lineno, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (list, word) = if let Some(rest) = line.strip_prefix('!') {
                (&mut filter, rest.trim())
            } else if let Some(rest) = line.strip_prefix('+') {
                (&mut must, rest.trim())
            } else {
                (&mut frequency, line)
            };
            if word.is_empty() {
                warn!(target: "keywords", line = lineno + 1, "prefix without a word; skipping");
                continue;
            }
            list.push(word.to_string());
        }

        Self::new(frequency, filter, must)
    }

    /// Read and parse `path`. An unreadable file is a recovered condition:
    /// the fallback frequency list is used with no filter or must words.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let rules = Self::from_lines(&content);
                info!(
                    target: "keywords",
                    path = %path.display(),
                    frequency = rules.frequency_words.len(),
                    filter = rules.filter_words.len(),
                    must = rules.must_words.len(),
                    "keyword rules loaded"
                );
                rules
            }
            Err(e) => {
                warn!(target: "keywords", path = %path.display(), error = %e,
                    "keyword file unreadable; using built-in keywords");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self::new(
            FALLBACK_FREQUENCY_WORDS.iter().map(|s| s.to_string()).collect(),
            Vec::new(),
            Vec::new(),
        )
    }

    pub fn frequency_words(&self) -> &[String] {
        &self.frequency_words
    }

    pub fn filter_words(&self) -> &[String] {
        &self.filter_words
    }

    pub fn must_words(&self) -> &[String] {
        &self.must_words
    }

    /// First position of `keyword` in the frequency list (ranking tie-break).
    pub fn position_of(&self, keyword: &str) -> Option<usize> {
        self.frequency_words.iter().position(|w| w == keyword)
    }

    pub(crate) fn folded_filter(&self) -> &[String] {
        &self.folded.filter
    }

    pub(crate) fn folded_must(&self) -> &[String] {
        &self.folded.must
    }

    /// Pairs of (original word, lowercased word) in configured order.
    pub(crate) fn frequency_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.frequency_words
            .iter()
            .zip(self.folded.frequency.iter())
            .map(|(o, f)| (o.as_str(), f.as_str()))
    }
}
