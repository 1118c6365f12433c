//! # Aggregation
//! Single pass over the collected headlines: classify, bucket by primary
//! keyword, count per platform, rank keywords.
//!
//! Pure and synchronous. The only time dependence is `analysis_time`, which
//! callers can pin with [`Aggregator::aggregate_at`].

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::classify::{classify, Classification};
use crate::ingest::types::Headline;
use crate::keywords::KeywordRuleSet;
use crate::window::TimeWindow;

/// A headline that made it into a keyword group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedItem {
    #[serde(flatten)]
    pub headline: Headline,
    /// Every frequency word found, in configured order; the first one is the group key.
    pub matched_keywords: Vec<String>,
    pub is_filtered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordGroup {
    pub keyword: String,
    /// Ordered by rank ascending; equal ranks keep arrival order.
    pub items: Vec<ClassifiedItem>,
}

impl KeywordGroup {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub frequency_words_count: usize,
    pub filter_words_count: usize,
    pub must_words_count: usize,
    pub platforms_count: usize,
}

/// Everything a renderer needs. Built once per run, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub total_items: usize,
    pub matched_count: usize,
    pub filtered_count: usize,
    /// Titles dropped because a must word was missing (not part of `filtered_count`).
    pub rejected_count: usize,
    pub platform_counts: BTreeMap<String, usize>,
    pub keyword_groups: BTreeMap<String, KeywordGroup>,
    /// `(keyword, count)`, count descending, ties by frequency-list position.
    pub ranking: Vec<(String, usize)>,
    pub analysis_time: NaiveDateTime,
    pub config_summary: ConfigSummary,
    pub window: Option<TimeWindow>,
}

impl AnalysisResult {
    pub fn has_matches(&self) -> bool {
        !self.keyword_groups.is_empty()
    }

    pub fn top_keyword(&self) -> Option<(&str, usize)> {
        self.ranking.first().map(|(k, n)| (k.as_str(), *n))
    }

    /// Groups in ranking order.
    pub fn groups_ranked(&self) -> impl Iterator<Item = &KeywordGroup> + '_ {
        self.ranking
            .iter()
            .filter_map(|(k, _)| self.keyword_groups.get(k))
    }

    /// Platforms by headline count descending, then name.
    pub fn platforms_ranked(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<(&str, usize)> = self
            .platform_counts
            .iter()
            .map(|(p, n)| (p.as_str(), *n))
            .collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    pub fn window_description(&self) -> &str {
        self.window
            .as_ref()
            .map(|w| w.description.as_str())
            .unwrap_or("current snapshot")
    }
}

pub struct Aggregator<'a> {
    rules: &'a KeywordRuleSet,
    window: Option<TimeWindow>,
    platforms_monitored: Option<usize>,
}

impl<'a> Aggregator<'a> {
    pub fn new(rules: &'a KeywordRuleSet) -> Self {
        Self {
            rules,
            window: None,
            platforms_monitored: None,
        }
    }

    /// Attach the resolved window so renderers can describe the period.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Number of configured platforms for the summary (defaults to the
    /// number of platforms that actually delivered headlines).
    pub fn monitoring(mut self, platforms: usize) -> Self {
        self.platforms_monitored = Some(platforms);
        self
    }

    pub fn aggregate(&self, headlines: &[Headline]) -> AnalysisResult {
        self.aggregate_at(headlines, Local::now().naive_local())
    }

    pub fn aggregate_at(
        &self,
        headlines: &[Headline],
        analysis_time: NaiveDateTime,
    ) -> AnalysisResult {
        let mut platform_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut groups: BTreeMap<String, KeywordGroup> = BTreeMap::new();
        let mut matched_count = 0usize;
        let mut filtered_count = 0usize;
        let mut rejected_count = 0usize;

        for h in headlines {
            *platform_counts.entry(h.platform.clone()).or_default() += 1;

            let matches = match classify(&h.title, self.rules) {
                Classification::Filtered => {
                    filtered_count += 1;
                    continue;
                }
                Classification::Rejected => {
                    rejected_count += 1;
                    continue;
                }
                Classification::Evaluated(m) => m,
            };
            let Some(primary) = matches.first().cloned() else {
                continue;
            };

            matched_count += 1;
            groups
                .entry(primary.clone())
                .or_insert_with(|| KeywordGroup {
                    keyword: primary,
                    items: Vec::new(),
                })
                .items
                .push(ClassifiedItem {
                    headline: h.clone(),
                    matched_keywords: matches,
                    is_filtered: false,
                });
        }

        for g in groups.values_mut() {
            g.items.sort_by_key(|it| it.headline.rank);
        }

        let ranking = self.rank(&groups);

        let result = AnalysisResult {
            total_items: headlines.len(),
            matched_count,
            filtered_count,
            rejected_count,
            config_summary: ConfigSummary {
                frequency_words_count: self.rules.frequency_words().len(),
                filter_words_count: self.rules.filter_words().len(),
                must_words_count: self.rules.must_words().len(),
                platforms_count: self.platforms_monitored.unwrap_or(platform_counts.len()),
            },
            platform_counts,
            keyword_groups: groups,
            ranking,
            analysis_time,
            window: self.window.clone(),
        };

        info!(
            target: "aggregate",
            total = result.total_items,
            matched = result.matched_count,
            filtered = result.filtered_count,
            rejected = result.rejected_count,
            keywords = result.keyword_groups.len(),
            "analysis complete"
        );
        result
    }

    fn rank(&self, groups: &BTreeMap<String, KeywordGroup>) -> Vec<(String, usize)> {
        let positions: HashMap<&str, usize> = groups
            .keys()
            .map(|k| (k.as_str(), self.rules.position_of(k).unwrap_or(usize::MAX)))
            .collect();

        let mut ranking: Vec<(String, usize)> =
            groups.values().map(|g| (g.keyword.clone(), g.len())).collect();
        ranking.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| positions[a.0.as_str()].cmp(&positions[b.0.as_str()]))
        });
        ranking
    }
}

/// Aggregate with no window attached and `analysis_time` = now.
pub fn aggregate(headlines: &[Headline], rules: &KeywordRuleSet) -> AnalysisResult {
    Aggregator::new(rules).aggregate(headlines)
}
