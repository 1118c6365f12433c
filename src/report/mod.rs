//! # Report rendering
//! Turns an [`AnalysisResult`] into outbound artifacts: a plain-text chat
//! message and an HTML page. Renderers read nothing but the result.

pub mod html;
pub mod persist;

use serde::Serialize;
use std::fmt::Write as _;

use crate::aggregate::AnalysisResult;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display limits for the chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    /// Keywords listed in the ranking section.
    pub top_keywords: usize,
    /// Headlines listed per detailed keyword.
    pub top_news_per_keyword: usize,
    /// Keywords that get a detail section.
    pub detail_keywords: usize,
    pub platform_rows: usize,
    pub title_preview_chars: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            top_keywords: 20,
            top_news_per_keyword: 8,
            detail_keywords: 5,
            platform_rows: 8,
            title_preview_chars: 60,
        }
    }
}

/// Chat message split into its header lines and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReport {
    pub title: String,
    pub timestamp: String,
    pub report_type: String,
    pub text: String,
}

impl ChatReport {
    /// Flatten into the single text blob sent to the webhook.
    pub fn to_message(&self) -> String {
        format!(
            "{}\n\n{}\n{}\n\n{}",
            self.title, self.timestamp, self.report_type, self.text
        )
    }
}

pub fn render_chat(result: &AnalysisResult, limits: &ReportLimits) -> ChatReport {
    let analysis_time = result.analysis_time.format(TIME_FORMAT).to_string();
    let period = result.window_description();

    if !result.has_matches() {
        return ChatReport {
            title: format!("0 matches | summary {analysis_time}"),
            timestamp: format!("Analysis time: {analysis_time}"),
            report_type: format!("Period: {period}"),
            text: format!("No trending keywords matched.\n\n{}", no_match_suggestions(result)),
        };
    }

    let mut t = String::new();
    let _ = writeln!(t, "Overview");
    let _ = writeln!(t, "Period: {period}");
    let _ = writeln!(t, "- Headlines collected: {}", result.total_items);
    let _ = writeln!(t, "- Headlines matched: {}", result.matched_count);
    let _ = writeln!(t, "- Keywords hit: {}", result.keyword_groups.len());
    let _ = writeln!(t);

    let _ = writeln!(t, "Platforms:");
    for (platform, count) in result.platforms_ranked().into_iter().take(limits.platform_rows) {
        let _ = writeln!(t, "- {platform}: {count}");
    }
    let _ = writeln!(t);

    let _ = writeln!(t, "Keyword ranking:");
    for (i, (keyword, count)) in result.ranking.iter().take(limits.top_keywords).enumerate() {
        let _ = writeln!(t, "{}. **{keyword}** - {count}", i + 1);
    }
    let _ = writeln!(t);

    let _ = write!(t, "Details:");
    for group in result.groups_ranked().take(limits.detail_keywords) {
        let _ = write!(t, "\n\n**{}** ({}):", group.keyword, group.len());
        for (j, item) in group
            .items
            .iter()
            .take(limits.top_news_per_keyword)
            .enumerate()
        {
            let h = &item.headline;
            let _ = write!(
                t,
                "\n  {}. [{}] {} [{}]",
                j + 1,
                h.platform,
                preview(&h.title, limits.title_preview_chars),
                h.rank
            );
        }
    }

    ChatReport {
        title: format!("{} matches | summary {analysis_time}", result.matched_count),
        timestamp: format!("Analysis time: {analysis_time}"),
        report_type: format!("{period} - {} keywords hit", result.keyword_groups.len()),
        text: t,
    }
}

/// Tuning hints shown when nothing matched.
pub fn no_match_suggestions(result: &AnalysisResult) -> String {
    let c = &result.config_summary;
    [
        "Suggestions:".to_string(),
        String::new(),
        "1. Broaden the keyword list".to_string(),
        "   - add more general terms (tech, education, health)".to_string(),
        "   - drop overly specific jargon".to_string(),
        String::new(),
        "2. Review filter words".to_string(),
        format!("   - {} filter words configured", c.filter_words_count),
        "   - make sure they are not over-filtering".to_string(),
        String::new(),
        "3. Review must words".to_string(),
        format!("   - {} must words configured", c.must_words_count),
        "   - every must word has to appear in a title".to_string(),
        String::new(),
        "4. Current configuration".to_string(),
        format!("   - monitored keywords: {}", c.frequency_words_count),
        format!("   - platforms: {}", c.platforms_count),
        format!("   - headlines collected: {}", result.total_items),
        format!("   - rejected by must words: {}", result.rejected_count),
    ]
    .join("\n")
}

/// Truncate to `max` chars, appending "..." when cut.
pub fn preview(title: &str, max: usize) -> String {
    if title.chars().count() > max {
        let mut s: String = title.chars().take(max).collect();
        s.push_str("...");
        s
    } else {
        title.to_string()
    }
}
