use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use super::{no_match_suggestions, TIME_FORMAT};
use crate::aggregate::AnalysisResult;

/// Keyword cards shown on the page.
pub const HTML_TOP_KEYWORDS: usize = 12;
/// Headlines per keyword card.
pub const HTML_ITEMS_PER_KEYWORD: usize = 5;
/// Ranks at or above this position get the highlighted tag.
const HIGH_RANK: u32 = 5;

const STYLE: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif; margin: 0; padding: 20px; background: #f5f7fa; }
        .container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 12px; box-shadow: 0 4px 20px rgba(0,0,0,0.1); overflow: hidden; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; }
        .header h1 { margin: 0; font-size: 2.5em; }
        .header p { margin: 10px 0 0; opacity: 0.9; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; padding: 30px; background: #f8f9ff; }
        .stat-card { background: white; padding: 20px; border-radius: 10px; text-align: center; }
        .stat-number { font-size: 2.5em; font-weight: bold; color: #667eea; }
        .stat-label { color: #666; font-size: 0.9em; }
        .content { padding: 30px; }
        .keyword-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 20px; }
        .keyword-card { border: 1px solid #e1e5e9; border-radius: 8px; padding: 20px; }
        .keyword-title { font-size: 1.3em; font-weight: bold; color: #667eea; margin-bottom: 15px; }
        .news-item { margin: 10px 0; padding: 10px; background: #f8f9fa; border-radius: 5px; border-left: 4px solid #667eea; }
        .news-item a { text-decoration: none; color: #333; }
        .platform-tag { display: inline-block; padding: 2px 8px; border-radius: 12px; font-size: 0.8em; }
        .rank-high { background: #ffebee; color: #c62828; }
        .rank-normal { background: #f3e5f5; color: #7b1fa2; }
        .footer { text-align: center; padding: 20px; background: #f5f7fa; color: #666; }
        .no-data { text-align: center; padding: 60px 20px; color: #666; }
        .suggestion { background: #fff3cd; border: 1px solid #ffeaa7; border-radius: 8px; padding: 20px; margin: 20px 0; text-align: left; }
"#;

pub fn render_html(result: &AnalysisResult) -> String {
    let mut h = String::with_capacity(16 * 1024);
    let analysis_time = result.analysis_time.format(TIME_FORMAT).to_string();

    let _ = write!(
        h,
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>TrendRadar - trending keyword report</title>
    <style>{STYLE}</style>
</head>
<body>
<div class="container">
    <div class="header">
        <h1>TrendRadar</h1>
        <p>{}</p>
    </div>
    <div class="stats">
"#,
        encode_text(result.window_description())
    );

    for (number, label) in [
        (result.total_items, "Headlines collected"),
        (result.matched_count, "Headlines matched"),
        (result.keyword_groups.len(), "Keywords hit"),
        (result.config_summary.platforms_count, "Platforms monitored"),
    ] {
        let _ = write!(
            h,
            r#"        <div class="stat-card"><div class="stat-number">{number}</div><div class="stat-label">{label}</div></div>
"#
        );
    }
    h.push_str("    </div>\n    <div class=\"content\">\n");

    if result.has_matches() {
        h.push_str("        <h2>Keyword ranking</h2>\n        <div class=\"keyword-grid\">\n");
        for group in result.groups_ranked().take(HTML_TOP_KEYWORDS) {
            let _ = write!(
                h,
                "            <div class=\"keyword-card\">\n                <div class=\"keyword-title\">{} ({})</div>\n",
                encode_text(&group.keyword),
                group.len()
            );
            for item in group.items.iter().take(HTML_ITEMS_PER_KEYWORD) {
                let hd = &item.headline;
                let rank_class = if hd.rank <= HIGH_RANK {
                    "rank-high"
                } else {
                    "rank-normal"
                };
                let href = if hd.url.is_empty() { "#" } else { hd.url.as_str() };
                let _ = write!(
                    h,
                    r#"                <div class="news-item">
                    <span class="platform-tag {rank_class}">{} #{}</span><br>
                    <a href="{}" target="_blank" rel="noopener">{}</a>
                </div>
"#,
                    encode_text(&hd.platform),
                    hd.rank,
                    encode_double_quoted_attribute(href),
                    encode_text(&hd.title)
                );
            }
            h.push_str("            </div>\n");
        }
        h.push_str("        </div>\n");
    } else {
        let _ = write!(
            h,
            r#"        <div class="no-data">
            <h3>No trending keywords matched</h3>
            <div class="suggestion"><pre style="white-space: pre-line;">{}</pre></div>
        </div>
"#,
            encode_text(&no_match_suggestions(result))
        );
    }

    let _ = write!(
        h,
        r#"    </div>
    <div class="footer">
        <p>Analysis time: {analysis_time} | {} keywords, {} platforms</p>
    </div>
</div>
</body>
</html>
"#,
        result.config_summary.frequency_words_count,
        result.config_summary.platforms_count
    );
    h
}
