use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const DAILY_FILE_NAME: &str = "daily_summary.html";
pub const INDEX_FILE_NAME: &str = "index.html";

/// Where the HTML report for `day` goes: `{output_dir}/{YYYY-MM-DD}/html/daily_summary.html`.
pub fn daily_report_path(output_dir: &Path, day: NaiveDate) -> PathBuf {
    output_dir
        .join(day.format("%Y-%m-%d").to_string())
        .join("html")
        .join(DAILY_FILE_NAME)
}

/// Write the page to the dated report path and to `index_dir/index.html`.
/// Returns the dated path.
pub fn save_html_report(
    html: &str,
    output_dir: &Path,
    index_dir: &Path,
    day: NaiveDate,
) -> Result<PathBuf> {
    let daily = daily_report_path(output_dir, day);
    if let Some(parent) = daily.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report dir {}", parent.display()))?;
    }
    fs::write(&daily, html).with_context(|| format!("writing {}", daily.display()))?;

    let index = index_dir.join(INDEX_FILE_NAME);
    fs::write(&index, html).with_context(|| format!("writing {}", index.display()))?;

    tracing::info!(target: "report", path = %daily.display(), "HTML report saved");
    Ok(daily)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_dated_file_and_index() {
        let tmp = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 7, 9).unwrap();
        let out = tmp.path().join("output");

        let p = save_html_report("<html></html>", &out, tmp.path(), day).unwrap();
        assert_eq!(p, out.join("2025-07-09").join("html").join(DAILY_FILE_NAME));
        assert_eq!(fs::read_to_string(&p).unwrap(), "<html></html>");
        assert_eq!(
            fs::read_to_string(tmp.path().join(INDEX_FILE_NAME)).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn unwritable_index_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 7, 9).unwrap();
        let missing = tmp.path().join("does/not/exist");
        assert!(save_html_report("x", tmp.path(), &missing, day).is_err());
    }
}
