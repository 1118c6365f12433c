// src/ingest/types.rs
use anyhow::Result;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Headline {
    pub title: String,    // cleaned title
    pub url: String,      // may be empty when the feed omits it
    pub rank: u32,        // 1-based position in the platform feed
    pub platform: String, // display name, e.g. "微博"
    pub collected_at: NaiveDateTime,
}

/// One monitored feed: `id` is the path segment on the API, `name` is shown in reports.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Platform {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Platform {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait HeadlineProvider: Send + Sync {
    async fn fetch_platform(&self, platform: &Platform) -> Result<Vec<Headline>>;
    fn name(&self) -> &'static str;
}
