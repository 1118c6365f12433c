// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::Platform;

pub const ENV_PLATFORMS_PATH: &str = "RADAR_PLATFORMS_PATH";

/// Built-in platform list: (API id, display name).
pub const DEFAULT_PLATFORMS: &[(&str, &str)] = &[
    ("toutiao", "今日头条"),
    ("baidu", "百度热搜"),
    ("weibo", "微博"),
    ("zhihu", "知乎"),
    ("douyin", "抖音"),
    ("bilibili-hot-search", "bilibili热搜"),
    ("wallstreetcn-hot", "华尔街见闻"),
    ("thepaper", "澎湃新闻"),
    ("cls-hot", "财联社热门"),
    ("ifeng", "凤凰网"),
    ("tieba", "贴吧"),
];

pub fn default_platforms() -> Vec<Platform> {
    DEFAULT_PLATFORMS
        .iter()
        .map(|(id, name)| Platform::new(*id, *name))
        .collect()
}

/// Load platforms from an explicit path. Supports TOML or JSON formats.
pub fn load_platforms_from(path: &Path) -> Result<Vec<Platform>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading platforms from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_platforms(&content, ext.as_str())
}

/// Load platforms using env var + fallbacks:
/// 1) $RADAR_PLATFORMS_PATH
/// 2) config/platforms.toml
/// 3) config/platforms.json
/// 4) built-in list
pub fn load_platforms_default() -> Result<Vec<Platform>> {
    if let Ok(p) = std::env::var(ENV_PLATFORMS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_platforms_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PLATFORMS_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/platforms.toml");
    if toml_p.exists() {
        return load_platforms_from(&toml_p);
    }
    let json_p = PathBuf::from("config/platforms.json");
    if json_p.exists() {
        return load_platforms_from(&json_p);
    }
    Ok(default_platforms())
}

fn parse_platforms(s: &str, hint_ext: &str) -> Result<Vec<Platform>> {
    let try_toml = hint_ext == "toml" || s.contains("[[platforms]]") || s.contains("platforms =");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported platforms format"))
}

fn parse_toml(s: &str) -> Result<Vec<Platform>> {
    #[derive(serde::Deserialize)]
    struct TomlPlatforms {
        platforms: Vec<Platform>,
    }
    let v: TomlPlatforms = toml::from_str(s)?;
    Ok(clean_list(v.platforms))
}

fn parse_json(s: &str) -> Result<Vec<Platform>> {
    let v: Vec<Platform> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Trim, drop entries without an id, keep the first entry per id. Order is kept.
fn clean_list(items: Vec<Platform>) -> Vec<Platform> {
    use std::collections::HashSet;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let id = it.id.trim();
        if id.is_empty() || !seen.insert(id.to_string()) {
            continue;
        }
        let name = match it.name.trim() {
            "" => id,
            n => n,
        };
        out.push(Platform::new(id, name));
    }
    out
}
