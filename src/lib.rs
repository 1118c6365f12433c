// src/lib.rs
// Public library surface for the binary and integration tests.

// Core: time window, keyword rules, classification, aggregation
pub mod aggregate;
pub mod classify;
pub mod keywords;
pub mod window;

// I/O shell around the core
pub mod config;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{aggregate, AnalysisResult, Aggregator, KeywordGroup};
pub use crate::classify::{classify, Classification};
pub use crate::config::RadarConfig;
pub use crate::engine::{run, RunOutcome};
pub use crate::ingest::types::{Headline, HeadlineProvider, Platform};
pub use crate::keywords::KeywordRuleSet;
pub use crate::window::{resolve, TimeConfig, TimeWindow, WindowMode};
