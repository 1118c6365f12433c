//! Outbound delivery of the rendered chat report.

pub mod feishu;

pub use feishu::FeishuNotifier;

use crate::report::ChatReport;
use anyhow::Result;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, report: &ChatReport) -> Result<()>;
    fn name(&self) -> &'static str;
}
