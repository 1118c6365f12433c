use super::Notifier;
use crate::report::ChatReport;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone)]
pub struct FeishuNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
    backoff_ms: u64,
}

impl FeishuNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_ms: 500,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    /// Base delay before the second attempt; doubles for each further attempt.
    pub fn with_backoff_ms(mut self, ms: u64) -> Self {
        self.backoff_ms = ms;
        self
    }

    async fn backoff(&self, attempt: u8) {
        let ms = self.backoff_ms << (attempt - 1).min(16);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait::async_trait]
impl Notifier for FeishuNotifier {
    async fn send(&self, report: &ChatReport) -> Result<()> {
        let payload = FeishuTextPayload::text(report.to_message());

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.webhook)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            self.backoff(attempt).await;
                            continue;
                        }
                        return Err(anyhow!("Feishu webhook HTTP error: {e}"));
                    }
                    tracing::info!(target: "notify", attempts = attempt, "Feishu message delivered");
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        self.backoff(attempt).await;
                        continue;
                    }
                    return Err(anyhow!("Feishu webhook request failed: {e}"));
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "feishu"
    }
}

#[derive(Debug, Serialize)]
struct FeishuContent {
    text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeishuTextPayload {
    msg_type: &'static str,
    content: FeishuContent,
}

impl FeishuTextPayload {
    pub(crate) fn text(text: String) -> Self {
        Self {
            msg_type: "text",
            content: FeishuContent { text },
        }
    }
}
