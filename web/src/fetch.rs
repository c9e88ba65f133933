//! HTTP implementation of the source-reader seam.
//!
//! Some of the built-in sources sniff for browsers, so requests carry
//! a desktop User-Agent. One client is shared across all fetches; the
//! per-request timeout bounds how long a dead source can stall the
//! aggregation stage.

use std::time::Duration;

use async_trait::async_trait;
use pingr_common::source::{SourceDescriptor, SourceReader};
use tracing::debug;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

pub struct HttpSourceReader {
    client: reqwest::Client,
}

impl HttpSourceReader {
    pub fn new(fetch_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(fetch_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceReader for HttpSourceReader {
    async fn fetch(&self, source: &SourceDescriptor) -> anyhow::Result<String> {
        let response = self.client.get(&source.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("'{}' answered {status}", source.tag);
        }

        let body = response.text().await?;
        debug!("fetched {} bytes from '{}'", body.len(), source.tag);
        Ok(body)
    }
}
