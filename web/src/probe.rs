//! HTTP-GET probe transport.
//!
//! Times a full `GET http://<addr>/` round trip instead of a bare TCP
//! connect, which is closer to what a CDN edge actually serves. Any
//! HTTP status counts as reachable — the measurement is about the
//! round trip, not the resource. Connection pooling is disabled so
//! every sample pays for a fresh connection.

use std::time::Duration;

use async_trait::async_trait;
use pingr_common::candidate::Endpoint;
use pingr_core::probe::ProbeTransport;

use crate::fetch::USER_AGENT;

pub struct HttpGetTransport {
    client: reqwest::Client,
    default_port: u16,
}

impl HttpGetTransport {
    pub fn new(default_port: u16) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self {
            client,
            default_port,
        })
    }
}

#[async_trait]
impl ProbeTransport for HttpGetTransport {
    async fn probe_once(&self, endpoint: &Endpoint) -> anyhow::Result<Duration> {
        let url = format!(
            "http://{}:{}/",
            endpoint.addr(),
            endpoint.port_or(self.default_port)
        );
        let started = std::time::Instant::now();
        let response = self.client.get(&url).send().await?;
        let elapsed = started.elapsed();
        drop(response);
        Ok(elapsed)
    }
}
