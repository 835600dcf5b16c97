use std::time::Duration;

use super::client::HttpClient;
use async_trait::async_trait;
use tracing::warn;

/// Plain `reqwest` transport with connect and overall timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(30), Duration::from_secs(10))
    }

    pub fn with_timeouts(timeout: Duration, connect_timeout: Duration) -> Self {
        Self::from_builder(
            reqwest::Client::builder()
                .timeout(timeout)
                .connect_timeout(connect_timeout),
        )
    }

    /// Builds the transport, falling back to a default client if `builder`
    /// is rejected.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Self {
        let client = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "HTTP client build failed, using defaults without timeouts");
            reqwest::Client::new()
        });
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
