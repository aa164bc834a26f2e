use std::time::Duration;

use super::HttpClient;
use async_trait::async_trait;

const USER_AGENT: &str = concat!("player_tier_rater/", env!("CARGO_PKG_VERSION"));

/// Plain `reqwest` client used for unauthenticated dataset downloads.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
