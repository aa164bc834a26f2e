use crate::fetch::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>` on
/// every request, for datasets served behind a token.
pub struct BearerToken<C> {
    pub inner: C,
    header: Option<HeaderValue>,
}

impl<C> BearerToken<C> {
    /// A token that is not a valid header value is dropped and the request
    /// goes out unauthenticated.
    pub fn new(inner: C, token: &str) -> Self {
        let header = HeaderValue::from_str(&format!("Bearer {token}")).ok();
        if header.is_none() {
            tracing::warn!("Dataset token is not a valid header value, ignoring it");
        }
        Self { inner, header }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BearerToken<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        if let Some(value) = &self.header {
            req.headers_mut().insert(AUTHORIZATION, value.clone());
        }
        self.inner.execute(req).await
    }
}
