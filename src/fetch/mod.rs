//! Dataset acquisition from a local path, an HTTP(S) URL or S3.

mod api_key;
mod basic;

pub use api_key::BearerToken;
pub use basic::BasicClient;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use tracing::{debug, info};

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Where a dataset lives, decided from the shape of the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(String),
    Http(String),
    S3 { bucket: String, key: String },
}

impl Source {
    pub fn parse(source: &str) -> Result<Self> {
        if let Some(rest) = source.strip_prefix("s3://") {
            let (bucket, key) = rest
                .split_once('/')
                .filter(|(b, k)| !b.is_empty() && !k.is_empty())
                .with_context(|| format!("S3 source '{source}' must look like s3://bucket/key"))?;
            return Ok(Source::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return Ok(Source::Http(source.to_string()));
        }
        Ok(Source::Local(source.to_string()))
    }
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Reads the dataset behind `source`.
///
/// HTTP downloads carry a bearer token when `DATASET_TOKEN` is set. S3
/// reads use the ambient AWS configuration.
#[tracing::instrument]
pub async fn fetch_source(source: &str) -> Result<Vec<u8>> {
    let bytes = match Source::parse(source)? {
        Source::Local(path) => {
            std::fs::read(&path).with_context(|| format!("Failed to read '{path}'"))?
        }
        Source::Http(url) => {
            let client = BasicClient::new(HTTP_TIMEOUT)?;
            match std::env::var("DATASET_TOKEN") {
                Ok(token) if !token.is_empty() => {
                    debug!("Using bearer token for dataset download");
                    fetch_bytes(&BearerToken::new(client, &token), &url).await?
                }
                _ => fetch_bytes(&client, &url).await?,
            }
        }
        Source::S3 { bucket, key } => {
            let config = aws_config::load_from_env().await;
            let s3 = aws_sdk_s3::Client::new(&config);
            let object = s3
                .get_object()
                .bucket(&bucket)
                .key(&key)
                .send()
                .await
                .with_context(|| format!("S3 GetObject failed for s3://{bucket}/{key}"))?;
            object.body.collect().await?.into_bytes().to_vec()
        }
    };

    info!(bytes = bytes.len(), "Dataset loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_source() {
        assert_eq!(
            Source::parse("s3://raw-data/stats/players.csv").unwrap(),
            Source::S3 {
                bucket: "raw-data".into(),
                key: "stats/players.csv".into(),
            }
        );
    }

    #[test]
    fn test_parse_s3_source_requires_key() {
        assert!(Source::parse("s3://raw-data").is_err());
        assert!(Source::parse("s3://raw-data/").is_err());
        assert!(Source::parse("s3:///players.csv").is_err());
    }

    #[test]
    fn test_parse_http_and_local_sources() {
        assert_eq!(
            Source::parse("https://example.org/p.csv").unwrap(),
            Source::Http("https://example.org/p.csv".into())
        );
        assert_eq!(
            Source::parse("data/players.csv").unwrap(),
            Source::Local("data/players.csv".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.csv");
        std::fs::write(&path, "Name\nx\n").unwrap();

        let bytes = fetch_source(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"Name\nx\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_local_file() {
        assert!(fetch_source("/nonexistent/players.csv").await.is_err());
    }
}
