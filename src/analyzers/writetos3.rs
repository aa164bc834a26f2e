use std::io::Write;

use anyhow::Context;
use aws_sdk_s3::primitives::ByteStream;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    put_object(client, bucket, key, body, "application/json").await
}

/// Uploads a local file, gzip-compressing it first when `gzip` is set.
///
/// Returns the key actually written (`<key>.gz` when compressed).
pub async fn write_file_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    path: &std::path::Path,
    gzip: bool,
) -> anyhow::Result<String> {
    let contents =
        std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;

    let (body, key) = if gzip {
        (gzip_bytes(&contents)?, format!("{key}.gz"))
    } else {
        (contents, key.to_string())
    };

    put_object(client, bucket, &key, body, "text/csv").await?;
    Ok(key)
}

async fn put_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
) -> anyhow::Result<()> {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type)
        .send()
        .await
        .with_context(|| format!("S3 PutObject failed for s3://{bucket}/{key}"))?;

    Ok(())
}

pub fn gzip_bytes(contents: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents)?;
    encoder.finish()
}
