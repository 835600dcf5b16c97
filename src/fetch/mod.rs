//! Retrieval of static dataset files from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::LoadError;

/// GETs `url`, treating any non-success status as a failure.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_err = |message: String| LoadError::Fetch {
        location: url.to_string(),
        message,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| fetch_err(e.to_string()))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| fetch_err(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            location: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes().await.map_err(|e| fetch_err(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Loads a data file from an `http(s)` URL or a local path, inflating it
/// when the name ends in `.gz`.
#[tracing::instrument(skip(client), fields(source = %location))]
pub async fn load_source<C: HttpClient>(client: &C, location: &str) -> Result<Vec<u8>, LoadError> {
    let bytes = if is_remote(location) {
        fetch_bytes(client, location).await?
    } else {
        tokio::fs::read(location).await.map_err(|e| LoadError::Io {
            location: location.to_string(),
            message: e.to_string(),
        })?
    };
    debug!(bytes = bytes.len(), "Source loaded");

    if is_gzip(location) {
        return gunzip(&bytes).map_err(|e| LoadError::Io {
            location: location.to_string(),
            message: format!("gzip: {}", e),
        });
    }

    Ok(bytes)
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn is_gzip(location: &str) -> bool {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    path.ends_with(".gz")
}

fn gunzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
