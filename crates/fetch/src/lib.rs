//! Shelf fetch: catalog sources behind the `CatalogSource` seam.
//!
//! `HttpSource` performs the single GET against the products endpoint;
//! `FileSource` reads the same JSON array from disk for offline use.
//! Both share [`decode_body`], so they fail the same way on a bad body.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use shelf_core::{CatalogSource, LoadError};
use tracing::{debug, info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.escuelajs.co/api/v1/products";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Decode a response body into raw records. Anything but a top-level JSON array aborts the load.
pub fn decode_body(bytes: &[u8]) -> Result<Vec<serde_json::Value>, LoadError> {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Array(items)) => Ok(items),
        Ok(other) => {
            let kind = match other {
                serde_json::Value::Object(_) => "object",
                serde_json::Value::String(_) => "string",
                serde_json::Value::Number(_) => "number",
                serde_json::Value::Bool(_) => "bool",
                _ => "null",
            };
            Err(LoadError::Decode(format!("expected a JSON array of products, got {}", kind)))
        }
        Err(e) => Err(LoadError::Decode(e.to_string())),
    }
}

/// One-shot HTTP source for the products endpoint.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Network(format!("building http client: {}", e)))?;
        Ok(Self { url: url.into(), client })
    }

    pub fn url(&self) -> &str { &self.url }
}

#[async_trait::async_trait]
impl CatalogSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<serde_json::Value>, LoadError> {
        let started = Instant::now();
        debug!(url = %self.url, "GET catalog");
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                counter!("catalog_fetch_errors_total", 1u64, "kind" => "network");
                LoadError::Network(e.to_string())
            })?;
        let status = resp.status();
        if !status.is_success() {
            counter!("catalog_fetch_errors_total", 1u64, "kind" => "status");
            warn!(url = %self.url, status = status.as_u16(), "catalog endpoint answered non-success");
            return Err(LoadError::Status(status.as_u16()));
        }
        let body = resp.bytes().await.map_err(|e| LoadError::Network(format!("reading body: {}", e)))?;
        histogram!("catalog_fetch_ms", started.elapsed().as_secs_f64() * 1000.0);
        info!(url = %self.url, bytes = body.len(), "catalog body received");
        decode_body(&body)
    }

    fn describe(&self) -> String { self.url.clone() }
}

/// Reads a catalog dump (the endpoint's JSON array saved to disk).
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }
}

#[async_trait::async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self) -> Result<Vec<serde_json::Value>, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| LoadError::Io(format!("reading {}: {}", self.path.display(), e)))?;
        info!(path = %self.path.display(), bytes = bytes.len(), "catalog file read");
        decode_body(&bytes)
    }

    fn describe(&self) -> String { self.path.display().to_string() }
}

/// Pick the source for a front end: a file wins over the endpoint when given.
pub fn select_source(file: Option<&Path>, endpoint: &str, timeout: Duration) -> Result<Box<dyn CatalogSource>, LoadError> {
    match file {
        Some(path) => Ok(Box::new(FileSource::new(path))),
        None => Ok(Box::new(HttpSource::with_timeout(endpoint, timeout)?)),
    }
}
