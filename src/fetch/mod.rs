//! Loads an upload from a local path or an `http(s)://` URL.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::Url;
use std::path::Path;
use tracing::debug;

use crate::ingest::Upload;

const FALLBACK_NAME: &str = "download";

/// Downloads `url`, failing on any non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// File name used to pick the parser: the last URL path segment for
/// remote sources, the path's file name otherwise.
pub fn upload_name(source: &str) -> String {
    let name = if is_remote(source) {
        Url::parse(source).ok().and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
    } else {
        Path::new(source)
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    };

    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Reads `source` into an [`Upload`], downloading it when it is a URL.
#[tracing::instrument(skip(client))]
pub async fn load_upload<C: HttpClient>(client: &C, source: &str) -> Result<Upload> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to download {source}"))?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))?
    };

    let upload = Upload::new(upload_name(source), bytes);
    debug!(name = %upload.name, bytes = upload.bytes.len(), "Upload loaded");
    Ok(upload)
}
