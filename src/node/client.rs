//! HTTP client for the node API, used by the coordinator.
//!
//! Nodes are addressed by their base URL (e.g. `http://node1:9001`). Every
//! call carries its own timeout; nothing here retries.

use anyhow::{Result, anyhow};
use bytes::Bytes;
use reqwest::{StatusCode, Url};
use std::time::Duration;

use super::protocol::{
    ENDPOINT_DELETE_CHUNK, ENDPOINT_GET_CHUNK, ENDPOINT_HEALTH, ENDPOINT_STORE_CHUNK,
};

/// What a node reported for a delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    request_timeout: Duration,
}

impl NodeClient {
    /// `request_timeout` bounds store, fetch and delete calls. Health probes
    /// pass their own timeout.
    pub fn new(request_timeout: Duration) -> Result<Self> {
        // Node traffic stays inside the cluster, never through a proxy.
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            http,
            request_timeout,
        })
    }

    /// Succeeds if the node answers `/health` with 200 within `timeout`.
    pub async fn health(&self, node: &str, timeout: Duration) -> Result<()> {
        let url = endpoint_url(node, ENDPOINT_HEALTH, None)?;
        let response = self.http.get(url).timeout(timeout).send().await?;

        if response.status() != StatusCode::OK {
            return Err(anyhow!("health check returned {}", response.status()));
        }
        Ok(())
    }

    pub async fn store_chunk(&self, node: &str, chunk: &str, data: Bytes) -> Result<()> {
        let url = endpoint_url(node, ENDPOINT_STORE_CHUNK, None)?;
        let response = self
            .http
            .post(url)
            .query(&[("filename", chunk)])
            .body(data)
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("store of {} failed: {}", chunk, response.status()));
        }
        Ok(())
    }

    /// `Ok(None)` when the node does not hold the chunk.
    pub async fn fetch_chunk(&self, node: &str, chunk: &str) -> Result<Option<Bytes>> {
        let url = endpoint_url(node, ENDPOINT_GET_CHUNK, Some(chunk))?;
        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow!("fetch of {} failed: {}", chunk, response.status()));
        }

        Ok(Some(response.bytes().await?))
    }

    pub async fn delete_chunk(&self, node: &str, chunk: &str) -> Result<DeleteOutcome> {
        let url = endpoint_url(node, ENDPOINT_DELETE_CHUNK, Some(chunk))?;
        let response = self
            .http
            .delete(url)
            .timeout(self.request_timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotFound),
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            status => Err(anyhow!("delete of {} failed: {}", chunk, status)),
        }
    }
}

/// Joins the node base URL, an endpoint and an optional (percent-encoded)
/// chunk segment.
fn endpoint_url(node: &str, endpoint: &str, chunk: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(node)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow!("node address cannot be a base URL: {}", node))?;
        segments.pop_if_empty();
        segments.extend(endpoint.trim_start_matches('/').split('/'));
        if let Some(chunk) = chunk {
            segments.push(chunk);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_segments() {
        let url = endpoint_url("http://node1:9001", ENDPOINT_HEALTH, None).unwrap();
        assert_eq!(url.as_str(), "http://node1:9001/health");

        let url = endpoint_url(
            "http://node1:9001/",
            ENDPOINT_GET_CHUNK,
            Some("a_chunk0000.txt"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://node1:9001/get_chunk/a_chunk0000.txt");
    }

    #[test]
    fn test_endpoint_url_encodes_chunk_names() {
        let url = endpoint_url(
            "http://node1:9001",
            ENDPOINT_DELETE_CHUNK,
            Some("my file_chunk0001"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://node1:9001/delete_chunk/my%20file_chunk0001");
    }

    #[test]
    fn test_endpoint_url_rejects_garbage() {
        assert!(endpoint_url("not a url", ENDPOINT_HEALTH, None).is_err());
    }
}
