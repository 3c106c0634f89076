//! RPC client for communicating with the execution engine
//!
//! This module provides a client for making JSON-RPC calls to the engine
//! that evaluates programs and serves recorded traces. Every wrapper maps
//! failures onto the two boundary error kinds: trace/source resolution
//! problems become [`TraceError::Backend`], per-frame retrieval problems
//! become [`TraceError::Fetch`]. No call is ever retried here.

use std::{collections::BTreeMap, path::Path, time::Duration};

use eyre::Result;
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
};
use redex_common::{
    types::{Frame, TraceSummary},
    TraceError,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTracesResponse {
    identifiers: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetFrameResponse {
    frame: Frame,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetSourceResponse {
    files: BTreeMap<String, String>,
}

/// RPC client for engine communication
pub struct RpcClient {
    client: HttpClient,
    server_url: String,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient").field("server_url", &self.server_url).finish()
    }
}

impl RpcClient {
    /// Create a new RPC client
    pub async fn new(server_url: &str) -> Result<Self> {
        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(server_url)?;

        debug!("Created RPC client for: {}", server_url);
        Ok(Self { client, server_url: server_url.to_string() })
    }

    /// Test connection to a server URL
    pub async fn test_connection(server_url: &str) -> Result<()> {
        debug!("Testing connection to: {}", server_url);

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(5))
            .build(server_url)?;

        match client.request::<Value, _>("trace.listTraces", Vec::<Value>::new()).await {
            Ok(_) => {
                debug!("Connection test successful for: {}", server_url);
                Ok(())
            }
            Err(e) => {
                debug!("Connection test failed for {}: {}", server_url, e);
                Err(e.into())
            }
        }
    }

    /// Generic method to make RPC requests
    async fn request(&self, method: &str, params: Vec<Value>, operation_name: &str) -> Result<Value> {
        debug!("Making RPC request: {}", operation_name);

        match self.client.request(method, params).await {
            Ok(result) => {
                debug!("{} successful", operation_name);
                Ok(result)
            }
            Err(e) => {
                error!("{} failed: {}", operation_name, e);
                Err(e.into())
            }
        }
    }

    /// Evaluate a program and create one trace per validator/argument set.
    ///
    /// Returns the ordered trace identifiers; the first one is expected to
    /// become the active trace.
    pub async fn create_traces(
        &self,
        file: &Path,
        parameters: &[String],
    ) -> Result<Vec<String>, TraceError> {
        let params = vec![json!(file), json!(parameters)];
        let value = self
            .request("trace.createTraces", params, "Creating traces")
            .await
            .map_err(|e| TraceError::Backend(e.to_string()))?;
        let response: CreateTracesResponse =
            serde_json::from_value(value).map_err(|e| TraceError::Backend(e.to_string()))?;
        Ok(response.identifiers)
    }

    /// Fetch the frame count and source-token indices of a trace
    pub async fn get_trace_summary(&self, identifier: &str) -> Result<TraceSummary, TraceError> {
        let params = vec![json!(identifier)];
        let value = self
            .request("trace.getTraceSummary", params, "Getting trace summary")
            .await
            .map_err(|e| TraceError::Backend(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| TraceError::Backend(e.to_string()))
    }

    /// Fetch a single frame by index
    pub async fn get_frame(&self, identifier: &str, frame: usize) -> Result<Frame, TraceError> {
        let params = vec![json!(identifier), json!(frame)];
        let value = self
            .request("trace.getFrame", params, &format!("Getting frame {frame}"))
            .await
            .map_err(|e| TraceError::Fetch(e.to_string()))?;
        let response: GetFrameResponse =
            serde_json::from_value(value).map_err(|e| TraceError::Fetch(e.to_string()))?;
        Ok(response.frame)
    }

    /// Resolve all source files referenced by a trace under the given root
    pub async fn get_source_files(
        &self,
        identifier: &str,
        source_root: &Path,
    ) -> Result<BTreeMap<String, String>, TraceError> {
        let params = vec![json!(identifier), json!(source_root)];
        let value = self
            .request("trace.getSourceFiles", params, "Resolving source files")
            .await
            .map_err(|e| TraceError::Backend(e.to_string()))?;
        let response: GetSourceResponse =
            serde_json::from_value(value).map_err(|e| TraceError::Backend(e.to_string()))?;
        Ok(response.files)
    }

    /// Get server URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<Value> {
        debug!("Checking server health");

        let health_url = format!("{}/health", self.server_url.trim_end_matches('/'));

        let response = reqwest::get(&health_url).await?;
        let health_data: Value = response.json().await?;

        debug!("Server health: {:?}", health_data);
        Ok(health_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rpc_client_creation() {
        let client = RpcClient::new("http://localhost:3030").await;
        assert!(client.is_ok());
        assert_eq!(client.unwrap().server_url(), "http://localhost:3030");
    }
}
