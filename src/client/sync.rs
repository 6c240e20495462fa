// File: ./src/client/sync.rs
//! HTTP client for the collector backend that fills the post store.
//!
//! The backend exposes three endpoints: `POST /api/sync` starts a collection
//! run in the background, `GET /api/status` reports on it and
//! `GET /api/health` is a liveness probe. Errors at this boundary are plain
//! strings carrying the HTTP status or the transport failure.
use http::{Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

const USER_AGENT: &str = concat!("diynews/", env!("CARGO_PKG_VERSION"));

/// Counters of a finished run. A failed run reports an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncStats {
    pub collected: u64,
    pub new: u64,
    pub saved: u64,
    pub schedules: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stats: SyncStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncStatus {
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub last_result: Option<SyncResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `/api/sync` and `/api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<SyncStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// What `trigger` achieved. A run already in progress is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Started(SyncResponse),
    AlreadyRunning(SyncResponse),
}

#[derive(Clone, Debug)]
pub struct SyncClient {
    base: String,
    http: HttpsClient,
}

impl SyncClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let base = base_url.trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err("Sync URL is empty".to_string());
        }
        base.parse::<Uri>()
            .map_err(|e: http::uri::InvalidUri| e.to_string())?;

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            // Plain http backends still work; https requests will fail verification.
            log::warn!("No valid system certificates found");
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self { base, http })
    }

    async fn send(&self, method: Method, path: &str) -> Result<(StatusCode, Vec<u8>), String> {
        let url = format!("{}{}", self.base, path);
        let req = Request::builder()
            .method(method.clone())
            .uri(&url)
            .header(http::header::USER_AGENT, USER_AGENT)
            .header(http::header::ACCEPT, "application/json")
            .body(String::new())
            .map_err(|e| e.to_string())?;

        log::debug!("{} {}", method, url);
        let resp = self
            .http
            .request(req)
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))?;
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| format!("Failed to read response from {}: {}", url, e))?
            .to_bytes();
        Ok((status, body.to_vec()))
    }

    fn parse<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, String> {
        serde_json::from_slice(body)
            .map_err(|e| format!("Unexpected response ({}): {}", status, e))
    }

    /// `POST /api/sync`. 202 starts a run, 409 means one is already going.
    pub async fn trigger(&self) -> Result<SyncOutcome, String> {
        let (status, body) = self.send(Method::POST, "/api/sync").await?;
        match status {
            StatusCode::ACCEPTED => Ok(SyncOutcome::Started(Self::parse(status, &body)?)),
            StatusCode::CONFLICT => {
                log::info!("Backend reports a sync already in progress");
                Ok(SyncOutcome::AlreadyRunning(Self::parse(status, &body)?))
            }
            s if s.is_success() => Ok(SyncOutcome::Started(Self::parse(status, &body)?)),
            s => Err(format!("Sync request failed: {}", s)),
        }
    }

    pub async fn status(&self) -> Result<SyncStatus, String> {
        let (status, body) = self.send(Method::GET, "/api/status").await?;
        if !status.is_success() {
            return Err(format!("Status request failed: {}", status));
        }
        let resp: SyncResponse = Self::parse(status, &body)?;
        Ok(resp.status.unwrap_or_default())
    }

    pub async fn health(&self) -> Result<HealthResponse, String> {
        let (status, body) = self.send(Method::GET, "/api/health").await?;
        if !status.is_success() {
            return Err(format!("Health check failed: {}", status));
        }
        Self::parse(status, &body)
    }

    /// Polls `status` every `poll` until the run is over, at most `attempts` times.
    pub async fn wait_until_idle(&self, poll: Duration, attempts: u32) -> Result<SyncStatus, String> {
        for attempt in 0..attempts {
            let status = self.status().await?;
            if !status.is_running {
                return Ok(status);
            }
            log::debug!("Sync still running (poll {}/{})", attempt + 1, attempts);
            tokio::time::sleep(poll).await;
        }
        Err(format!("Sync still running after {} polls", attempts))
    }
}
