use crate::error::{PdfSplitterError, Result};
use crate::types::{ServiceConfig, SplitArtifact, SplitJob};
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, info, warn};
use url::Url;

const SPLIT_PATH: &str = "api/split";
const HEALTH_PATH: &str = "api/health";

/// The remote splitting service.
///
/// Every failure, whether transport, timeout or status, comes back as
/// [`PdfSplitterError::SplitService`]; server error bodies are not surfaced.
pub trait SplitService {
    fn split(&self, job: SplitJob) -> impl Future<Output = Result<SplitArtifact>> + Send;
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Split service reached over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpSplitService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSplitService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                warn!("Failed to create HTTP client: {}", e);
                PdfSplitterError::SplitService
            })?;

        Ok(Self {
            client,
            base_url: Self::with_trailing_slash(config.base_url.clone()),
        })
    }

    pub fn split_url(&self) -> Result<Url> {
        Ok(self.base_url.join(SPLIT_PATH)?)
    }

    pub fn health_url(&self) -> Result<Url> {
        Ok(self.base_url.join(HEALTH_PATH)?)
    }

    /// Probes the service's health endpoint.
    pub async fn health(&self) -> Result<bool> {
        let url = self.health_url()?;
        debug!("Checking service health at {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Health check failed: {}", e);
            PdfSplitterError::SplitService
        })?;

        if !response.status().is_success() {
            warn!("Health check returned HTTP {}", response.status());
            return Ok(false);
        }

        let body: HealthResponse = response.json().await.map_err(|e| {
            warn!("Unreadable health response: {}", e);
            PdfSplitterError::SplitService
        })?;

        Ok(body.status == "ok")
    }

    // `Url::join` drops the last segment unless the base ends in '/'.
    fn with_trailing_slash(mut url: Url) -> Url {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }
}

impl SplitService for HttpSplitService {
    async fn split(&self, job: SplitJob) -> Result<SplitArtifact> {
        let url = self.split_url()?;
        info!(
            "Submitting '{}' to {} with ranges {} (merge: {})",
            job.source.name,
            url,
            job.range_spec(),
            job.merge
        );

        let form = job.into_form()?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Split request failed: {}", e);
                PdfSplitterError::SplitService
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Split service returned HTTP {}", status.as_u16());
            return Err(PdfSplitterError::SplitService);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|e| {
            warn!("Failed to read split response: {}", e);
            PdfSplitterError::SplitService
        })?;

        debug!("Received {} bytes ({:?})", bytes.len(), content_type);
        Ok(SplitArtifact {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
