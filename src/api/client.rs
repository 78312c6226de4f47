use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response, Url,
};
use serde_json::Value;

use crate::{
    models::{SelectedFile, SummaryPayload},
    settings::ClientConfig,
};

use super::ApiError;

// Set to true to enable request logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Calls the controller makes against the analysis service.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Past summaries in the order the service returns them.
    async fn fetch_history(&self) -> Result<Vec<SummaryPayload>, ApiError>;

    /// `None` is rejected with a validation error before any request is made.
    async fn upload(&self, file: Option<&SelectedFile>) -> Result<SummaryPayload, ApiError>;

    fn report_url(&self) -> Url;

    async fn download_report(&self) -> Result<Vec<u8>, ApiError>;
}

pub struct AnalysisClient {
    client: Client,
    config: ClientConfig,
    summary_url: Url,
    upload_url: Url,
    report_url: Url,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let summary_url = config.endpoint("summary/")?;
        let upload_url = config.endpoint("upload/")?;
        let report_url = config.endpoint("report/")?;

        let client = Client::builder()
            .user_agent(concat!("equipviz/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            config,
            summary_url,
            upload_url,
            report_url,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.config.username, Some(&self.config.password))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::server(status, &body))
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn fetch_history(&self) -> Result<Vec<SummaryPayload>, ApiError> {
        log_debug!("GET {}", self.summary_url);
        let response = self.send(self.client.get(self.summary_url.clone())).await?;
        let text = response.text().await?;

        let value = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(err) => {
                log_warn!("History response is not JSON ({err}); treating as empty");
                return Ok(Vec::new());
            }
        };

        Ok(decode_history(value))
    }

    async fn upload(&self, file: Option<&SelectedFile>) -> Result<SummaryPayload, ApiError> {
        let file = file.ok_or_else(ApiError::missing_file)?;

        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|source| ApiError::File {
                path: file.path().to_path_buf(),
                source,
            })?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(file.file_name().to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        log_info!(
            "Uploading {} ({} bytes) to {}",
            file.file_name(),
            size,
            self.upload_url
        );
        let response = self
            .send(self.client.post(self.upload_url.clone()).multipart(form))
            .await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|err| ApiError::Malformed {
            url: self.upload_url.to_string(),
            reason: err.to_string(),
        })
    }

    fn report_url(&self) -> Url {
        self.report_url.clone()
    }

    async fn download_report(&self) -> Result<Vec<u8>, ApiError> {
        log_debug!("GET {}", self.report_url);
        let response = self.send(self.client.get(self.report_url.clone())).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Anything other than a JSON array is an empty history. Elements that are
/// not summaries are dropped.
pub fn decode_history(value: Value) -> Vec<SummaryPayload> {
    let Value::Array(items) = value else {
        log_warn!("History response is not an array; treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(summary) => Some(summary),
            Err(err) => {
                log_warn!("Skipping history entry {index}: {err}");
                None
            }
        })
        .collect()
}
