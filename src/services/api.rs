use crate::config::Config;
use crate::models::{
    cluster::{Manager, NodeKind, Overview, RestartResponse, Worker},
    error::AppError,
    metrics::PerformanceHistory,
};
use crate::services::poll::ClusterSource;
use serde::de::DeserializeOwned;

// CONSTANTS
const FALLBACK_ORIGIN: &str = "http://localhost:9000";
const REALTIME_PATH: &str = "/ws/realtime";

/// Origin the dashboard page was served from.
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| FALLBACK_ORIGIN.to_string())
}

// API CONFIGURATION
/// Endpoints of the cluster backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    realtime_path: String,
    performance_hours: u32,
}

impl ApiConfig {
    /// Creates a builder for constructing an `ApiConfig`.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn performance_hours(&self) -> u32 {
        self.performance_hours
    }

    pub fn overview_url(&self) -> String {
        format!("{}/api/analytics/overview", self.base_url)
    }

    pub fn managers_url(&self) -> String {
        format!("{}/api/managers/", self.base_url)
    }

    pub fn workers_url(&self) -> String {
        format!("{}/api/workers/", self.base_url)
    }

    pub fn performance_url(&self) -> String {
        format!(
            "{}/api/analytics/performance?duration_hours={}",
            self.base_url, self.performance_hours
        )
    }

    pub fn restart_url(&self, kind: NodeKind, id: &str) -> String {
        format!("{}/api/{}/{id}/restart", self.base_url, kind.collection())
    }

    /// Push-channel URL on the same host, `ws://` or `wss://` following the
    /// scheme of the base URL.
    pub fn realtime_url(&self) -> Result<String, AppError> {
        let host = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(AppError::ConfigError(format!(
                "Unsupported origin for real-time channel: {}",
                self.base_url
            )));
        };
        Ok(format!("{host}{}", self.realtime_path))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfigBuilder::default().build()
    }
}

// API CONFIGURATION BUILDER
/// Builder for constructing an `ApiConfig` with custom settings.
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    realtime_path: Option<String>,
    performance_hours: Option<u32>,
}

impl ApiConfigBuilder {
    /// Sets a custom base URL instead of the page origin.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn realtime_path(mut self, path: impl Into<String>) -> Self {
        self.realtime_path = Some(path.into());
        self
    }

    /// Sets the history window of the performance charts.
    pub fn performance_hours(mut self, hours: u32) -> Self {
        self.performance_hours = Some(hours);
        self
    }

    /// Builds the `ApiConfig`, defaulting to the page origin.
    pub fn build(self) -> ApiConfig {
        let base_url = self.base_url.unwrap_or_else(page_origin);
        ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            realtime_path: self
                .realtime_path
                .unwrap_or_else(|| REALTIME_PATH.to_string()),
            performance_hours: self
                .performance_hours
                .unwrap_or(Config::PERFORMANCE_WINDOW_HOURS),
        }
    }
}

// DASHBOARD CLIENT
/// HTTP client for the cluster backend.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl DashboardClient {
    /// Creates a client for the page origin.
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(ApiConfig::default())
    }

    pub fn with_config(config: ApiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn fetch_overview(&self) -> Result<Overview, AppError> {
        self.get_json(&self.config.overview_url()).await
    }

    pub async fn fetch_managers(&self) -> Result<Vec<Manager>, AppError> {
        self.get_json(&self.config.managers_url()).await
    }

    pub async fn fetch_workers(&self) -> Result<Vec<Worker>, AppError> {
        self.get_json(&self.config.workers_url()).await
    }

    pub async fn fetch_performance(&self) -> Result<PerformanceHistory, AppError> {
        self.get_json(&self.config.performance_url()).await
    }

    /// Asks the backend to restart a node and returns its confirmation message.
    pub async fn restart(&self, kind: NodeKind, id: &str) -> Result<String, AppError> {
        let url = self.config.restart_url(kind, id);
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let reply: RestartResponse = self.read_json(response).await?;
        Ok(reply.message)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        self.read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::DataError(format!("Failed to parse response: {e}")))
    }

    /// Converts a reqwest error into an appropriate AppError.
    fn classify_error(&self, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::ApiError(format!("Request timeout: {error}"))
        } else if error.is_request() {
            AppError::ApiError(format!("Request error: {error}"))
        } else {
            AppError::ApiError(format!("Network error: {error}"))
        }
    }

    /// Creates an error based on HTTP status code.
    fn error_for_status(status: reqwest::StatusCode, body: &str) -> AppError {
        match status.as_u16() {
            429 => AppError::RateLimited,
            404 => AppError::NotFound(format!("Resource not found: {body}")),
            400..=499 => AppError::ApiError(format!("Client error {status}: {body}")),
            500..=599 => AppError::ApiError(format!("Server error {status}: {body}")),
            _ => AppError::ApiError(format!("Unexpected status {status}: {body}")),
        }
    }
}

impl ClusterSource for DashboardClient {
    async fn fetch_overview(&self) -> Result<Overview, AppError> {
        DashboardClient::fetch_overview(self).await
    }

    async fn fetch_managers(&self) -> Result<Vec<Manager>, AppError> {
        DashboardClient::fetch_managers(self).await
    }

    async fn fetch_workers(&self) -> Result<Vec<Worker>, AppError> {
        DashboardClient::fetch_workers(self).await
    }
}
