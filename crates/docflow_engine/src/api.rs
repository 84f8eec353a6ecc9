use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::save;
use crate::types::{
    map_reqwest_error, ClientError, FillRequest, FillResponse, TemplateListing,
};

/// Environment variable overriding the API origin.
pub const BASE_URL_ENV: &str = "DOCFLOW_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiSettings {
    /// Default settings, with the base URL taken from `DOCFLOW_API_URL` when
    /// set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(base) = std::env::var(BASE_URL_ENV) {
            if !base.is_empty() {
                settings.base_url = base;
            }
        }
        settings
    }
}

/// HTTP client for the document-generation backend.
#[derive(Debug, Clone)]
pub struct DocflowApi {
    client: reqwest::Client,
    base_url: String,
}

impl DocflowApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(&settings.base_url),
        })
    }

    /// API origin, normalized to end with a single `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs the job-creation request and extracts the task id.
    pub async fn submit_job(&self, request: &FillRequest) -> Result<String, ClientError> {
        let url = format!("{}api/template/fill", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16()));
        }

        let body: FillResponse = response
            .json()
            .await
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))?;
        Ok(body.task_id)
    }

    /// Uploads supporting content files as a multipart form with repeated
    /// `files` parts. Returns the (pretty-printed) response body.
    pub async fn upload_content(
        &self,
        files: &[(String, PathBuf)],
    ) -> Result<String, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, path) in files {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|err| ClientError::FileRead(err.to_string()))?;
            let part = reqwest::multipart::Part::bytes(bytes).file_name(name.clone());
            form = form.part("files", part);
        }

        let url = format!("{}api/pdf/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::Upload(extract_upload_error(&text)));
        }
        Ok(pretty_json(&text))
    }

    /// Fetches the template listing for a non-built-in package.
    pub async fn list_templates(&self, folder_name: &str) -> Result<TemplateListing, ClientError> {
        let url = format!("{}api/template/list-templates/{folder_name}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))
    }

    /// Downloads one generated file and persists it atomically under
    /// `output_dir`, using `file_name` as the local name.
    pub async fn download_file(
        &self,
        file_name: &str,
        download_url: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let url = self.resolve_download_url(download_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        save::write_file_bytes(output_dir, file_name, &bytes)
            .map_err(|err| ClientError::Persist(err.to_string()))
    }

    /// Resolves a server-relative download path against the API origin,
    /// stripping at most one leading separator so the result never carries a
    /// doubled `/`.
    pub fn resolve_download_url(&self, download_url: &str) -> String {
        let relative = download_url.strip_prefix('/').unwrap_or(download_url);
        format!("{}{}", self.base_url, relative)
    }

    /// Derives the update-channel URL for a task from the HTTP origin.
    pub fn progress_channel_url(&self, task_id: &str) -> Result<String, ClientError> {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(ClientError::InvalidUrl(self.base_url.clone()));
        };
        Ok(format!("{ws_base}api/ws/progress/{task_id}"))
    }
}

fn normalize_base_url(raw: &str) -> String {
    if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    }
}

fn extract_upload_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "Failed to upload files".to_string())
}

fn pretty_json(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}
