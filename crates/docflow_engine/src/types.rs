use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body for the job-creation endpoint.
///
/// `process_flow` is an empty string or a base64 payload; `selected_files`
/// serializes as `null` when the caller wants all files for the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillRequest {
    pub folder_name: String,
    pub user_prompt: String,
    pub process_flow: String,
    pub selected_files: Option<Vec<String>>,
}

/// Successful job-creation response. The backend also sends a human-readable
/// `message`; only the correlation id matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct FillResponse {
    pub task_id: String,
}

/// One entry of the template-listing endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateFileInfo {
    pub filename: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub size_mb: f64,
    #[serde(default)]
    pub modified: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateListing {
    #[serde(default)]
    pub files: Vec<TemplateFileInfo>,
}

/// One inbound update-channel frame as it appears on the wire.
///
/// Every field is optional: a frame may carry a `call_log` or
/// `final_response` discriminant and file-completion fields at the same
/// time, and unknown discriminants must still decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct UpdateFrame {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "logType")]
    pub log_type: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "downloadUrl")]
    pub download_url: Option<String>,
}

/// Events emitted by the engine worker back to the application.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    SubmitFinished {
        result: Result<String, ClientError>,
    },
    ChannelOpened {
        task_id: String,
    },
    FrameReceived {
        frame: UpdateFrame,
    },
    ChannelClosed,
    ChannelError {
        message: String,
    },
    ListingFinished {
        result: Result<TemplateListing, ClientError>,
    },
    UploadFinished {
        result: Result<String, ClientError>,
    },
    DownloadFinished {
        file_name: String,
        result: Result<PathBuf, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("file read failed: {0}")]
    FileRead(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("could not persist download: {0}")]
    Persist(String),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Timeout;
    }
    ClientError::Network(err.to_string())
}
