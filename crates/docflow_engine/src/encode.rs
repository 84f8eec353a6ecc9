use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::ClientError;

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".svg", ".jpg", ".jpeg"];

/// True when the filename's extension marks it as an image eligible for
/// inlining into the request body.
pub fn is_image_file(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

/// Builds the `process_flow` payload for a submission.
///
/// Only the first uploaded workflow file is considered, and only when it is
/// an image; anything else leaves the payload empty. A read failure rejects
/// the in-flight submission.
pub async fn build_process_flow(
    workflow_file: Option<&(String, PathBuf)>,
) -> Result<String, ClientError> {
    match workflow_file {
        Some((name, path)) if is_image_file(name) => encode_image(path).await,
        _ => Ok(String::new()),
    }
}

async fn encode_image(path: &Path) -> Result<String, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ClientError::FileRead(err.to_string()))?;
    Ok(STANDARD.encode(bytes))
}
