//! JSON bodies exchanged with the backend.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Error body of a rejected credential exchange. `detail` is usually a
/// string, but validation failures send a list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

/// What `/upload` reports back. Informational only.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UploadReceipt {
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Whole-JSON chat reply.
#[derive(Debug, Deserialize)]
pub struct ChatResult {
    pub result: String,
}
