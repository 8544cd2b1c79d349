use std::path::PathBuf;

/// Failures talking to the chat backend.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Credential exchange rejected; carries the server's `detail` or a fallback
    #[error("{0}")]
    Login(String),

    #[error("File upload failed")]
    Upload { status: u16 },

    #[error("Could not read {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chat request failed")]
    Chat { status: u16 },

    /// 401 on an authenticated request
    #[error("Session expired")]
    Unauthorized,

    #[error("Could not save session: {0}")]
    Session(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ChatError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ChatError::Unauthorized)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
