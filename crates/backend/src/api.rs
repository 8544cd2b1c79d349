use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::Result;
use crate::wire::UploadReceipt;

/// Raw response body as it arrives from the network.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// A file ready to be sent to `/upload`.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A successful chat response whose body has not been read yet.
pub struct ChatReply {
    pub body: ByteStream,
}

impl ChatReply {
    pub fn new(body: ByteStream) -> Self {
        Self { body }
    }

    /// Reply backed by in-memory chunks.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<u8>>>,
        I::IntoIter: Send + 'static,
    {
        Self::new(futures::stream::iter(chunks).boxed())
    }

    /// Read the remaining body into one buffer.
    pub async fn collect(mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf)
    }
}

impl std::fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatReply").finish_non_exhaustive()
    }
}

/// The three backend calls the client depends on.
///
/// `bearer` is `Some` in the authenticated variant. A 401 on a request that
/// carried a bearer token maps to [`ChatError::Unauthorized`]; without one it
/// is an ordinary failure.
///
/// [`ChatError::Unauthorized`]: crate::ChatError::Unauthorized
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// Exchange credentials for an access token.
    async fn exchange_credentials(&self, username: &str, password: &str) -> Result<String>;

    async fn upload(&self, file: FileUpload, bearer: Option<&str>) -> Result<UploadReceipt>;

    /// Post a message. The body is handed back unread.
    async fn chat(&self, message: &str, bearer: Option<&str>) -> Result<ChatReply>;
}
