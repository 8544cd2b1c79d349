use backend::{ChatApi, ChatError, ChatReply, FileUpload, UploadReceipt};
use shared::session_store::SessionStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::composer::{PendingAttachment, Submission};

/// Message the chat endpoint receives after a file was uploaded.
pub fn compose_chat_message(file_name: &str, typed: &str) -> String {
    let file_msg = format!("I have uploaded a file named {}.", file_name);
    if typed.is_empty() {
        file_msg
    } else {
        format!("{}\n\n{}", file_msg, typed)
    }
}

/// Sends a submission to the backend: upload first (if any), then chat.
pub struct RequestDispatcher {
    api: Arc<dyn ChatApi>,
    store: Arc<dyn SessionStore>,
    require_auth: bool,
}

impl RequestDispatcher {
    pub fn new(api: Arc<dyn ChatApi>, store: Arc<dyn SessionStore>, require_auth: bool) -> Self {
        Self {
            api,
            store,
            require_auth,
        }
    }

    /// Token to attach, read fresh for every request.
    fn bearer(&self) -> Result<Option<String>, ChatError> {
        if !self.require_auth {
            return Ok(None);
        }
        self.store.get().map(Some).ok_or(ChatError::Unauthorized)
    }

    /// A rejected token is dropped before the caller redirects to login.
    fn expire_on_unauthorized(&self, err: ChatError) -> ChatError {
        if err.is_unauthorized() {
            warn!("backend rejected the session token, signing out");
            if let Err(e) = self.store.clear() {
                warn!("failed to clear session token: {:#}", e);
            }
        }
        err
    }

    pub async fn upload(&self, attachment: &PendingAttachment) -> Result<UploadReceipt, ChatError> {
        let bearer = self.bearer().map_err(|e| self.expire_on_unauthorized(e))?;
        let bytes = tokio::fs::read(&attachment.path)
            .await
            .map_err(|source| ChatError::Attachment {
                path: attachment.path.clone(),
                source,
            })?;

        let file = FileUpload {
            file_name: attachment.file_name.clone(),
            bytes,
        };
        self.api
            .upload(file, bearer.as_deref())
            .await
            .map_err(|e| self.expire_on_unauthorized(e))
    }

    pub async fn chat(&self, message: &str) -> Result<ChatReply, ChatError> {
        let bearer = self.bearer().map_err(|e| self.expire_on_unauthorized(e))?;
        self.api
            .chat(message, bearer.as_deref())
            .await
            .map_err(|e| self.expire_on_unauthorized(e))
    }

    /// Run both requests for `submission`. `on_uploaded` fires as soon as
    /// the attachment is accepted, even if the chat call later fails.
    pub async fn dispatch(
        &self,
        submission: &Submission,
        on_uploaded: impl FnOnce(),
    ) -> Result<ChatReply, ChatError> {
        let message = match &submission.attachment {
            Some(attachment) => {
                let receipt = self.upload(attachment).await?;
                on_uploaded();
                debug!(
                    "upload receipt: info={:?} file_path={:?} role={:?}",
                    receipt.info, receipt.file_path, receipt.role
                );
                compose_chat_message(&attachment.file_name, &submission.text)
            }
            None => submission.text.clone(),
        };

        info!("sending chat message ({} chars)", message.chars().count());
        self.chat(&message).await
    }
}
