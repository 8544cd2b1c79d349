//! One send operation, from dispatch to rendered reply.

use backend::{ChatApi, ChatError};
use shared::session_store::SessionStore;
use shared::settings::ClientSettings;
use shared::transcript::{TranscriptEntry, TranscriptView};
use std::sync::Arc;
use tracing::error;

use crate::composer::Submission;
use crate::dispatcher::RequestDispatcher;
use crate::renderer::{ResponseRenderer, FAILURE_MESSAGE};

/// Transcript surface that also hears about non-transcript side effects.
pub trait ChatSink: TranscriptView {
    /// The pending attachment was accepted by the server.
    fn attachment_uploaded(&mut self) {}

    /// The token was rejected and cleared; the user must log in again.
    fn session_expired(&mut self) {}
}

#[derive(Debug)]
pub enum SendOutcome {
    Completed,
    Failed(ChatError),
    SessionExpired,
}

pub struct ChatController {
    dispatcher: RequestDispatcher,
    renderer: ResponseRenderer,
}

impl ChatController {
    pub fn new(
        api: Arc<dyn ChatApi>,
        store: Arc<dyn SessionStore>,
        settings: &ClientSettings,
    ) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(api, store, settings.require_auth),
            renderer: ResponseRenderer::new(settings.response_mode),
        }
    }

    /// Every failure ends here; nothing propagates past a send.
    pub async fn send<S: ChatSink + ?Sized>(
        &self,
        submission: Submission,
        sink: &mut S,
    ) -> SendOutcome {
        let dispatched = self
            .dispatcher
            .dispatch(&submission, || sink.attachment_uploaded())
            .await;

        let reply = match dispatched {
            Ok(reply) => reply,
            Err(ChatError::Unauthorized) => {
                sink.session_expired();
                return SendOutcome::SessionExpired;
            }
            Err(e) => {
                error!("send failed: {}", e);
                sink.append_entry(TranscriptEntry::system(FAILURE_MESSAGE));
                return SendOutcome::Failed(e);
            }
        };

        match self.renderer.render(reply, sink).await {
            Ok(()) => SendOutcome::Completed,
            Err(e) => SendOutcome::Failed(e),
        }
    }
}
