//! Bridges background sends to the UI thread.
//!
//! The worker side writes transcript changes into an [`EventSink`]; the UI
//! side drains the channel once per frame and applies each event to its
//! [`ChatPage`]. `Finished` is emitted from a drop guard so the composer is
//! re-enabled on every exit path, panics included.

use backend::ChatError;
use shared::events::ChatEvent;
use shared::transcript::{EntryUpdate, Transcript, TranscriptEntry, TranscriptView};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

use crate::composer::{Composer, Submission};
use crate::controller::{ChatController, ChatSink, SendOutcome};
use crate::guard::View;
use crate::login::{CredentialExchange, Credentials};
use crate::renderer::FAILURE_MESSAGE;

/// Worker-side transcript that forwards every mutation as an event.
pub struct EventSink {
    tx: Sender<ChatEvent>,
}

impl EventSink {
    pub fn new(tx: Sender<ChatEvent>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: ChatEvent) {
        // The UI may be gone during shutdown
        let _ = self.tx.send(event);
    }
}

impl TranscriptView for EventSink {
    fn append_entry(&mut self, entry: TranscriptEntry) -> Uuid {
        let id = entry.id;
        self.emit(ChatEvent::EntryAppended(entry));
        id
    }

    fn update_entry(&mut self, id: Uuid, update: EntryUpdate) {
        self.emit(ChatEvent::EntryUpdated { id, update });
    }
}

impl ChatSink for EventSink {
    fn attachment_uploaded(&mut self) {
        self.emit(ChatEvent::AttachmentUploaded);
    }

    fn session_expired(&mut self) {
        self.emit(ChatEvent::SessionExpired);
    }
}

/// Sends `Finished` when dropped.
pub struct FinishGuard {
    tx: Sender<ChatEvent>,
}

impl FinishGuard {
    pub fn new(tx: Sender<ChatEvent>) -> Self {
        Self { tx }
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(ChatEvent::Finished);
    }
}

/// Run one send on a background thread.
pub fn spawn_send(
    controller: Arc<ChatController>,
    submission: Submission,
    tx: Sender<ChatEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let _finish = FinishGuard::new(tx.clone());
        let mut sink = EventSink::new(tx);

        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("failed to start async runtime: {}", e);
                sink.append_entry(TranscriptEntry::system(FAILURE_MESSAGE));
                return;
            }
        };

        match rt.block_on(controller.send(submission, &mut sink)) {
            SendOutcome::Completed => debug!("send completed"),
            SendOutcome::SessionExpired => debug!("send ended with expired session"),
            SendOutcome::Failed(e) => debug!("send failed: {}", e),
        }
    })
}

/// Run one credential exchange on a background thread.
pub fn spawn_login(
    exchange: Arc<CredentialExchange>,
    credentials: Credentials,
    tx: Sender<Result<(), ChatError>>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(exchange.submit(&credentials)),
            Err(e) => Err(ChatError::Session(format!("failed to start async runtime: {}", e))),
        };
        if let Err(e) = &result {
            error!("login failed: {}", e);
        }
        let _ = tx.send(result);
    })
}

/// UI-side state of the chat view.
#[derive(Default)]
pub struct ChatPage {
    pub composer: Composer,
    pub transcript: Transcript,
}

impl ChatPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a send if the composer allows one.
    pub fn submit(&mut self) -> Option<Submission> {
        self.composer.submit(&mut self.transcript)
    }

    /// Apply one event from the worker. Returns a view to navigate to.
    pub fn apply(&mut self, event: ChatEvent) -> Option<View> {
        match event {
            ChatEvent::AttachmentUploaded => self.composer.clear_attachment(),
            ChatEvent::SessionExpired => return Some(View::Login),
            ChatEvent::Finished => self.composer.finish(),
            transcript_event => {
                transcript_event.apply_to(&mut self.transcript);
            }
        }
        None
    }
}
