//! Renders a chat reply into the transcript.

use backend::{decode_text_stream, ChatError, ChatReply, ChatResult};
use futures::StreamExt;
use shared::settings::ResponseMode;
use shared::transcript::{EntryUpdate, TranscriptEntry, TranscriptView};
use tracing::{debug, error};

/// Shown in place of an answer when a send fails.
pub const FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

pub const THINKING_PLACEHOLDER: &str = "Thinking...";

pub struct ResponseRenderer {
    mode: ResponseMode,
}

impl ResponseRenderer {
    pub fn new(mode: ResponseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    /// Consume `reply` into `view`. On failure the transcript already shows
    /// [`FAILURE_MESSAGE`] when this returns.
    pub async fn render<V: TranscriptView + ?Sized>(
        &self,
        reply: ChatReply,
        view: &mut V,
    ) -> Result<(), ChatError> {
        match self.mode {
            ResponseMode::Stream => render_stream(reply, view).await,
            ResponseMode::Json => render_json(reply, view).await,
        }
    }
}

async fn render_json<V: TranscriptView + ?Sized>(
    reply: ChatReply,
    view: &mut V,
) -> Result<(), ChatError> {
    let parsed = match reply.collect().await {
        Ok(body) => serde_json::from_slice::<ChatResult>(&body).map_err(ChatError::from),
        Err(e) => Err(e),
    };

    match parsed {
        Ok(body) => {
            view.append_entry(TranscriptEntry::assistant(body.result));
            Ok(())
        }
        Err(e) => {
            error!("chat reply unusable: {}", e);
            view.append_entry(TranscriptEntry::system(FAILURE_MESSAGE));
            Err(e)
        }
    }
}

async fn render_stream<V: TranscriptView + ?Sized>(
    reply: ChatReply,
    view: &mut V,
) -> Result<(), ChatError> {
    let id = view.append_entry(TranscriptEntry::placeholder(THINKING_PLACEHOLDER));
    let mut fragments = decode_text_stream(reply.body);
    let mut started = false;
    let mut received = 0usize;

    while let Some(fragment) = fragments.next().await {
        match fragment {
            Ok(text) => {
                received += text.len();
                // First fragment replaces the placeholder
                let update = if started {
                    EntryUpdate::Append(text)
                } else {
                    started = true;
                    EntryUpdate::Settle(text)
                };
                view.update_entry(id, update);
            }
            Err(e) => {
                error!("chat stream failed after {} bytes: {}", received, e);
                view.update_entry(id, EntryUpdate::Settle(FAILURE_MESSAGE.to_string()));
                return Err(e);
            }
        }
    }

    if !started {
        view.update_entry(id, EntryUpdate::Settle(String::new()));
    }
    debug!("chat stream complete ({} bytes)", received);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::transcript::{Role, Transcript};

    fn reply(parts: &[&[u8]]) -> ChatReply {
        let chunks: Vec<backend::Result<Vec<u8>>> = parts.iter().map(|p| Ok(p.to_vec())).collect();
        ChatReply::from_chunks(chunks)
    }

    /// Records every state the streamed entry passes through.
    #[derive(Default)]
    struct Recorder {
        transcript: Transcript,
        snapshots: Vec<(String, bool)>,
    }

    impl TranscriptView for Recorder {
        fn append_entry(&mut self, entry: TranscriptEntry) -> uuid::Uuid {
            self.snapshots.push((entry.content.clone(), entry.pending));
            self.transcript.append_entry(entry)
        }

        fn update_entry(&mut self, id: uuid::Uuid, update: EntryUpdate) {
            self.transcript.update_entry(id, update);
            let entry = self.transcript.get(id).unwrap();
            self.snapshots.push((entry.content.clone(), entry.pending));
        }
    }

    #[tokio::test]
    async fn test_stream_chunks_concatenate() {
        let renderer = ResponseRenderer::new(ResponseMode::Stream);
        let mut view = Recorder::default();

        renderer
            .render(reply(&[b"Hel", b"lo wor", b"ld"]), &mut view)
            .await
            .unwrap();

        let entries = view.transcript.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, Role::Assistant);
        assert_eq!(entries[0].content, "Hello world");
        assert!(!entries[0].pending);

        assert_eq!(
            view.snapshots,
            vec![
                ("Thinking...".to_string(), true),
                ("Hel".to_string(), false),
                ("Hello wor".to_string(), false),
                ("Hello world".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_split_multibyte() {
        let renderer = ResponseRenderer::new(ResponseMode::Stream);
        let mut transcript = Transcript::new();

        renderer
            .render(reply(&[b"na\xC3", b"\xAFve"]), &mut transcript)
            .await
            .unwrap();
        assert_eq!(transcript.entries()[0].content, "naïve");
    }

    #[tokio::test]
    async fn test_empty_stream_settles_empty() {
        let renderer = ResponseRenderer::new(ResponseMode::Stream);
        let mut transcript = Transcript::new();

        renderer.render(reply(&[]), &mut transcript).await.unwrap();
        assert_eq!(transcript.entries()[0].content, "");
        assert!(!transcript.entries()[0].pending);
    }

    #[tokio::test]
    async fn test_stream_error_replaces_partial_content() {
        let renderer = ResponseRenderer::new(ResponseMode::Stream);
        let mut transcript = Transcript::new();
        let chunks: Vec<backend::Result<Vec<u8>>> = vec![
            Ok(b"Half an ans".to_vec()),
            Err(ChatError::Decode("connection closed".into())),
        ];

        let result = renderer
            .render(ChatReply::from_chunks(chunks), &mut transcript)
            .await;
        assert!(result.is_err());
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].content, FAILURE_MESSAGE);
        assert!(!transcript.entries()[0].pending);
    }

    #[tokio::test]
    async fn test_json_result_becomes_assistant_entry() {
        let renderer = ResponseRenderer::new(ResponseMode::Json);
        let mut transcript = Transcript::new();

        renderer
            .render(reply(&[br#"{"result": "Two slots are free on "#, br#"Friday."}"#]), &mut transcript)
            .await
            .unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].role, Role::Assistant);
        assert_eq!(transcript.entries()[0].content, "Two slots are free on Friday.");
    }

    #[tokio::test]
    async fn test_json_failure_appends_system_entry() {
        let renderer = ResponseRenderer::new(ResponseMode::Json);
        let mut transcript = Transcript::new();

        let result = renderer.render(reply(&[b"<html>oops"]), &mut transcript).await;
        assert!(matches!(result, Err(ChatError::Decode(_))));
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.entries()[0].role, Role::System);
        assert_eq!(transcript.entries()[0].content, FAILURE_MESSAGE);
    }
}
