//! Message composer: draft text, the pending attachment and the busy gate.

use shared::transcript::{TranscriptEntry, TranscriptView};
use std::path::{Path, PathBuf};

/// The single file staged for upload with the next send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub path: PathBuf,
    pub file_name: String,
}

impl PendingAttachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, file_name }
    }
}

/// What one send operation works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Trimmed draft text, possibly empty when only a file is sent
    pub text: String,
    pub attachment: Option<PendingAttachment>,
}

#[derive(Debug, Default)]
pub struct Composer {
    pub draft: String,
    attachment: Option<PendingAttachment>,
    busy: bool,
    focus_requested: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// File input changed. `None` means the selection was cleared.
    pub fn select_file(&mut self, path: Option<&Path>) {
        self.attachment = path.map(PendingAttachment::from_path);
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn attachment(&self) -> Option<&PendingAttachment> {
        self.attachment.as_ref()
    }

    /// Text for the file name label; empty without a selection.
    pub fn file_label(&self) -> String {
        match &self.attachment {
            Some(a) => format!("Selected: {}", a.file_name),
            None => String::new(),
        }
    }

    /// Whether the text field and send button accept input.
    pub fn is_enabled(&self) -> bool {
        !self.busy
    }

    /// Returns true once after a send finished, so the view can refocus.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Send was triggered. No-op while busy, or with blank text and no file.
    ///
    /// On proceeding the controls are disabled until [`Composer::finish`],
    /// the user's entries are written to `view` and the draft is cleared.
    pub fn submit<V: TranscriptView + ?Sized>(&mut self, view: &mut V) -> Option<Submission> {
        if self.busy {
            return None;
        }
        let text = self.draft.trim().to_string();
        if text.is_empty() && self.attachment.is_none() {
            return None;
        }

        self.busy = true;
        if !text.is_empty() {
            view.append_entry(TranscriptEntry::user(text.clone()));
        }
        if let Some(attachment) = &self.attachment {
            view.append_entry(TranscriptEntry::user(format!(
                "[Uploaded File: {}]",
                attachment.file_name
            )));
        }
        self.draft.clear();

        Some(Submission {
            text,
            attachment: self.attachment.clone(),
        })
    }

    /// Re-enable input after a send, whatever its outcome.
    pub fn finish(&mut self) {
        self.busy = false;
        self.focus_requested = true;
    }
}
