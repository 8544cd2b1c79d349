//! Transcript model for the chat view.
//!
//! Entries are append-only. The only mutation allowed after creation is on an
//! assistant entry that is still receiving streamed text (or being settled to
//! a failure message), which goes through [`EntryUpdate`].

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a transcript entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One rendered message unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Placeholder shown while waiting for the first streamed chunk
    #[serde(default)]
    pub pending: bool,
    pub timestamp: String,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            pending: false,
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Assistant entry in the pending state.
    pub fn placeholder(content: impl Into<String>) -> Self {
        Self {
            pending: true,
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn apply(&mut self, update: EntryUpdate) {
        match update {
            EntryUpdate::Append(text) => self.content.push_str(&text),
            EntryUpdate::Settle(text) => {
                self.pending = false;
                self.content = text;
            }
        }
    }
}

/// Mutation of an existing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryUpdate {
    /// Append text to the content
    Append(String),
    /// Replace the content and leave the pending state
    Settle(String),
}

/// Display surface for transcript entries.
pub trait TranscriptView {
    /// Append an entry, returning its id for later updates.
    fn append_entry(&mut self, entry: TranscriptEntry) -> Uuid;

    fn update_entry(&mut self, id: Uuid, update: EntryUpdate);
}

/// In-memory transcript, owned by the chat view.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn get(&self, id: Uuid) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TranscriptView for Transcript {
    fn append_entry(&mut self, entry: TranscriptEntry) -> Uuid {
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    fn update_entry(&mut self, id: Uuid, update: EntryUpdate) {
        // Updates only ever target recent entries
        match self.entries.iter_mut().rev().find(|e| e.id == id) {
            Some(entry) => entry.apply(update),
            None => tracing::warn!("update for unknown transcript entry {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.append_entry(TranscriptEntry::user("first"));
        transcript.append_entry(TranscriptEntry::assistant("second"));
        transcript.append_entry(TranscriptEntry::system("third"));

        let contents: Vec<_> = transcript.entries().iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(transcript.entries()[1].role, Role::Assistant);
    }

    #[test]
    fn test_settle_clears_pending() {
        let mut transcript = Transcript::new();
        let id = transcript.append_entry(TranscriptEntry::placeholder("Thinking..."));
        assert!(transcript.get(id).unwrap().pending);

        transcript.update_entry(id, EntryUpdate::Settle("Hel".into()));
        transcript.update_entry(id, EntryUpdate::Append("lo".into()));

        let entry = transcript.get(id).unwrap();
        assert!(!entry.pending);
        assert_eq!(entry.content, "Hello");
    }

    #[test]
    fn test_update_unknown_entry_is_ignored() {
        let mut transcript = Transcript::new();
        transcript.append_entry(TranscriptEntry::user("hi"));
        transcript.update_entry(Uuid::new_v4(), EntryUpdate::Append("x".into()));
        assert_eq!(transcript.entries()[0].content, "hi");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
