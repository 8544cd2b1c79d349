//! Events sent from a background send to the UI thread.

use uuid::Uuid;

use crate::transcript::{EntryUpdate, Transcript, TranscriptEntry, TranscriptView};

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A new transcript entry
    EntryAppended(TranscriptEntry),
    /// A change to an entry appended earlier
    EntryUpdated { id: Uuid, update: EntryUpdate },
    /// The pending attachment reached the server and can be dropped
    AttachmentUploaded,
    /// The backend rejected the token; it has been cleared
    SessionExpired,
    /// The send is over, on any exit path
    Finished,
}

impl ChatEvent {
    /// Apply a transcript event to `transcript`. Returns false for events
    /// that are not transcript mutations.
    pub fn apply_to(self, transcript: &mut Transcript) -> bool {
        match self {
            ChatEvent::EntryAppended(entry) => {
                transcript.append_entry(entry);
                true
            }
            ChatEvent::EntryUpdated { id, update } => {
                transcript.update_entry(id, update);
                true
            }
            _ => false,
        }
    }
}
