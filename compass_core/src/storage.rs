use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;
use crate::sentiment::SentimentRecord;

const CONVERSATION_FILE: &str = "conversation.json";
const SENTIMENT_FILE: &str = "sentiments.json";

/// Persisted conversation document: whole-collection overwrite, no
/// incremental merge, no schema versioning.
#[derive(Debug, Serialize, Deserialize)]
struct ConversationDocument {
    messages: Vec<ChatMessage>,
    last_updated: DateTime<Utc>,
    message_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct SentimentDocument {
    records: Vec<SentimentRecord>,
    last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ConversationInfo {
    pub message_count: usize,
    pub last_updated: DateTime<Utc>,
    pub has_conversation: bool,
}

/// File-backed store for the two JSON documents, keyed by fixed file names
/// under one directory. Failures are logged and reported as booleans; this
/// boundary never panics and never returns an error to the UI layer.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted in the platform data directory.
    pub fn open_default() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("compass");
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_conversation(&self, messages: &[ChatMessage]) -> bool {
        let document = ConversationDocument {
            messages: messages.to_vec(),
            last_updated: Utc::now(),
            message_count: messages.len(),
        };
        match self.write_json(CONVERSATION_FILE, &document) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to save conversation: {:#}", e);
                false
            }
        }
    }

    /// Restore the persisted message list. Absent or malformed data yields
    /// `None`; a reader never fails on an incompatible shape.
    pub fn load_conversation(&self) -> Option<Vec<ChatMessage>> {
        self.read_json::<ConversationDocument>(CONVERSATION_FILE)
            .map(|doc| doc.messages)
    }

    pub fn clear_conversation(&self) -> bool {
        self.remove(CONVERSATION_FILE)
    }

    /// Lightweight metadata about the persisted conversation.
    pub fn conversation_info(&self) -> Option<ConversationInfo> {
        self.read_json::<ConversationDocument>(CONVERSATION_FILE)
            .map(|doc| ConversationInfo {
                message_count: doc.message_count,
                last_updated: doc.last_updated,
                has_conversation: !doc.messages.is_empty(),
            })
    }

    pub fn save_sentiments(&self, records: &[SentimentRecord]) -> bool {
        let document = SentimentDocument {
            records: records.to_vec(),
            last_updated: Utc::now(),
        };
        match self.write_json(SENTIMENT_FILE, &document) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to save sentiment history: {:#}", e);
                false
            }
        }
    }

    pub fn load_sentiments(&self) -> Option<Vec<SentimentRecord>> {
        self.read_json::<SentimentDocument>(SENTIMENT_FILE)
            .map(|doc| doc.records)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {:?}", self.dir))?;
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value).context("failed to serialize document")?;
        fs::write(&path, json).with_context(|| format!("failed to write {:?}", path))?;
        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("failed to read {:?}: {}", path, e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("malformed document {:?}, treating as absent: {}", path, e);
                None
            }
        }
    }

    fn remove(&self, file: &str) -> bool {
        let path = self.dir.join(file);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::error!("failed to remove {:?}: {}", path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaId;
    use crate::sentiment::Emotion;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, ConversationStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConversationStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn conversation_round_trips() {
        let (_dir, store) = temp_store();
        let messages = vec![
            ChatMessage::user("I feel stuck at work", PersonaId::PracticalAdvisor),
            ChatMessage::assistant("What's the first step?", PersonaId::PracticalAdvisor),
        ];

        assert!(store.save_conversation(&messages));
        let restored = store.load_conversation().expect("saved conversation");
        assert_eq!(restored, messages);
    }

    #[test]
    fn empty_conversation_round_trips() {
        let (_dir, store) = temp_store();
        assert!(store.save_conversation(&[]));
        let restored = store.load_conversation().expect("saved conversation");
        assert!(restored.is_empty());
    }

    #[test]
    fn absent_documents_load_as_none() {
        let (_dir, store) = temp_store();
        assert!(store.load_conversation().is_none());
        assert!(store.load_sentiments().is_none());
        assert!(store.conversation_info().is_none());
    }

    #[test]
    fn malformed_document_loads_as_none() {
        let (dir, store) = temp_store();
        fs::write(dir.path().join(CONVERSATION_FILE), "{\"messages\": 42}").expect("write");
        assert!(store.load_conversation().is_none());

        fs::write(dir.path().join(CONVERSATION_FILE), "not json at all").expect("write");
        assert!(store.load_conversation().is_none());
    }

    #[test]
    fn clear_erases_the_document() {
        let (_dir, store) = temp_store();
        let messages = vec![ChatMessage::user("hello", PersonaId::WiseFriend)];
        assert!(store.save_conversation(&messages));
        assert!(store.clear_conversation());
        assert!(store.load_conversation().is_none());
        // clearing an already-empty store still succeeds
        assert!(store.clear_conversation());
    }

    #[test]
    fn save_overwrites_whole_document() {
        let (_dir, store) = temp_store();
        let first = vec![ChatMessage::user("one", PersonaId::CbtTherapist)];
        let second = vec![ChatMessage::user("two", PersonaId::CbtTherapist)];
        assert!(store.save_conversation(&first));
        assert!(store.save_conversation(&second));
        let restored = store.load_conversation().expect("saved conversation");
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].content, "two");
    }

    #[test]
    fn conversation_info_reflects_the_document() {
        let (_dir, store) = temp_store();
        let messages = vec![
            ChatMessage::user("a", PersonaId::InnerChild),
            ChatMessage::assistant("b", PersonaId::InnerChild),
        ];
        assert!(store.save_conversation(&messages));
        let info = store.conversation_info().expect("info");
        assert_eq!(info.message_count, 2);
        assert!(info.has_conversation);
    }

    #[test]
    fn sentiments_round_trip() {
        let (_dir, store) = temp_store();
        let records = vec![SentimentRecord {
            emotion: Emotion::Anxious,
            intensity: 0.8,
            confidence: 0.9,
            summary: "work stress".to_string(),
            timestamp: Utc::now(),
        }];
        assert!(store.save_sentiments(&records));
        let restored = store.load_sentiments().expect("saved sentiments");
        assert_eq!(restored, records);
    }
}
