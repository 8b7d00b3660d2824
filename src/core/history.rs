//! # Conversation History
//!
//! An ordered log of question/answer pairs, mirrored in full to a single
//! key-value slot on every change.
//!
//! ```text
//! ConversationHistory
//! ├── entries[0]  { ques, ans[], id }   // oldest
//! ├── entries[1]
//! └── entries[n]                        // newest
//! ```
//!
//! The persisted form is a bare JSON array using the `ques` / `ans` / `id`
//! field names. `question` and `answerLines` are accepted when reading.

use std::io;
use std::path::Path;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::action::Effect;
use crate::core::storage::{FileStore, KeyValueStore, default_storage_dir};

/// Key of the slot holding the serialized history.
pub const HISTORY_KEY: &str = "chatHistory";

/// One question/answer pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    #[serde(rename = "ques", alias = "question")]
    pub question: String,
    #[serde(rename = "ans", alias = "answerLines")]
    pub answer_lines: Vec<String>,
    /// Unix timestamp (ms) when the entry was recorded. Unique within a history.
    pub id: i64,
}

/// Chronologically ordered entries. Insertion order is the only ordering.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
    /// Bumped whenever existing entries change; appends leave it alone.
    #[serde(skip)]
    revision: u64,
}

impl PartialEq for ConversationHistory {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ConversationHistory {}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries,
            revision: 0,
        }
    }

    /// Changes only when an existing entry is edited or removed, so views can
    /// keep measurements of earlier entries across plain appends.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Position of the entry with `id` in chronological order.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Newest first, for the sidebar index.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Appends a new entry stamped with the current time and returns its id.
    pub fn append(&mut self, question: String, answer_lines: Vec<String>) -> i64 {
        self.append_at(question, answer_lines, Utc::now().timestamp_millis())
    }

    /// Appends with an explicit timestamp. If `now_ms` does not move past the
    /// last entry's id, the id is bumped to `last + 1` so ids stay unique.
    pub fn append_at(&mut self, question: String, answer_lines: Vec<String>, now_ms: i64) -> i64 {
        let id = match self.entries.last() {
            Some(last) if now_ms <= last.id => last.id.saturating_add(1),
            _ => now_ms,
        };
        self.entries.push(HistoryEntry {
            question,
            answer_lines,
            id,
        });
        id
    }

    /// Replaces the answer lines of every entry whose question equals
    /// `question` exactly. Ids and positions are untouched.
    /// Returns how many entries were updated.
    pub fn replace_answers(&mut self, question: &str, answer_lines: &[String]) -> usize {
        let mut updated = 0;
        for entry in self.entries.iter_mut().filter(|e| e.question == question) {
            entry.answer_lines = answer_lines.to_vec();
            updated += 1;
        }
        if updated > 0 {
            self.revision += 1;
        }
        updated
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.revision += 1;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Persists a `ConversationHistory` into one slot of a `KeyValueStore`.
pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl HistoryStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    /// Opens the history slot in a `FileStore` under `dir`, or under
    /// `~/.askpad/storage/` when no directory is configured.
    pub fn open_file(dir: Option<&Path>) -> io::Result<Self> {
        let store = match dir {
            Some(dir) => FileStore::open(dir)?,
            None => FileStore::open(default_storage_dir()?)?,
        };
        info!("History storage at {}", store.dir().display());
        Ok(Self::new(Box::new(store)))
    }

    pub fn with_key(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Reads the persisted history. A missing slot is an empty history.
    pub fn load(&self) -> io::Result<ConversationHistory> {
        match self.store.get(&self.key)? {
            Some(json) => ConversationHistory::from_json(&json)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(ConversationHistory::new()),
        }
    }

    /// Like `load`, but unreadable or malformed state is logged and treated
    /// as empty. The next `save` overwrites it.
    pub fn load_or_default(&self) -> ConversationHistory {
        match self.load() {
            Ok(history) => {
                info!("Loaded {} history entries", history.len());
                history
            }
            Err(e) => {
                warn!("Failed to load history from '{}', starting empty: {}", self.key, e);
                ConversationHistory::new()
            }
        }
    }

    /// Overwrites the slot with the full history.
    pub fn save(&self, history: &ConversationHistory) -> io::Result<()> {
        let json = history
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.store.set(&self.key, &json)?;
        debug!("History saved: {} entries", history.len());
        Ok(())
    }

    /// Removes the persisted copy entirely.
    pub fn remove(&self) -> io::Result<()> {
        self.store.remove(&self.key)?;
        debug!("History slot '{}' removed", self.key);
        Ok(())
    }

    /// Carries out the storage half of a reducer `Effect`. Failures are
    /// logged; the in-memory history stays authoritative.
    pub fn apply(&self, effect: &Effect, history: &ConversationHistory) {
        let result = match effect {
            Effect::Persist { .. } => self.save(history),
            Effect::RemovePersisted => self.remove(),
            _ => return,
        };
        if let Err(e) = result {
            warn!("Failed to persist history: {}", e);
        }
    }
}
