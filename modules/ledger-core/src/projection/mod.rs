//! In-memory state rebuilt from the ledger file.
//!
//! A projection only changes through [`Projection::apply`], both on replay
//! and after a live command has been persisted, so the state after a restart
//! is the same as the state before it.

pub mod bimap;
pub mod chat_log;
pub mod credentials;

pub use bimap::BiMap;
pub use chat_log::ChatLog;
pub use credentials::Credentials;

use crate::error::Result;
use crate::storage::{LogStore, Record, ReplayScan};
use ledger_types::ChatMessage;
use std::collections::HashMap;

pub trait Projection: Default {
    fn credentials(&self) -> &Credentials;

    fn apply(&mut self, record: &Record);

    /// Write a batch that is about to be applied.
    fn persist(&self, store: &LogStore, records: &[Record]) -> Result<()> {
        store.append(records)
    }

    /// Records to rewrite the file with after replay, if it needs compacting.
    fn compaction(&self, _scan: &ReplayScan) -> Option<Vec<Record>> {
        None
    }
}

// =====================================================
// Chat
// =====================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub credentials: Credentials,
    pub chat: ChatLog,
}

impl ChatState {
    /// Credentials followed by the retained chat tail.
    pub fn snapshot(&self) -> Vec<Record> {
        let users = self
            .credentials
            .iter()
            .map(|(username, password)| Record::user(username, password));
        let messages = self
            .chat
            .iter()
            .map(|m| Record::chat(&m.username, m.kind, &m.content));
        users.chain(messages).collect()
    }
}

impl Projection for ChatState {
    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn apply(&mut self, record: &Record) {
        match record {
            Record::User { username, password } => {
                self.credentials.insert_new(username, password);
            }
            Record::Chat {
                username,
                kind,
                content,
            } => {
                self.chat.push(ChatMessage {
                    username: username.clone(),
                    kind: *kind,
                    content: content.clone(),
                });
            }
            Record::Memo { .. } => {
                log::debug!("Ignoring memo record in chat ledger");
            }
        }
    }

    /// Appends while the persisted tail stays within the bound; otherwise
    /// rewrites the file with the state the batch will produce.
    fn persist(&self, store: &LogStore, records: &[Record]) -> Result<()> {
        let incoming = records
            .iter()
            .filter(|r| matches!(r, Record::Chat { .. }))
            .count();

        if self.chat.len() + incoming <= self.chat.capacity() {
            return store.append(records);
        }

        let mut next = self.clone();
        for record in records {
            next.apply(record);
        }
        store.rewrite(&next.snapshot())
    }

    fn compaction(&self, scan: &ReplayScan) -> Option<Vec<Record>> {
        let persisted = scan
            .records
            .iter()
            .filter(|r| matches!(r, Record::Chat { .. }))
            .count();
        (persisted > self.chat.len()).then(|| self.snapshot())
    }
}

// =====================================================
// Memo
// =====================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoState {
    pub credentials: Credentials,
    memos: HashMap<String, BiMap>,
}

impl MemoState {
    pub fn memos(&self, username: &str) -> Option<&BiMap> {
        self.memos.get(username)
    }

    pub fn pair_count(&self) -> usize {
        self.memos.values().map(BiMap::pair_count).sum()
    }
}

impl Projection for MemoState {
    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn apply(&mut self, record: &Record) {
        match record {
            Record::User { username, password } => {
                self.credentials.insert_new(username, password);
                self.memos.entry(username.clone()).or_default();
            }
            Record::Memo {
                username,
                key,
                value,
            } => {
                self.memos
                    .entry(username.clone())
                    .or_default()
                    .restore(key, value);
            }
            Record::Chat { .. } => {
                log::debug!("Ignoring chat record in memo ledger");
            }
        }
    }
}
