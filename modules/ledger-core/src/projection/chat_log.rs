use crate::constants::MAX_MESSAGES;
use ledger_types::ChatMessage;
use std::collections::VecDeque;

/// Insertion-ordered chat history that evicts its oldest entry once full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::with_capacity(MAX_MESSAGES)
    }
}

impl ChatLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, returning the evicted one if the log was full.
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.messages.push_back(message);
        if self.messages.len() > self.capacity {
            self.messages.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }
}
