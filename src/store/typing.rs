//! Transient "is typing" indicators.
//!
//! One deadline per (chat, user). A new typing event restarts that entry's
//! deadline instead of stacking another timer; expired entries are dropped by
//! [`TypingTracker::expire`], which the UI calls every tick.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TYPING_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct TypingEntry {
    user_name: String,
    expires_at: Instant,
    /// Arrival order of the first event, so names render stably.
    seq: u64,
}

#[derive(Debug)]
pub struct TypingTracker {
    timeout: Duration,
    entries: HashMap<(String, String), TypingEntry>,
    next_seq: u64,
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_TIMEOUT)
    }
}

impl TypingTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Mark `user_id` as typing in `chat_id` until `now + timeout`.
    pub fn start(&mut self, chat_id: &str, user_id: &str, user_name: &str, now: Instant) {
        let expires_at = now + self.timeout;
        let key = (chat_id.to_string(), user_id.to_string());
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.expires_at = expires_at;
                entry.user_name = user_name.to_string();
            }
            None => {
                self.next_seq += 1;
                self.entries.insert(
                    key,
                    TypingEntry {
                        user_name: user_name.to_string(),
                        expires_at,
                        seq: self.next_seq,
                    },
                );
            }
        }
    }

    /// Drop entries whose deadline has passed. Returns true if any were dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before != self.entries.len()
    }

    /// Names currently typing in `chat_id`, in order of arrival, without duplicates.
    pub fn names(&self, chat_id: &str) -> Vec<&str> {
        let mut entries: Vec<&TypingEntry> = self
            .entries
            .iter()
            .filter(|((chat, _), _)| chat == chat_id)
            .map(|(_, entry)| entry)
            .collect();
        entries.sort_by_key(|entry| entry.seq);

        let mut names: Vec<&str> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !names.contains(&entry.user_name.as_str()) {
                names.push(&entry.user_name);
            }
        }
        names
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.expires_at).min()
    }

    pub fn retain_chats<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|(chat, _), _| keep(chat));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
