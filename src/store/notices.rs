use std::collections::VecDeque;

use chrono::{DateTime, Utc};

const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient user-visible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeLevel::Info, title.into(), body.into());
    }

    pub fn error(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(NoticeLevel::Error, title.into(), body.into());
    }

    fn push(&mut self, level: NoticeLevel, title: String, body: String) {
        match level {
            NoticeLevel::Info => log::info!("{title}: {body}"),
            NoticeLevel::Error => log::warn!("{title}: {body}"),
        }
        self.items.push_back(Notice {
            level,
            title,
            body,
            at: Utc::now(),
        });
        // Oldest notices go first once the queue is full
        while self.items.len() > MAX_NOTICES {
            self.items.pop_front();
        }
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().rev()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Preview used in new-message notices: first 50 characters plus an ellipsis.
pub fn preview(content: &str) -> String {
    const LIMIT: usize = 50;
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
