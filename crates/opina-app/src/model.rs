// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::FeedbackId;

/// One entry in the remote feedback collection. The timestamps are set by the
/// remote service and carried through opaquely; the client never parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FeedbackRecord {
    pub fn new(
        id: impl Into<FeedbackId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Title,
    Description,
}

impl Field {
    pub const ALL: [Self; 2] = [Self::Title, Self::Description];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "name",
            Self::Description => "feedback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Transient user-visible message. Wording and display duration are
/// presentation concerns; the controller only records level and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Case-insensitive exact-match set of protected submitter names. Entries
/// whose title matches cannot be edited or deleted from the front end. This
/// is a business rule, not a security boundary: callers apply it before
/// invoking `begin_edit`/`delete_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Denylist {
    names: Vec<String>,
}

impl Denylist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lowered: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        lowered.sort();
        lowered.dedup();
        Self { names: lowered }
    }

    pub fn blocks(&self, title: &str) -> bool {
        let lowered = title.trim().to_lowercase();
        self.names.binary_search(&lowered).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
