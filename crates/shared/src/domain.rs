use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(PostId);

impl PostId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The three fields a user can type into the post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub author: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            body: body.into(),
        }
    }

    /// All required fields carry visible text.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.author.trim().is_empty()
            && !self.body.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl Post {
    pub fn from_draft(draft: PostDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: PostId::generate(),
            title: draft.title,
            author: draft.author,
            body: draft.body,
            timestamp,
        }
    }

    /// Overwrites the editable fields; `id` and `timestamp` stay as they were.
    pub fn apply_draft(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.author = draft.author;
        self.body = draft.body;
    }

    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            body: self.body.clone(),
        }
    }

    /// Case-insensitive substring match on the author; an empty needle matches everything.
    pub fn author_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.author.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Author,
    #[default]
    Newest,
}

impl SortKey {
    /// `"author"` selects author order; every other selector value falls back to newest first.
    pub fn from_selector(value: &str) -> Self {
        if value == "author" {
            Self::Author
        } else {
            Self::Newest
        }
    }

    pub fn as_selector(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Newest => "date",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Author => "Author (A-Z)",
            Self::Newest => "Newest first",
        }
    }
}
