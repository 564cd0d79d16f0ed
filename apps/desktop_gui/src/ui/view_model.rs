use chrono::{DateTime, Local, TimeZone, Utc};
use shared::domain::{Post, PostId};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub body: String,
    pub timestamp_label: String,
    pub is_being_edited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty { filtered: bool },
    Cards(Vec<PostCard>),
}

impl ListView {
    pub fn len(&self) -> usize {
        match self {
            ListView::Empty { .. } => 0,
            ListView::Cards(cards) => cards.len(),
        }
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            ListView::Empty { filtered: true } => Some("No posts match this author filter."),
            ListView::Empty { filtered: false } => Some("No posts yet. Write the first one!"),
            ListView::Cards(_) => None,
        }
    }
}

pub fn build_list_view(posts: Vec<Post>, author_filter: &str, editing: Option<&PostId>) -> ListView {
    if posts.is_empty() {
        return ListView::Empty {
            filtered: !author_filter.is_empty(),
        };
    }

    ListView::Cards(
        posts
            .into_iter()
            .map(|post| PostCard {
                is_being_edited: editing == Some(&post.id),
                timestamp_label: format_timestamp_in(post.timestamp, &Local),
                id: post.id,
                title: post.title,
                author: post.author,
                body: post.body,
            })
            .collect(),
    )
}

pub fn format_timestamp_in<Tz>(timestamp: DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp
        .with_timezone(zone)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
