use serde::{Deserialize, Serialize};

use crate::filters::{is_target_language, parse_duration, MIN_DURATION_SECS};
use crate::youtube::{RawComment, VideoDetails, VideoStub};

/// Sentiment tag every comment starts with; scoring happens downstream.
pub const DEFAULT_SENTIMENT: &str = "neutral";

/// One collected video with its comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_title: String,
    pub query: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub duration: String,
    #[serde(default)]
    pub definition: String,
    pub duration_seconds: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub comments_count: usize,
}

impl Record {
    /// Build a record from a search hit and its details. Returns `None` for
    /// short-form videos, so no record below [`MIN_DURATION_SECS`] exists.
    pub fn from_search(stub: VideoStub, details: VideoDetails, query: &str) -> Option<Self> {
        let duration_seconds = parse_duration(&details.duration);
        if duration_seconds < MIN_DURATION_SECS {
            return None;
        }

        Some(Record {
            video_id: stub.video_id,
            title: stub.title,
            description: stub.description,
            published_at: stub.published_at,
            channel_title: stub.channel_title,
            query: query.to_string(),
            view_count: details.view_count,
            like_count: details.like_count,
            comment_count: details.comment_count,
            tags: details.tags,
            duration: details.duration,
            definition: details.definition,
            duration_seconds,
            comments: Vec::new(),
            comments_count: 0,
        })
    }

    /// Attach fetched comments. The count always mirrors the list.
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments_count = comments.len();
        self.comments = comments;
        self
    }
}

/// A top-level comment that passed the language filter.
///
/// Collection builds these only through [`Comment::accept`]; loading a saved
/// document trusts what was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub video_id: String,
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub like_count: u64,
    pub published_at: String,
    pub sentiment: String,
}

impl Comment {
    /// Admit a raw comment for `video_id`, or `None` if its text is not
    /// English.
    pub fn accept(raw: RawComment, video_id: &str) -> Option<Self> {
        if !is_target_language(&raw.text) {
            return None;
        }
        Some(Comment {
            comment_id: raw.comment_id,
            video_id: video_id.to_string(),
            author: raw.author,
            text: raw.text,
            like_count: raw.like_count,
            published_at: raw.published_at,
            sentiment: DEFAULT_SENTIMENT.to_string(),
        })
    }
}

/// Separator for tags in the flat video export.
pub const TAG_SEPARATOR: &str = "|";

/// One line of `youtube_videos.csv`: a [`Record`] without its nested
/// comments, tags joined into a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRow {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_title: String,
    pub query: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub tags: String,
    pub duration: String,
    pub definition: String,
    pub duration_seconds: u64,
    pub comments_count: usize,
}

impl From<&Record> for VideoRow {
    fn from(r: &Record) -> Self {
        VideoRow {
            video_id: r.video_id.clone(),
            title: r.title.clone(),
            description: r.description.clone(),
            published_at: r.published_at.clone(),
            channel_title: r.channel_title.clone(),
            query: r.query.clone(),
            view_count: r.view_count,
            like_count: r.like_count,
            comment_count: r.comment_count,
            tags: r.tags.join(TAG_SEPARATOR),
            duration: r.duration.clone(),
            definition: r.definition.clone(),
            duration_seconds: r.duration_seconds,
            comments_count: r.comments_count,
        }
    }
}

/// Summary returned by `ytc stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub videos: usize,
    pub comments: usize,
    pub total_views: u64,
    pub queries: Vec<QueryCount>,
    pub top_commenters: Vec<AuthorCount>,
    pub videos_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub videos: usize,
    pub views: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub comments: usize,
}
