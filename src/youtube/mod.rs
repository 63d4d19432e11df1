pub mod error;
pub mod http;
mod wire;

use chrono::{DateTime, Utc};

pub use error::ApiError;
pub use http::HttpTransport;

/// Largest page the search endpoint will return.
pub const MAX_SEARCH_PAGE_SIZE: usize = 50;
/// Largest page the commentThreads endpoint will return.
pub const MAX_COMMENT_PAGE_SIZE: usize = 100;

/// Result ordering for the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    Date,
    Relevance,
    ViewCount,
}

impl SearchOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "date" => Some(SearchOrder::Date),
            "relevance" => Some(SearchOrder::Relevance),
            "viewcount" | "views" => Some(SearchOrder::ViewCount),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SearchOrder::Date => "date",
            SearchOrder::Relevance => "relevance",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

/// One page request against the search endpoint (`type=video` is implied).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub page_size: usize,
    pub order: SearchOrder,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub page_token: Option<String>,
}

/// A search hit before enrichment: snippet fields only.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStub {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_title: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<VideoStub>,
    pub next_page_token: Option<String>,
}

/// Statistics and content details for one video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDetails {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub tags: Vec<String>,
    pub duration: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentRequest {
    pub video_id: String,
    pub page_size: usize,
    pub page_token: Option<String>,
}

/// A top-level comment as returned by the API, not yet language-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComment {
    pub comment_id: String,
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub items: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

/// The three remote endpoints the collector talks to.
///
/// Every call is blocking. Implementations report failures as [`ApiError`];
/// callers decide what a failure means. [`HttpTransport`] is the real one,
/// tests plug in scripted fakes.
pub trait YouTubeApi {
    /// Fetch one page of search results.
    fn search_page(&self, req: &SearchRequest) -> Result<SearchPage, ApiError>;

    /// Fetch statistics and content details for one video. `Ok(None)` when
    /// the API knows nothing about the id (deleted, private).
    fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ApiError>;

    /// Fetch one page of top-level comment threads, relevance ordered.
    fn comment_page(&self, req: &CommentRequest) -> Result<CommentPage, ApiError>;
}
