// Raw YouTube Data API v3 response shapes. Every field is optional so that a
// missing key on one item drops that item instead of failing the page; only a
// missing `items` array is treated as a malformed response.

use serde::Deserialize;

use super::{ApiError, CommentPage, RawComment, SearchPage, VideoDetails, VideoStub};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchListResponse {
    next_page_token: Option<String>,
    items: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: Option<ResourceId>,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    published_at: Option<String>,
    title: Option<String>,
    description: Option<String>,
    channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    items: Option<Vec<VideoResource>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    tags: Option<Vec<String>>,
}

// Counts arrive as decimal strings ("12345"), occasionally as numbers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<serde_json::Value>,
    like_count: Option<serde_json::Value>,
    comment_count: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
    definition: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadListResponse {
    next_page_token: Option<String>,
    items: Option<Vec<CommentThread>>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    id: Option<String>,
    snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    author_display_name: Option<String>,
    text_display: Option<String>,
    text_original: Option<String>,
    like_count: Option<serde_json::Value>,
    published_at: Option<String>,
}

impl SearchListResponse {
    pub(crate) fn into_page(self) -> Result<SearchPage, ApiError> {
        let items = self
            .items
            .ok_or_else(|| ApiError::Malformed("search response has no `items`".into()))?;

        let items = items
            .into_iter()
            .filter_map(|r| {
                let video_id = r.id?.video_id.filter(|id| !id.is_empty())?;
                let snippet = r.snippet?;
                Some(VideoStub {
                    video_id,
                    title: snippet.title.unwrap_or_default(),
                    description: snippet.description.unwrap_or_default(),
                    published_at: snippet.published_at.unwrap_or_default(),
                    channel_title: snippet.channel_title.unwrap_or_default(),
                })
            })
            .collect();

        Ok(SearchPage {
            items,
            next_page_token: self.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

impl VideoListResponse {
    pub(crate) fn into_details(self) -> Result<Option<VideoDetails>, ApiError> {
        let items = self
            .items
            .ok_or_else(|| ApiError::Malformed("videos response has no `items`".into()))?;

        let Some(video) = items.into_iter().next() else {
            return Ok(None);
        };

        let stats = video.statistics;
        let details = video.content_details;

        Ok(Some(VideoDetails {
            view_count: count(stats.as_ref().and_then(|s| s.view_count.as_ref())),
            like_count: count(stats.as_ref().and_then(|s| s.like_count.as_ref())),
            comment_count: count(stats.as_ref().and_then(|s| s.comment_count.as_ref())),
            tags: video.snippet.and_then(|s| s.tags).unwrap_or_default(),
            duration: details
                .as_ref()
                .and_then(|d| d.duration.clone())
                .unwrap_or_default(),
            definition: details.and_then(|d| d.definition).unwrap_or_default(),
        }))
    }
}

impl CommentThreadListResponse {
    pub(crate) fn into_page(self) -> Result<CommentPage, ApiError> {
        let items = self
            .items
            .ok_or_else(|| ApiError::Malformed("commentThreads response has no `items`".into()))?;

        let items = items
            .into_iter()
            .filter_map(|thread| {
                let comment_id = thread.id?;
                let s = thread.snippet?.top_level_comment?.snippet?;
                let text = s.text_display.or(s.text_original)?;
                Some(RawComment {
                    comment_id,
                    author: s.author_display_name.unwrap_or_default(),
                    text,
                    like_count: count(s.like_count.as_ref()),
                    published_at: s.published_at.unwrap_or_default(),
                })
            })
            .collect();

        Ok(CommentPage {
            items,
            next_page_token: self.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

/// Non-negative count from a number or numeric string; anything else is 0.
fn count(v: Option<&serde_json::Value>) -> u64 {
    v.and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok())))
        .unwrap_or(0)
}
