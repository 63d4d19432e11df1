//! Scripted YouTube API for integration tests.
//!
//! Search pages are keyed by the request's publication bounds and page
//! token (and optionally the query), so each window and the fallback pass
//! can be scripted separately.
//! Anything not scripted answers with an empty, final page. Every video is
//! five minutes long unless a test says otherwise.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::HashMap;

use ytc::collect::TimeRange;
use ytc::youtube::{
    ApiError, CommentPage, CommentRequest, RawComment, SearchPage, SearchRequest, VideoDetails,
    VideoStub, YouTubeApi,
};

pub type Bounds = (Option<DateTime<Utc>>, Option<DateTime<Utc>>);

/// Query (`None` matches any), bounds, page token.
type SearchKey = (Option<String>, Bounds, Option<String>);

enum Detail {
    Duration(String),
    Missing,
    Fails,
}

enum Scripted<T> {
    Page(T),
    Fails(u16, String),
}

#[derive(Default)]
pub struct MockApi {
    search: HashMap<SearchKey, Scripted<(Vec<String>, Option<String>)>>,
    details: HashMap<String, Detail>,
    titles: HashMap<String, String>,
    comments: HashMap<(String, Option<String>), Scripted<(Vec<(String, String)>, Option<String>)>>,
    pub search_calls: RefCell<Vec<SearchRequest>>,
    pub detail_calls: RefCell<Vec<String>>,
    pub comment_calls: RefCell<Vec<CommentRequest>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one search page for `bounds` at `token`, for any query.
    pub fn page(self, bounds: Bounds, token: Option<&str>, ids: &[&str], next: Option<&str>) -> Self {
        self.page_for(None, bounds, token, ids, next)
    }

    /// Script a page that only `query` sees. Takes precedence over `page`.
    pub fn query_page(
        self,
        query: &str,
        bounds: Bounds,
        token: Option<&str>,
        ids: &[&str],
        next: Option<&str>,
    ) -> Self {
        self.page_for(Some(query), bounds, token, ids, next)
    }

    fn page_for(
        mut self,
        query: Option<&str>,
        bounds: Bounds,
        token: Option<&str>,
        ids: &[&str],
        next: Option<&str>,
    ) -> Self {
        self.search.insert(
            (query.map(String::from), bounds, token.map(String::from)),
            Scripted::Page((
                ids.iter().map(|s| s.to_string()).collect(),
                next.map(String::from),
            )),
        );
        self
    }

    pub fn failing_page(mut self, bounds: Bounds, token: Option<&str>, status: u16, body: &str) -> Self {
        self.search.insert(
            (None, bounds, token.map(String::from)),
            Scripted::Fails(status, body.to_string()),
        );
        self
    }

    pub fn duration(mut self, id: &str, iso: &str) -> Self {
        self.details.insert(id.to_string(), Detail::Duration(iso.to_string()));
        self
    }

    pub fn short(self, id: &str) -> Self {
        self.duration(id, "PT45S")
    }

    pub fn missing(mut self, id: &str) -> Self {
        self.details.insert(id.to_string(), Detail::Missing);
        self
    }

    pub fn detail_fails(mut self, id: &str) -> Self {
        self.details.insert(id.to_string(), Detail::Fails);
        self
    }

    pub fn title(mut self, id: &str, title: &str) -> Self {
        self.titles.insert(id.to_string(), title.to_string());
        self
    }

    /// Script one comment page for `video` at `token`: (author, text) pairs.
    pub fn comments(
        mut self,
        video: &str,
        token: Option<&str>,
        items: &[(&str, &str)],
        next: Option<&str>,
    ) -> Self {
        self.comments.insert(
            (video.to_string(), token.map(String::from)),
            Scripted::Page((
                items
                    .iter()
                    .map(|(a, t)| (a.to_string(), t.to_string()))
                    .collect(),
                next.map(String::from),
            )),
        );
        self
    }

    pub fn failing_comments(mut self, video: &str, status: u16) -> Self {
        self.comments.insert(
            (video.to_string(), None),
            Scripted::Fails(status, "commentsDisabled".to_string()),
        );
        self
    }

    pub fn search_calls_for(&self, bounds: Bounds) -> usize {
        self.search_calls
            .borrow()
            .iter()
            .filter(|r| (r.published_after, r.published_before) == bounds)
            .count()
    }
}

impl YouTubeApi for MockApi {
    fn search_page(&self, req: &SearchRequest) -> Result<SearchPage, ApiError> {
        self.search_calls.borrow_mut().push(req.clone());
        let bounds = (req.published_after, req.published_before);
        let specific: SearchKey = (Some(req.query.clone()), bounds, req.page_token.clone());
        let any: SearchKey = (None, bounds, req.page_token.clone());
        match self.search.get(&specific).or_else(|| self.search.get(&any)) {
            None => Ok(SearchPage::default()),
            Some(Scripted::Fails(status, body)) => Err(ApiError::Status {
                status: *status,
                body: body.clone(),
            }),
            Some(Scripted::Page((ids, next))) => Ok(SearchPage {
                items: ids.iter().map(|id| self.stub(id)).collect(),
                next_page_token: next.clone(),
            }),
        }
    }

    fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ApiError> {
        self.detail_calls.borrow_mut().push(video_id.to_string());
        let duration = match self.details.get(video_id) {
            None => "PT5M".to_string(),
            Some(Detail::Duration(d)) => d.clone(),
            Some(Detail::Missing) => return Ok(None),
            Some(Detail::Fails) => {
                return Err(ApiError::Malformed(format!("no details for {video_id}")))
            }
        };
        Ok(Some(VideoDetails {
            view_count: 1000,
            like_count: 10,
            comment_count: 3,
            tags: vec!["news".to_string()],
            duration,
            definition: "hd".to_string(),
        }))
    }

    fn comment_page(&self, req: &CommentRequest) -> Result<CommentPage, ApiError> {
        self.comment_calls.borrow_mut().push(req.clone());
        let key = (req.video_id.clone(), req.page_token.clone());
        match self.comments.get(&key) {
            None => Ok(CommentPage::default()),
            Some(Scripted::Fails(status, body)) => Err(ApiError::Status {
                status: *status,
                body: body.clone(),
            }),
            Some(Scripted::Page((items, next))) => Ok(CommentPage {
                items: items
                    .iter()
                    .enumerate()
                    .map(|(i, (author, text))| RawComment {
                        comment_id: format!(
                            "{}-{}-{}",
                            req.video_id,
                            req.page_token.as_deref().unwrap_or("p0"),
                            i
                        ),
                        author: author.clone(),
                        text: text.clone(),
                        like_count: i as u64,
                        published_at: "2024-05-01T10:00:00Z".to_string(),
                    })
                    .collect(),
                next_page_token: next.clone(),
            }),
        }
    }
}

impl MockApi {
    fn stub(&self, id: &str) -> VideoStub {
        VideoStub {
            video_id: id.to_string(),
            title: self
                .titles
                .get(id)
                .cloned()
                .unwrap_or_else(|| format!("Gaza war update {id}")),
            description: format!("Report {id}"),
            published_at: "2024-05-01T09:00:00Z".to_string(),
            channel_title: "World News".to_string(),
        }
    }
}

/// The default collection range, 2023-10-07 to 2025-10-10.
pub fn range() -> TimeRange {
    TimeRange::parse_dates("2023-10-07", "2025-10-10").unwrap()
}

pub fn bounds(r: TimeRange) -> Bounds {
    (Some(r.start), Some(r.end))
}

/// Bounds of the first half, second half and the whole of `r`.
pub fn pass_bounds(r: TimeRange) -> (Bounds, Bounds, Bounds) {
    let (a, b) = r.split();
    (bounds(a), bounds(b), bounds(r))
}
