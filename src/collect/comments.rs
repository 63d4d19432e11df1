use std::time::Duration;
use tracing::{debug, warn};

use super::{pause, StopReason, DEFAULT_MAX_PAGES};
use crate::store::models::Comment;
use crate::youtube::{CommentRequest, YouTubeApi, MAX_COMMENT_PAGE_SIZE};

#[derive(Debug)]
pub struct CommentOutcome {
    pub comments: Vec<Comment>,
    pub stop: StopReason,
    pub pages: usize,
    /// Candidates dropped by the language filter.
    pub rejected: usize,
}

/// Pages through the top-level comments of one video.
pub struct CommentFetcher<'a> {
    api: &'a dyn YouTubeApi,
    page_delay: Duration,
    max_pages: usize,
}

impl<'a> CommentFetcher<'a> {
    pub fn new(api: &'a dyn YouTubeApi, page_delay: Duration) -> Self {
        Self {
            api,
            page_delay,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetch up to `max_comments` English comments for `video_id`, in the
    /// API's relevance order. Non-English candidates are dropped and do not
    /// count toward the cap. A failed page ends the fetch with what was
    /// already accepted (comments disabled on a video is the usual case).
    pub fn fetch(&self, video_id: &str, max_comments: usize) -> CommentOutcome {
        let mut comments = Vec::new();
        let mut rejected = 0usize;
        let mut pages = 0usize;

        if max_comments == 0 {
            return CommentOutcome {
                comments,
                stop: StopReason::TargetReached,
                pages,
                rejected,
            };
        }

        let page_size = max_comments.min(MAX_COMMENT_PAGE_SIZE);
        let mut page_token: Option<String> = None;

        let stop = loop {
            if pages >= self.max_pages {
                break StopReason::PageLimit;
            }
            if pages > 0 {
                pause(self.page_delay);
            }

            let req = CommentRequest {
                video_id: video_id.to_string(),
                page_size,
                page_token: page_token.take(),
            };

            let page = match self.api.comment_page(&req) {
                Ok(page) => page,
                Err(e) => {
                    warn!("Comments for {} stopped after {} pages: {}", video_id, pages, e);
                    break StopReason::Failed(e);
                }
            };
            pages += 1;

            for raw in page.items {
                if comments.len() >= max_comments {
                    break;
                }
                match Comment::accept(raw, video_id) {
                    Some(c) => comments.push(c),
                    None => rejected += 1,
                }
            }

            if comments.len() >= max_comments {
                break StopReason::TargetReached;
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break StopReason::Exhausted,
            }
        };

        debug!(
            "Comments for {}: {} accepted, {} rejected, {} pages, stop={}",
            video_id,
            comments.len(),
            rejected,
            pages,
            stop
        );

        CommentOutcome {
            comments,
            stop,
            pages,
            rejected,
        }
    }
}
