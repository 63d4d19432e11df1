use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{pause, StopReason, DEFAULT_MAX_PAGES};
use crate::store::models::Record;
use crate::youtube::{SearchOrder, SearchRequest, YouTubeApi, MAX_SEARCH_PAGE_SIZE};

/// Items seen but not turned into records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipCounts {
    pub short_form: usize,
    pub no_details: usize,
    pub detail_errors: usize,
    pub duplicates: usize,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub records: Vec<Record>,
    pub stop: StopReason,
    pub pages: usize,
    pub skipped: SkipCounts,
}

/// Runs one logical search against the API, page by page, and turns hits
/// into validated [`Record`]s.
pub struct PagedSearchClient<'a> {
    api: &'a dyn YouTubeApi,
    order: SearchOrder,
    page_delay: Duration,
    max_pages: usize,
}

impl<'a> PagedSearchClient<'a> {
    pub fn new(api: &'a dyn YouTubeApi, page_delay: Duration) -> Self {
        Self {
            api,
            order: SearchOrder::default(),
            page_delay,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Collect up to `target` long-form videos for `query`, optionally
    /// bounded by publication time.
    ///
    /// Every hit costs one detail call; hits whose details fail or are
    /// missing are dropped without retry, as are short-form videos and ids
    /// already accepted in this call. Stops when the target is met (even
    /// mid-page), when pagination ends, at the page ceiling, or on the first
    /// failed page request. Never fails: whatever was accepted is returned,
    /// in acceptance order, with the reason it stopped.
    pub fn search(
        &self,
        query: &str,
        published_after: Option<DateTime<Utc>>,
        published_before: Option<DateTime<Utc>>,
        target: usize,
    ) -> SearchOutcome {
        let mut records: Vec<Record> = Vec::new();
        let mut skipped = SkipCounts::default();
        let mut pages = 0usize;

        if target == 0 {
            return SearchOutcome {
                records,
                stop: StopReason::TargetReached,
                pages,
                skipped,
            };
        }

        let page_size = target.min(MAX_SEARCH_PAGE_SIZE);
        let mut accepted: HashSet<String> = HashSet::new();
        let mut page_token: Option<String> = None;

        let stop = loop {
            if pages >= self.max_pages {
                break StopReason::PageLimit;
            }
            if pages > 0 {
                pause(self.page_delay);
            }

            let req = SearchRequest {
                query: query.to_string(),
                page_size,
                order: self.order,
                published_after,
                published_before,
                page_token: page_token.take(),
            };

            let page = match self.api.search_page(&req) {
                Ok(page) => page,
                Err(e) => {
                    if e.is_quota_exceeded() {
                        warn!("Quota exhausted while searching '{}'", query);
                    } else {
                        warn!("Search page {} for '{}' failed: {}", pages + 1, query, e);
                    }
                    break StopReason::Failed(e);
                }
            };
            pages += 1;

            for stub in page.items {
                if records.len() >= target {
                    break;
                }
                if accepted.contains(&stub.video_id) {
                    skipped.duplicates += 1;
                    continue;
                }

                let details = match self.api.video_details(&stub.video_id) {
                    Ok(Some(details)) => details,
                    Ok(None) => {
                        debug!("No details for {}, skipping", stub.video_id);
                        skipped.no_details += 1;
                        continue;
                    }
                    Err(e) => {
                        debug!("Details for {} failed: {}", stub.video_id, e);
                        skipped.detail_errors += 1;
                        continue;
                    }
                };

                let video_id = stub.video_id.clone();
                match Record::from_search(stub, details, query) {
                    Some(record) => {
                        accepted.insert(video_id);
                        records.push(record);
                    }
                    None => {
                        debug!("Skipping short-form video {}", video_id);
                        skipped.short_form += 1;
                    }
                }
            }

            if records.len() >= target {
                break StopReason::TargetReached;
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break StopReason::Exhausted,
            }
        };

        info!(
            "Search '{}' ({} to {}): {}/{} records over {} pages, stop={}",
            query,
            published_after.map(|d| d.to_rfc3339()).unwrap_or_else(|| "*".into()),
            published_before.map(|d| d.to_rfc3339()).unwrap_or_else(|| "*".into()),
            records.len(),
            target,
            pages,
            stop,
        );

        SearchOutcome {
            records,
            stop,
            pages,
            skipped,
        }
    }
}
