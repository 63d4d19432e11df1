pub mod comments;
pub mod search;
pub mod session;
pub mod window;

use std::fmt;
use std::time::Duration;

use crate::youtube::ApiError;

pub use comments::{CommentFetcher, CommentOutcome};
pub use search::{PagedSearchClient, SearchOutcome, SkipCounts};
pub use session::{CollectionPlan, CollectionSession, QueryReport, RunManifest, SessionResult};
pub use window::{Collected, QueryTarget, TimeRange, WindowedCollector};

/// Page ceiling per logical search or comment fetch.
pub const DEFAULT_MAX_PAGES: usize = 20;

/// Why a paged call stopped. Only `Failed` means something went wrong, and
/// even then the caller keeps whatever had been accepted.
#[derive(Debug)]
pub enum StopReason {
    TargetReached,
    Exhausted,
    PageLimit,
    Failed(ApiError),
}

impl StopReason {
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::Failed(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetReached => f.write_str("target-reached"),
            StopReason::Exhausted => f.write_str("exhausted"),
            StopReason::PageLimit => f.write_str("page-limit"),
            StopReason::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

/// Fixed pauses that keep the request rate under the API quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Between successive search or comment pages.
    pub page_delay: Duration,
    /// Between videos while fetching comments.
    pub video_delay: Duration,
    /// Between queries.
    pub query_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            page_delay: Duration::from_millis(100),
            video_delay: Duration::from_millis(300),
            query_delay: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    /// No pauses at all; for tests and local mocks.
    pub fn none() -> Self {
        Pacing {
            page_delay: Duration::ZERO,
            video_delay: Duration::ZERO,
            query_delay: Duration::ZERO,
        }
    }
}

pub(crate) fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}
