use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

use super::search::PagedSearchClient;
use crate::store::models::Record;

/// Closed publication-time range, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            bail!("Start of range ({start}) must be before its end ({end})");
        }
        Ok(TimeRange { start, end })
    }

    /// Whole days from the start of `from` to the last second of `to`.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        let start = from
            .and_hms_opt(0, 0, 0)
            .context("Invalid start date")?
            .and_utc();
        let end = to
            .and_hms_opt(23, 59, 59)
            .context("Invalid end date")?
            .and_utc();
        if from >= to {
            bail!("Start date {from} must be before end date {to}");
        }
        Self::new(start, end)
    }

    /// Parse `YYYY-MM-DD` bounds.
    pub fn parse_dates(from: &str, to: &str) -> Result<Self> {
        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid start date '{from}', expected YYYY-MM-DD"))?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid end date '{to}', expected YYYY-MM-DD"))?;
        Self::from_dates(from, to)
    }

    /// Two contiguous halves by elapsed time. The midpoint ends the first
    /// half and starts the second.
    pub fn split(&self) -> (TimeRange, TimeRange) {
        let mid = self.start + (self.end - self.start) / 2;
        (
            TimeRange {
                start: self.start,
                end: mid,
            },
            TimeRange {
                start: mid,
                end: self.end,
            },
        )
    }
}

/// One query's collection goal.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTarget {
    pub query: String,
    pub target: usize,
    pub range: TimeRange,
}

/// What the collector delivered for one query.
#[derive(Debug)]
pub struct Collected {
    pub query: String,
    pub target: usize,
    pub records: Vec<Record>,
    /// Per-pass delivered counts before dedup: first window, second window.
    pub window_counts: [usize; 2],
    /// New records the fallback pass contributed, if it ran.
    pub fallback_added: Option<usize>,
    /// Records dropped because an earlier pass of this query had them.
    pub duplicates_dropped: usize,
    /// Records dropped because their id was in the exclusion set.
    pub already_collected: usize,
    /// Passes that ended on a failed request.
    pub failed_passes: usize,
}

impl Collected {
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.records.len())
    }
}

/// Spreads a query over two halves of its time range, then backfills from
/// the whole range if the halves came up short.
///
/// A single unwindowed search clusters around one end of the range; forcing
/// half the budget into each half widens temporal coverage. The result never
/// holds two records with the same video id and never exceeds the target.
pub struct WindowedCollector<'a> {
    search: PagedSearchClient<'a>,
}

impl<'a> WindowedCollector<'a> {
    pub fn new(search: PagedSearchClient<'a>) -> Self {
        Self { search }
    }

    pub fn collect(&self, qt: &QueryTarget) -> Collected {
        self.collect_excluding(qt, &HashSet::new())
    }

    /// Like [`collect`](Self::collect), but ids in `exclude` never count
    /// toward the target, so the fallback pass can make up for them.
    pub fn collect_excluding(&self, qt: &QueryTarget, exclude: &HashSet<String>) -> Collected {
        let target = qt.target;
        let (first, second) = qt.range.split();
        // odd remainder goes to the earlier half
        let second_target = target / 2;
        let first_target = target - second_target;

        let mut records: Vec<Record> = Vec::with_capacity(target);
        let mut merge = Merge {
            exclude,
            seen: HashSet::with_capacity(target),
            duplicates: 0,
            excluded: 0,
        };
        let mut failed_passes = 0usize;
        let mut window_counts = [0usize; 2];

        for (i, (window, want)) in [(first, first_target), (second, second_target)]
            .into_iter()
            .enumerate()
        {
            if want == 0 {
                continue;
            }
            let outcome = self
                .search
                .search(&qt.query, Some(window.start), Some(window.end), want);
            if outcome.stop.is_failure() {
                failed_passes += 1;
            }
            window_counts[i] = outcome.records.len();
            merge.extend(&mut records, outcome.records);
        }

        let mut fallback_added = None;
        if records.len() < target {
            let deficit = target - records.len();
            debug!(
                "Windows gave {}/{} for '{}', backfilling {} from the full range",
                records.len(),
                target,
                qt.query,
                deficit
            );
            let outcome =
                self.search
                    .search(&qt.query, Some(qt.range.start), Some(qt.range.end), deficit);
            if outcome.stop.is_failure() {
                failed_passes += 1;
            }
            let before = records.len();
            merge.extend(&mut records, outcome.records);
            fallback_added = Some(records.len() - before);
        }

        records.truncate(target);

        info!(
            "Collected {}/{} for '{}' (windows {}+{}, fallback {:?}, {} duplicates, {} already collected)",
            records.len(),
            target,
            qt.query,
            window_counts[0],
            window_counts[1],
            fallback_added,
            merge.duplicates,
            merge.excluded
        );

        Collected {
            query: qt.query.clone(),
            target,
            records,
            window_counts,
            fallback_added,
            duplicates_dropped: merge.duplicates,
            already_collected: merge.excluded,
            failed_passes,
        }
    }
}

/// Id bookkeeping across the passes of one query.
struct Merge<'e> {
    exclude: &'e HashSet<String>,
    seen: HashSet<String>,
    duplicates: usize,
    excluded: usize,
}

impl Merge<'_> {
    /// Append records whose id is neither excluded nor already taken.
    fn extend(&mut self, into: &mut Vec<Record>, from: Vec<Record>) {
        for r in from {
            if self.exclude.contains(&r.video_id) {
                self.excluded += 1;
            } else if self.seen.insert(r.video_id.clone()) {
                into.push(r);
            } else {
                self.duplicates += 1;
            }
        }
    }
}
