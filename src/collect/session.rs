use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    pause, CommentFetcher, Pacing, PagedSearchClient, QueryTarget, TimeRange, WindowedCollector,
};
use crate::keywords::top_keywords;
use crate::output::table::truncate;
use crate::store::models::Record;
use crate::store::Store;
use crate::youtube::{SearchOrder, YouTubeApi};

const KEYWORDS_PER_QUERY: usize = 5;

/// Validated input for one collection run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPlan {
    pub queries: Vec<String>,
    pub range: TimeRange,
    pub per_query: usize,
    pub max_comments: usize,
}

impl CollectionPlan {
    /// Reject plans that could only fail, before any request is made.
    pub fn new(
        queries: Vec<String>,
        range: TimeRange,
        per_query: usize,
        max_comments: usize,
    ) -> Result<Self> {
        let queries: Vec<String> = queries.into_iter().map(|q| q.trim().to_string()).collect();
        if queries.is_empty() {
            bail!("No search queries given");
        }
        if queries.iter().any(|q| q.is_empty()) {
            bail!("Search queries must be non-empty");
        }
        if per_query == 0 {
            bail!("Videos per query must be at least 1");
        }
        Ok(CollectionPlan {
            queries,
            range,
            per_query,
            max_comments,
        })
    }

    pub fn targets(&self) -> Vec<QueryTarget> {
        self.queries
            .iter()
            .map(|q| QueryTarget {
                query: q.clone(),
                target: self.per_query,
                range: self.range,
            })
            .collect()
    }

    pub fn total_target(&self) -> usize {
        self.queries.len() * self.per_query
    }
}

/// Per-query line of the run manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReport {
    pub query: String,
    pub target: usize,
    pub delivered: usize,
    pub shortfall: usize,
    pub window_counts: [usize; 2],
    pub fallback_added: Option<usize>,
    pub duplicates_dropped: usize,
    /// Videos already collected under an earlier query in this run.
    pub already_collected: usize,
    pub failed_passes: usize,
    pub comments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunManifest {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub range_start: DateTime<Utc>,
    pub range_end: DateTime<Utc>,
    pub per_query: usize,
    pub max_comments: usize,
    pub queries: Vec<QueryReport>,
    pub videos: usize,
    pub comments: usize,
    pub duration_secs: f64,
}

pub struct SessionResult {
    pub records: Vec<Record>,
    pub manifest: RunManifest,
}

/// Drives a whole run: every query through the windowed collector, then
/// comments for every collected video.
pub struct CollectionSession<'a> {
    api: &'a dyn YouTubeApi,
    pacing: Pacing,
    order: SearchOrder,
}

impl<'a> CollectionSession<'a> {
    pub fn new(api: &'a dyn YouTubeApi, pacing: Pacing) -> Self {
        Self {
            api,
            pacing,
            order: SearchOrder::default(),
        }
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    /// Run the plan. Remote failures never abort the run; they show up as
    /// shortfalls and failed passes in the manifest.
    pub fn run(&self, plan: &CollectionPlan) -> SessionResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let run_id = Uuid::new_v4();

        let search = PagedSearchClient::new(self.api, self.pacing.page_delay).with_order(self.order);
        let collector = WindowedCollector::new(search);
        let fetcher = CommentFetcher::new(self.api, self.pacing.page_delay);

        let mut all: Vec<Record> = Vec::new();
        let mut collected_ids: HashSet<String> = HashSet::new();
        let mut reports = Vec::new();
        let targets = plan.targets();
        let total = targets.len();

        for (i, qt) in targets.iter().enumerate() {
            if i > 0 {
                pause(self.pacing.query_delay);
            }
            eprintln!("\nSearch {}/{}: '{}'", i + 1, total, qt.query);

            // ids from earlier queries count as misses, so the fallback
            // pass runs for them
            let collected = collector.collect_excluding(qt, &collected_ids);
            let shortfall = collected.shortfall();
            if shortfall > 0 {
                warn!(
                    "'{}': collected {} of {} videos ({} short, {} already collected)",
                    qt.query,
                    collected.records.len(),
                    qt.target,
                    shortfall,
                    collected.already_collected
                );
            }
            collected_ids.extend(collected.records.iter().map(|r| r.video_id.clone()));
            let fresh = collected.records;

            let first_of_query = all.len();
            let count = fresh.len();
            let width = format!("{}", count).len();
            let mut comments = 0usize;

            for (j, record) in fresh.into_iter().enumerate() {
                if j > 0 {
                    pause(self.pacing.video_delay);
                }
                let outcome = fetcher.fetch(&record.video_id, plan.max_comments);
                let record = record.with_comments(outcome.comments);
                comments += record.comments_count;
                eprintln!(
                    "  [{:>width$}/{}] {} ({} comments)",
                    j + 1,
                    count,
                    truncate(&record.title, 50),
                    record.comments_count,
                );
                all.push(record);
            }

            let top = top_keywords(
                all[first_of_query..].iter().map(|r| r.title.as_str()),
                KEYWORDS_PER_QUERY,
            );
            if !top.is_empty() {
                info!(
                    "Top keywords for '{}': {}",
                    qt.query,
                    top.iter()
                        .map(|k| format!("{} ({})", k.keyword, k.count))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }

            reports.push(QueryReport {
                query: qt.query.clone(),
                target: qt.target,
                delivered: count,
                shortfall: qt.target.saturating_sub(count),
                window_counts: collected.window_counts,
                fallback_added: collected.fallback_added,
                duplicates_dropped: collected.duplicates_dropped,
                already_collected: collected.already_collected,
                failed_passes: collected.failed_passes,
                comments,
            });
        }

        let comments: usize = all.iter().map(|r| r.comments_count).sum();
        let duration_secs = start.elapsed().as_secs_f64();
        eprintln!(
            "\nCollection complete: {} videos, {} comments ({:.1}s)",
            all.len(),
            comments,
            duration_secs
        );

        let manifest = RunManifest {
            run_id,
            started_at,
            finished_at: Utc::now(),
            range_start: plan.range.start,
            range_end: plan.range.end,
            per_query: plan.per_query,
            max_comments: plan.max_comments,
            queries: reports,
            videos: all.len(),
            comments,
            duration_secs,
        };

        SessionResult {
            records: all,
            manifest,
        }
    }

    /// Run the plan and persist videos, comments and the manifest.
    pub fn run_to_store(&self, plan: &CollectionPlan, store: &Store) -> Result<SessionResult> {
        let result = self.run(plan);
        store.save(&result.records)?;
        store.write_manifest(&result.manifest)?;
        info!("Run {} written to {}", result.manifest.run_id, store.dir.display());
        Ok(result)
    }
}
