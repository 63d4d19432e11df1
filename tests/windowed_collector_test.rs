mod common;

use std::collections::HashSet;
use std::time::Duration;

use common::{pass_bounds, range, Bounds, MockApi};
use proptest::prelude::*;
use ytc::collect::{Collected, PagedSearchClient, QueryTarget, WindowedCollector};

fn query_target(query: &str, target: usize) -> QueryTarget {
    QueryTarget {
        query: query.to_string(),
        target,
        range: range(),
    }
}

fn collect(api: &MockApi, query: &str, target: usize) -> Collected {
    let collector = WindowedCollector::new(PagedSearchClient::new(api, Duration::ZERO));
    collector.collect(&query_target(query, target))
}

fn collect_excluding(api: &MockApi, target: usize, exclude: &HashSet<String>) -> Collected {
    let collector = WindowedCollector::new(PagedSearchClient::new(api, Duration::ZERO));
    collector.collect_excluding(&query_target("q", target), exclude)
}

fn assert_unique(ids: &[&str]) {
    let set: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(set.len(), ids.len(), "duplicate ids in {ids:?}");
}

#[test]
fn gaza_war_scenario_backfills_without_duplicates() {
    let (first, second, full) = pass_bounds(range());
    let api = MockApi::new()
        .page(first, None, &["w1a", "w1b", "w1c", "w1d", "w1e", "w1f"], None)
        .page(second, None, &["w2a", "w2short"], None)
        .short("w2short")
        .page(full, None, &["w1c", "fb1", "fb2"], None);

    let got = collect(&api, "Gaza war", 10);

    let ids: Vec<&str> = got.records.iter().map(|r| r.video_id.as_str()).collect();
    // first window is capped at half the target, so w1f is never taken
    assert_eq!(
        ids,
        vec!["w1a", "w1b", "w1c", "w1d", "w1e", "w2a", "fb1", "fb2"]
    );
    assert_unique(&ids);
    assert_eq!(got.window_counts, [5, 1]);
    assert_eq!(got.fallback_added, Some(2));
    assert_eq!(got.duplicates_dropped, 1);
    assert_eq!(got.shortfall(), 2);
    assert!(got.records.iter().all(|r| r.query == "Gaza war"));

    // fallback asked for exactly the deficit
    let calls = api.search_calls.borrow();
    let fallback = calls
        .iter()
        .find(|c| (c.published_after, c.published_before) == full)
        .unwrap();
    assert_eq!(fallback.page_size, 4);
}

#[test]
fn odd_target_gives_the_extra_slot_to_the_first_window() {
    let (first, second, full) = pass_bounds(range());
    let api = MockApi::new()
        .page(first, None, &["a", "b", "c", "d"], None)
        .page(second, None, &["e", "f", "g", "h"], None);

    let got = collect(&api, "q", 5);

    assert_eq!(got.window_counts, [3, 2]);
    assert_eq!(got.records.len(), 5);
    assert!(got.fallback_added.is_none());
    assert_eq!(api.search_calls_for(full), 0);
}

#[test]
fn target_of_one_skips_the_second_window() {
    let (first, second, _) = pass_bounds(range());
    let api = MockApi::new().page(first, None, &["a"], None);

    let got = collect(&api, "q", 1);

    assert_eq!(got.records.len(), 1);
    assert_eq!(api.search_calls_for(second), 0);
}

#[test]
fn duplicate_across_windows_is_dropped_and_backfilled() {
    let (first, second, full) = pass_bounds(range());
    let api = MockApi::new()
        .page(first, None, &["a", "b"], None)
        .page(second, None, &["b", "c"], None)
        .page(full, None, &["d", "a"], None);

    let got = collect(&api, "q", 4);

    let ids: Vec<&str> = got.records.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert_eq!(got.window_counts, [2, 2]);
    assert_eq!(got.duplicates_dropped, 1);
    assert_eq!(got.fallback_added, Some(1));
}

#[test]
fn empty_api_gives_empty_result() {
    let api = MockApi::new();
    let got = collect(&api, "nothing here", 10);

    assert!(got.records.is_empty());
    assert_eq!(got.fallback_added, Some(0));
    assert_eq!(got.shortfall(), 10);
    assert_eq!(got.failed_passes, 0);
}

#[test]
fn zero_target_makes_no_requests() {
    let api = MockApi::new();
    let got = collect(&api, "q", 0);
    assert!(got.records.is_empty());
    assert!(api.search_calls.borrow().is_empty());
}

#[test]
fn failures_never_propagate() {
    let (first, second, full) = pass_bounds(range());
    let api = MockApi::new()
        .failing_page(first, None, 403, "quotaExceeded")
        .failing_page(second, None, 500, "backendError")
        .failing_page(full, None, 403, "quotaExceeded");

    let got = collect(&api, "q", 6);

    assert!(got.records.is_empty());
    assert_eq!(got.failed_passes, 3);
}

#[test]
fn partial_failure_keeps_what_arrived() {
    let (first, second, full) = pass_bounds(range());
    let api = MockApi::new()
        .page(first, None, &["a", "b"], Some("t2"))
        .failing_page(first, Some("t2"), 500, "backendError")
        .page(second, None, &["c", "d"], None)
        .page(full, None, &["e"], None);

    let got = collect(&api, "q", 6);

    assert_eq!(got.records.len(), 5);
    assert_eq!(got.failed_passes, 1);
}

#[test]
fn excluded_ids_are_replaced_from_the_fallback() {
    let (first, second, full) = pass_bounds(range());
    let api = MockApi::new()
        .page(first, None, &["old", "a"], None)
        .page(second, None, &["b", "c"], None)
        .page(full, None, &["d", "old", "e"], None);
    let exclude: HashSet<String> = ["old".to_string()].into();

    let got = collect_excluding(&api, 4, &exclude);

    let ids: Vec<&str> = got.records.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert_eq!(got.already_collected, 1);
    assert_eq!(got.duplicates_dropped, 0);
    assert_eq!(got.fallback_added, Some(1));
}

/// Script chained pages for `bounds`. Ids are folded into `pool` so that
/// windows and the fallback overlap.
fn script_pass(
    mut api: MockApi,
    bounds: Bounds,
    pages: &[Vec<u64>],
    pool: u64,
    tag: &str,
) -> MockApi {
    for (p, raw) in pages.iter().enumerate() {
        let ids: Vec<String> = raw.iter().map(|n| format!("v{}", n % pool)).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let token = (p > 0).then(|| format!("{tag}{p}"));
        let next = (p + 1 < pages.len()).then(|| format!("{tag}{}", p + 1));
        api = api.page(bounds, token.as_deref(), &refs, next.as_deref());
    }
    api
}

fn pages() -> impl Strategy<Value = Vec<Vec<u64>>> {
    prop::collection::vec(prop::collection::vec(0u64..250, 0..60), 1..=3)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn never_exceeds_target_and_never_repeats_an_id(
        target in 0usize..=200,
        pool in 1u64..250,
        first_pages in pages(),
        second_pages in pages(),
        full_pages in pages(),
        shorts in prop::collection::hash_set(0u64..250, 0..40),
        excluded in prop::collection::hash_set(0u64..250, 0..20),
    ) {
        let (first, second, full) = pass_bounds(range());
        let mut api = MockApi::new();
        api = script_pass(api, first, &first_pages, pool, "a");
        api = script_pass(api, second, &second_pages, pool, "b");
        api = script_pass(api, full, &full_pages, pool, "c");
        for n in &shorts {
            api = api.short(&format!("v{}", n % pool));
        }
        let exclude: HashSet<String> = excluded.iter().map(|n| format!("v{}", n % pool)).collect();

        let got = collect_excluding(&api, target, &exclude);

        prop_assert!(got.records.len() <= target);
        let ids: HashSet<&str> = got.records.iter().map(|r| r.video_id.as_str()).collect();
        prop_assert_eq!(ids.len(), got.records.len());
        prop_assert!(ids.iter().all(|id| !exclude.contains(*id)));
        prop_assert!(got.records.iter().all(|r| r.duration_seconds >= 60));
        for call in api.search_calls.borrow().iter() {
            prop_assert!(call.page_size >= 1 && call.page_size <= 50);
        }
    }
}
