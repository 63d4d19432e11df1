use unicode_width::UnicodeWidthStr;

use crate::collect::{CollectionPlan, RunManifest};
use crate::keywords::KeywordCount;
use crate::store::models::StoreStats;

/// Format duration in seconds to human-readable string.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Truncate a string to fit within max_width (respecting unicode width).
pub fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Show what a run is about to do.
pub fn print_plan(plan: &CollectionPlan) {
    println!("Collection plan:");
    println!("  Queries:     {}", plan.queries.len());
    for q in &plan.queries {
        println!("    - {q}");
    }
    println!(
        "  Period:      {} to {}",
        plan.range.start.format("%Y-%m-%d"),
        plan.range.end.format("%Y-%m-%d")
    );
    println!("  Per query:   {} videos", plan.per_query);
    println!("  Comments:    up to {} per video", plan.max_comments);
    println!("  Target:      {} videos", plan.total_target());
}

/// Per-query delivery table for a finished run.
pub fn print_run_summary(manifest: &RunManifest) {
    println!("\nRun {}:\n", manifest.run_id);
    println!(
        "  {:<36} {:>6} {:>6} {:>6} {:>9} {:>9}",
        "QUERY", "TARGET", "GOT", "SHORT", "BACKFILL", "COMMENTS"
    );
    println!("  {}", "-".repeat(77));

    for q in &manifest.queries {
        let backfill = q
            .fallback_added
            .map(|n| format!("+{n}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<36} {:>6} {:>6} {:>6} {:>9} {:>9}",
            truncate(&q.query, 36),
            q.target,
            q.delivered,
            q.shortfall,
            backfill,
            q.comments,
        );
    }

    println!(
        "\n  {} videos, {} comments in {}",
        manifest.videos,
        manifest.comments,
        format_duration(manifest.duration_secs)
    );
}

pub fn print_keywords(keywords: &[KeywordCount], videos: usize) {
    if keywords.is_empty() {
        println!("No keywords found.");
        return;
    }

    println!("Top keywords across {videos} video titles:\n");
    println!("  {:<4} {:<28} {:>6}", "#", "KEYWORD", "COUNT");
    println!("  {}", "-".repeat(40));
    for (i, k) in keywords.iter().enumerate() {
        println!("  {:<4} {:<28} {:>6}", i + 1, truncate(&k.keyword, 28), k.count);
    }
}

pub fn print_stats(stats: &StoreStats) {
    println!("Collected data:");
    println!("  Videos:      {}", stats.videos);
    println!("  Comments:    {}", stats.comments);
    println!("  Views:       {}", stats.total_views);
    println!("  Size:        {} (videos document)", format_bytes(stats.videos_bytes));

    if !stats.queries.is_empty() {
        println!("\n  By query:");
        for q in &stats.queries {
            println!(
                "    {:<36} {:>5} videos {:>12} views {:>10} likes",
                truncate(&q.query, 36),
                q.videos,
                q.views,
                q.likes
            );
        }
    }

    if !stats.top_commenters.is_empty() {
        println!("\n  Most active commenters:");
        for a in &stats.top_commenters {
            println!("    {:<36} {:>5}", truncate(&a.author, 36), a.comments);
        }
    }
}
