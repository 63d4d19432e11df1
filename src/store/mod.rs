pub mod models;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output::json::write_json_file;
use models::*;

pub const VIDEOS_FILE: &str = "youtube_videos.json";
pub const COMMENTS_FILE: &str = "youtube_comments.json";
pub const MANIFEST_FILE: &str = "collection_run.json";
pub const VIDEOS_CSV_FILE: &str = "youtube_videos.csv";
pub const COMMENTS_CSV_FILE: &str = "youtube_comments.csv";

const TOP_COMMENTERS: usize = 10;

/// Output directory holding the collected documents.
pub struct Store {
    pub dir: PathBuf,
}

impl Store {
    /// Open (or create) the output directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        Ok(Store {
            dir: dir.to_path_buf(),
        })
    }

    /// Default output directory: ~/.ytc/data
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".ytc").join("data"))
    }

    pub fn videos_path(&self) -> PathBuf {
        self.dir.join(VIDEOS_FILE)
    }

    pub fn comments_path(&self) -> PathBuf {
        self.dir.join(COMMENTS_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn videos_csv_path(&self) -> PathBuf {
        self.dir.join(VIDEOS_CSV_FILE)
    }

    pub fn comments_csv_path(&self) -> PathBuf {
        self.dir.join(COMMENTS_CSV_FILE)
    }

    /// Write the videos document (comments nested), the flat comments
    /// document, and a CSV export of each. Existing files are replaced.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        write_json_file(&self.videos_path(), records)?;

        let comments: Vec<&Comment> = records.iter().flat_map(|r| r.comments.iter()).collect();
        write_json_file(&self.comments_path(), &comments)?;

        write_csv_file(&self.videos_csv_path(), records.iter().map(VideoRow::from))?;
        write_csv_file(&self.comments_csv_path(), comments.iter().copied())?;

        info!(
            "Saved {} videos and {} comments to {}",
            records.len(),
            comments.len(),
            self.dir.display()
        );
        Ok(())
    }

    pub fn write_manifest<T: Serialize>(&self, manifest: &T) -> Result<()> {
        write_json_file(&self.manifest_path(), manifest)
    }

    pub fn load_videos(&self) -> Result<Vec<Record>> {
        load_array(&self.videos_path())
    }

    pub fn load_comments(&self) -> Result<Vec<Comment>> {
        load_array(&self.comments_path())
    }

    /// Summarize the persisted documents.
    pub fn stats(&self) -> Result<StoreStats> {
        let videos = self.load_videos()?;
        let comments = self.load_comments()?;

        let mut by_query: Vec<QueryCount> = Vec::new();
        for v in &videos {
            match by_query.iter_mut().find(|q| q.query == v.query) {
                Some(q) => {
                    q.videos += 1;
                    q.views += v.view_count;
                    q.likes += v.like_count;
                }
                None => by_query.push(QueryCount {
                    query: v.query.clone(),
                    videos: 1,
                    views: v.view_count,
                    likes: v.like_count,
                }),
            }
        }
        by_query.sort_by(|a, b| b.videos.cmp(&a.videos).then_with(|| a.query.cmp(&b.query)));

        let mut authors: HashMap<&str, usize> = HashMap::new();
        for c in &comments {
            *authors.entry(c.author.as_str()).or_insert(0) += 1;
        }
        let mut top_commenters: Vec<AuthorCount> = authors
            .into_iter()
            .map(|(author, comments)| AuthorCount {
                author: author.to_string(),
                comments,
            })
            .collect();
        top_commenters.sort_by(|a, b| {
            b.comments
                .cmp(&a.comments)
                .then_with(|| a.author.cmp(&b.author))
        });
        top_commenters.truncate(TOP_COMMENTERS);

        let videos_bytes = std::fs::metadata(self.videos_path())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(StoreStats {
            videos: videos.len(),
            comments: comments.len(),
            total_views: videos.iter().map(|v| v.view_count).sum(),
            queries: by_query,
            top_commenters,
            videos_bytes,
        })
    }
}

/// One header line, then one line per row. No rows gives an empty file.
fn write_csv_file<T, I>(path: &Path, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn load_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse: {}", path.display()))
}
