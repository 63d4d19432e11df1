use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collect::Pacing;

/// Env var consulted for the API key when no flag is given.
pub const API_KEY_ENV: &str = "YTC_API_KEY";

/// Queries of the reference deployment.
pub const DEFAULT_QUERIES: &[&str] = &[
    "Gaza war",
    "Israel Palestine conflict",
    "Gaza humanitarian crisis",
    "Palestine news",
    "Israel Hamas war",
];
pub const DEFAULT_START_DATE: &str = "2023-10-07";
pub const DEFAULT_END_DATE: &str = "2025-10-10";
pub const DEFAULT_VIDEOS_PER_QUERY: usize = 50;
pub const DEFAULT_MAX_COMMENTS: usize = 30;

/// `[youtube]` block: how to reach the API.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub base_url: Option<String>,
    /// Search ordering: date (default), relevance or viewCount.
    pub order: Option<String>,
}

/// `[collection]` block: what to collect and how fast.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct CollectionConfig {
    pub queries: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub videos_per_query: Option<usize>,
    pub max_comments: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub page_delay_ms: Option<u64>,
    pub video_delay_ms: Option<u64>,
    pub query_delay_ms: Option<u64>,
}

/// Top-level ytc config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct YtcConfig {
    pub youtube: Option<YouTubeConfig>,
    pub collection: Option<CollectionConfig>,
}

impl YtcConfig {
    /// Load config from ~/.ytc/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(YtcConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: YtcConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }

    pub fn collection(&self) -> CollectionConfig {
        self.collection.clone().unwrap_or_default()
    }

    /// Request pacing, falling back to the built-in pauses per field.
    pub fn pacing(&self) -> Pacing {
        let defaults = Pacing::default();
        let Some(ref c) = self.collection else {
            return defaults;
        };
        Pacing {
            page_delay: c
                .page_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_delay),
            video_delay: c
                .video_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.video_delay),
            query_delay: c
                .query_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.query_delay),
        }
    }

    /// Display config with secrets redacted.
    pub fn display_redacted(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref yt) = self.youtube {
            lines.push("[youtube]".to_string());
            display_youtube_config(&mut lines, yt);
        }
        if let Some(ref c) = self.collection {
            lines.push("[collection]".to_string());
            display_collection_config(&mut lines, c);
        }
        if lines.is_empty() {
            lines.push("(no configuration, using defaults)".to_string());
        }
        lines.join("\n")
    }
}

fn display_youtube_config(lines: &mut Vec<String>, yt: &YouTubeConfig) {
    if let Some(ref key) = yt.api_key {
        lines.push(format!("  api_key = \"{}\"", redact(key)));
    }
    if let Some(ref cmd) = yt.api_key_command {
        lines.push(format!("  api_key_command = \"{}\"", cmd));
    }
    if let Some(ref url) = yt.base_url {
        lines.push(format!("  base_url = \"{}\"", url));
    }
    if let Some(ref order) = yt.order {
        lines.push(format!("  order = \"{}\"", order));
    }
}

fn display_collection_config(lines: &mut Vec<String>, c: &CollectionConfig) {
    if let Some(ref queries) = c.queries {
        lines.push(format!("  queries = {:?}", queries));
    }
    if let Some(ref d) = c.start_date {
        lines.push(format!("  start_date = \"{}\"", d));
    }
    if let Some(ref d) = c.end_date {
        lines.push(format!("  end_date = \"{}\"", d));
    }
    if let Some(n) = c.videos_per_query {
        lines.push(format!("  videos_per_query = {}", n));
    }
    if let Some(n) = c.max_comments {
        lines.push(format!("  max_comments = {}", n));
    }
    if let Some(ref dir) = c.output_dir {
        lines.push(format!("  output_dir = \"{}\"", dir.display()));
    }
    for (name, value) in [
        ("page_delay_ms", c.page_delay_ms),
        ("video_delay_ms", c.video_delay_ms),
        ("query_delay_ms", c.query_delay_ms),
    ] {
        if let Some(ms) = value {
            lines.push(format!("  {} = {}", name, ms));
        }
    }
}

fn redact(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "****".to_string()
    }
}

/// Resolve the API key through the chain: CLI flag > env var > config key > config command.
pub fn resolve_credential(
    cli_flag: Option<&str>,
    env_var_name: &str,
    config: Option<&YouTubeConfig>,
) -> Result<String> {
    // 1. CLI flag
    if let Some(key) = cli_flag {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    // 2. Environment variable
    if let Ok(val) = std::env::var(env_var_name) {
        if !val.is_empty() {
            return Ok(val);
        }
    }

    if let Some(yt) = config {
        // 3. Config file api_key
        if let Some(ref key) = yt.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }

        // 4. External command
        if let Some(ref cmd) = yt.api_key_command {
            if !cmd.is_empty() {
                let output = std::process::Command::new("sh")
                    .arg("-c")
                    .arg(cmd)
                    .output()
                    .with_context(|| format!("Failed to run api_key_command: {cmd}"))?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    bail!(
                        "api_key_command failed (exit {}): {}",
                        output.status.code().unwrap_or(-1),
                        stderr.trim()
                    );
                }

                let secret = String::from_utf8(output.stdout)
                    .context("api_key_command output is not valid UTF-8")?
                    .trim()
                    .to_string();

                if !secret.is_empty() {
                    return Ok(secret);
                }
            }
        }
    }

    bail!(
        "No YouTube API key found. Provide via --api-key, {} env var, or ~/.ytc/config.toml",
        env_var_name
    );
}

/// Path to the config file: ~/.ytc/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".ytc").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.ytc/config.toml
# Credential resolution order: --api-key > YTC_API_KEY > api_key > api_key_command

[youtube]
# api_key = "your-youtube-data-api-key"
# api_key_command = "your-secrets-manager-command-here"
# order = "date"

[collection]
# queries = ["Gaza war", "Israel Palestine conflict"]
# start_date = "2023-10-07"
# end_date = "2025-10-10"
# videos_per_query = 50
# max_comments = 30
# output_dir = "/path/to/data"
# page_delay_ms = 100
# video_delay_ms = 300
# query_delay_ms = 1000
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}
