use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::wire::{CommentThreadListResponse, SearchListResponse, VideoListResponse};
use super::{
    ApiError, CommentPage, CommentRequest, SearchPage, SearchRequest, VideoDetails, YouTubeApi,
    MAX_COMMENT_PAGE_SIZE, MAX_SEARCH_PAGE_SIZE,
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Error bodies are echoed into logs; keep them short.
const MAX_ERROR_BODY: usize = 300;

/// Blocking client for the YouTube Data API v3, built once per run.
pub struct HttpTransport {
    api_key: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url,
            client,
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .map_err(|e| ApiError::Malformed(format!("{path}: {e}")))
    }
}

impl YouTubeApi for HttpTransport {
    fn search_page(&self, req: &SearchRequest) -> Result<SearchPage, ApiError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", req.query.clone()),
            (
                "maxResults",
                req.page_size.clamp(1, MAX_SEARCH_PAGE_SIZE).to_string(),
            ),
            ("order", req.order.as_str().to_string()),
        ];
        if let Some(after) = req.published_after {
            params.push(("publishedAfter", rfc3339(after)));
        }
        if let Some(before) = req.published_before {
            params.push(("publishedBefore", rfc3339(before)));
        }
        if let Some(ref token) = req.page_token {
            params.push(("pageToken", token.clone()));
        }

        let resp: SearchListResponse = self.get_json("/search", &params)?;
        resp.into_page()
    }

    fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ApiError> {
        let params = [
            ("part", "snippet,statistics,contentDetails".to_string()),
            ("id", video_id.to_string()),
        ];
        let resp: VideoListResponse = self.get_json("/videos", &params)?;
        resp.into_details()
    }

    fn comment_page(&self, req: &CommentRequest) -> Result<CommentPage, ApiError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("videoId", req.video_id.clone()),
            (
                "maxResults",
                req.page_size.clamp(1, MAX_COMMENT_PAGE_SIZE).to_string(),
            ),
            ("order", "relevance".to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        if let Some(ref token) = req.page_token {
            params.push(("pageToken", token.clone()));
        }

        let resp: CommentThreadListResponse = self.get_json("/commentThreads", &params)?;
        resp.into_page()
    }
}

/// The API wants second precision with a `Z` suffix.
fn rfc3339(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
