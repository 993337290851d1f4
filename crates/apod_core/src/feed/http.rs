//! Blocking HTTP feed source.

use super::{parse_feed, FeedError, FeedResult, FeedSource};
use crate::model::entry::ApodEntry;
use log::{error, info};
use std::time::{Duration, Instant};

/// Static JSON feed published for the classroom APOD mirror.
pub const DEFAULT_FEED_URL: &str = "https://cdn.jsdelivr.net/gh/GCA-Classroom/apod/data.json";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Fetches the whole feed document with one GET per call.
///
/// No caching and no retries: every call hits the network.
pub struct HttpFeedSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>) -> FeedResult<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> FeedResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch_all(&self) -> FeedResult<Vec<ApodEntry>> {
        let started_at = Instant::now();
        info!("event=feed_fetch module=feed status=start");

        let response = self.client.get(&self.url).send().map_err(|err| {
            error!(
                "event=feed_fetch module=feed status=error duration_ms={} error_code=request_failed error={err}",
                started_at.elapsed().as_millis()
            );
            FeedError::from(err)
        })?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            error!(
                "event=feed_fetch module=feed status=error duration_ms={} error_code=bad_status http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let entries = parse_feed(&body)?;
        info!(
            "event=feed_fetch module=feed status=ok duration_ms={} entries={}",
            started_at.elapsed().as_millis(),
            entries.len()
        );
        Ok(entries)
    }
}
