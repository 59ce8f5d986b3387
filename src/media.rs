// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::error::MediaError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for fetching media
#[derive(Debug, Clone)]
pub struct MediaOptions {
    /// Upper bound for a single fetch
    pub fetch_timeout: Duration,
    /// Maximum number of fetches in flight (None = all at once)
    pub max_concurrent: Option<usize>,
}

impl Default for MediaOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_concurrent: None,
        }
    }
}

/// Result of fetching one media URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    Fetched(Bytes),
    /// The fetch failed; holds the reason
    Unavailable(String),
}

/// Fetched media keyed by URL
#[derive(Debug, Clone, Default)]
pub struct MediaMap {
    entries: HashMap<String, MediaOutcome>,
}

impl MediaMap {
    pub fn get(&self, url: &str) -> Option<&MediaOutcome> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of URLs that could not be fetched
    pub fn failed_count(&self) -> usize {
        self.entries
            .values()
            .filter(|outcome| matches!(outcome, MediaOutcome::Unavailable(_)))
            .count()
    }
}

impl FromIterator<(String, MediaOutcome)> for MediaMap {
    fn from_iter<I: IntoIterator<Item = (String, MediaOutcome)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fetch every URL concurrently and wait for all of them to settle
///
/// Each URL gets its own task. The map is returned only after every task has
/// finished; a failed or timed-out URL is recorded as unavailable and does
/// not affect the others.
pub async fn fetch_all<C: HttpClient + Clone + 'static>(
    client: &C,
    urls: Vec<String>,
    options: &MediaOptions,
    reporter: &SharedProgressReporter,
) -> MediaMap {
    let limiter = options
        .max_concurrent
        .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

    let tasks = urls.into_iter().map(|url| {
        let client = client.clone();
        let limiter = limiter.clone();
        let fetch_timeout = options.fetch_timeout;
        let task_url = url.clone();

        let handle = tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            fetch_one(&client, &task_url, fetch_timeout).await
        });

        async move {
            let result = handle
                .await
                .unwrap_or_else(|_| Err(MediaError::Aborted { url: url.clone() }));
            (url, result)
        }
    });

    let results = join_all(tasks).await;

    results
        .into_iter()
        .map(|(url, result)| {
            let outcome = match result {
                Ok(bytes) => MediaOutcome::Fetched(bytes),
                Err(e) => {
                    reporter.report(ProgressEvent::MediaFetchFailed {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                    MediaOutcome::Unavailable(e.to_string())
                }
            };
            (url, outcome)
        })
        .collect()
}

async fn fetch_one<C: HttpClient>(
    client: &C,
    url: &str,
    fetch_timeout: Duration,
) -> Result<Bytes, MediaError> {
    match tokio::time::timeout(fetch_timeout, client.get_bytes(url)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(MediaError::TimedOut {
            url: url.to_string(),
            after: fetch_timeout,
        }),
    }
}
