// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures for unit tests: a scriptable HTTP client, listing
//! builders and a presenter that records what it was asked to do.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::DateTime;
use serde_json::json;
use tokio::sync::Barrier;

use crate::enrich::EnrichedItem;
use crate::error::{HttpError, RenderError};
use crate::feed::{FeedItem, MediaReference};
use crate::http::HttpClient;
use crate::render::Presenter;

type Response = Result<Bytes, u16>;

/// HTTP client serving canned responses and recording every request
#[derive(Clone, Default)]
pub struct MockHttpClient {
    feed: Arc<Mutex<Option<Response>>>,
    media: Arc<Mutex<HashMap<String, Response>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    barrier: Arc<Mutex<Option<Arc<Barrier>>>>,
    requests: Arc<Mutex<Vec<String>>>,
    feeds_in_flight: Arc<AtomicUsize>,
    max_feeds_in_flight: Arc<AtomicUsize>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, json: String) -> Self {
        self.set_feed(json);
        self
    }

    pub fn failing_feed(self, status: u16) -> Self {
        *self.feed.lock().unwrap() = Some(Err(status));
        self
    }

    pub fn set_feed(&self, json: String) {
        *self.feed.lock().unwrap() = Some(Ok(Bytes::from(json)));
    }

    pub fn with_media(self, url: &str, body: &[u8]) -> Self {
        self.media
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(Bytes::copy_from_slice(body)));
        self
    }

    pub fn failing_media(self, url: &str, status: u16) -> Self {
        self.media
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(status));
        self
    }

    /// Delay the response for `url`
    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    /// Make every media request wait on `barrier` before answering
    pub fn with_barrier(self, barrier: Arc<Barrier>) -> Self {
        *self.barrier.lock().unwrap() = Some(barrier);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Highest number of listing requests that were ever open at once
    pub fn max_feeds_in_flight(&self) -> usize {
        self.max_feeds_in_flight.load(Ordering::SeqCst)
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_bytes(&self, url: &str) -> Result<Bytes, HttpError> {
        self.requests.lock().unwrap().push(url.to_string());

        let is_feed = url.ends_with("/new.json");
        if is_feed {
            let open = self.feeds_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_feeds_in_flight.fetch_max(open, Ordering::SeqCst);
        }

        let barrier = self.barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier.filter(|_| !is_feed) {
            barrier.wait().await;
        }

        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = if is_feed {
            self.feeds_in_flight.fetch_sub(1, Ordering::SeqCst);
            self.feed.lock().unwrap().clone()
        } else {
            self.media.lock().unwrap().get(url).cloned()
        };

        match response.unwrap_or(Err(404)) {
            Ok(body) => Ok(body),
            Err(status) => Err(HttpError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Builder for one post in a listing fixture
#[derive(Clone)]
pub struct PostFixture {
    id: String,
    media: Vec<(String, Option<u32>)>,
}

pub fn post(id: &str) -> PostFixture {
    PostFixture {
        id: id.to_string(),
        media: Vec::new(),
    }
}

impl PostFixture {
    pub fn with_image(mut self, url: &str, width: Option<u32>) -> Self {
        self.media.push((url.to_string(), width));
        self
    }

    pub fn into_item(self) -> FeedItem {
        FeedItem {
            title: format!("Post {}", self.id),
            body: format!("Body of {}", self.id),
            created_at: DateTime::from_timestamp(1_704_067_200, 0).unwrap(),
            url: format!("https://example.com/{}", self.id),
            permalink: format!("https://www.reddit.com/r/test/comments/{}/", self.id)
                .parse()
                .unwrap(),
            category: None,
            media: self
                .media
                .into_iter()
                .map(|(url, width)| MediaReference { url, width })
                .collect(),
            id: self.id,
        }
    }
}

/// Listing JSON with `posts` in the given (newest first) order
pub fn listing_json(posts: &[PostFixture]) -> String {
    let children: Vec<_> = posts
        .iter()
        .enumerate()
        .map(|(index, post)| {
            let mut data = json!({
                "id": post.id,
                "title": format!("Post {}", post.id),
                "selftext": format!("Body of {}", post.id),
                "created_utc": 1_704_067_200 - index as i64 * 60,
                "url": format!("https://example.com/{}", post.id),
                "permalink": format!("/r/test/comments/{}/", post.id),
                "link_flair_text": null,
            });
            if !post.media.is_empty() {
                let images: Vec<_> = post
                    .media
                    .iter()
                    .map(|(url, width)| json!({ "source": { "url": url, "width": width } }))
                    .collect();
                data["preview"] = json!({ "images": images });
            }
            json!({ "kind": "t3", "data": data })
        })
        .collect();

    json!({ "kind": "Listing", "data": { "children": children } }).to_string()
}

/// Everything a [`RecordingPresenter`] observed
#[derive(Debug, Default)]
pub struct Recorded {
    pub rendered: Vec<EnrichedItem>,
    pub notifications: usize,
    pub errors: Vec<String>,
}

impl Recorded {
    pub fn rendered_ids(&self) -> Vec<&str> {
        self.rendered.iter().map(|i| i.id.as_str()).collect()
    }
}

/// Presenter that records calls; rendering of ids in `fail_on` fails
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub recorded: Arc<Mutex<Recorded>>,
    fail_on: Vec<String>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            fail_on: vec![id.to_string()],
            ..Self::default()
        }
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, item: &EnrichedItem) -> Result<(), RenderError> {
        if self.fail_on.contains(&item.id) {
            return Err(RenderError::Io(std::io::Error::other("broken pipe")));
        }
        self.recorded.lock().unwrap().rendered.push(item.clone());
        Ok(())
    }

    fn notify(&mut self) {
        self.recorded.lock().unwrap().notifications += 1;
    }

    fn report_error(&mut self, message: &str) {
        self.recorded.lock().unwrap().errors.push(message.to_string());
    }
}
