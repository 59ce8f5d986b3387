// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

use crate::feed::{FeedItem, MediaReference};
use crate::media::{MediaMap, MediaOutcome};

/// Widest an inline image is drawn, in pixels
pub const DEFAULT_MAX_MEDIA_WIDTH: u32 = 400;

/// A post with its media fetched and ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub permalink: Url,
    pub category: Option<String>,
    pub media: Vec<ResolvedMedia>,
}

/// A media reference joined with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub url: String,
    /// Width to draw at, never above the configured maximum
    pub width: u32,
    /// None when the fetch failed
    pub payload: Option<Bytes>,
}

impl ResolvedMedia {
    fn resolve(reference: MediaReference, media: &MediaMap, max_width: u32) -> Self {
        let payload = match media.get(&reference.url) {
            Some(MediaOutcome::Fetched(bytes)) => Some(bytes.clone()),
            Some(MediaOutcome::Unavailable(_)) | None => None,
        };

        Self {
            width: reference.width.map_or(max_width, |w| w.min(max_width)),
            url: reference.url,
            payload,
        }
    }

    pub fn is_available(&self) -> bool {
        self.payload.is_some()
    }
}

/// Attach fetched media to each post
///
/// Post order and the order of media within a post are kept as given.
pub fn enrich(items: Vec<FeedItem>, media: &MediaMap, max_width: u32) -> Vec<EnrichedItem> {
    items
        .into_iter()
        .map(|item| EnrichedItem {
            id: item.id,
            title: item.title,
            body: item.body,
            created_at: item.created_at,
            url: item.url,
            permalink: item.permalink,
            category: item.category,
            media: item
                .media
                .into_iter()
                .map(|reference| ResolvedMedia::resolve(reference, media, max_width))
                .collect(),
        })
        .collect()
}
