// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;

use crate::feed::FeedItem;
use crate::seen::SeenSet;

/// Result of comparing a feed snapshot against the seen-set
#[derive(Debug, Clone, Default)]
pub struct UpdatePlan {
    /// Posts not seen before, oldest first
    pub new_items: Vec<FeedItem>,
    /// Posts already shown in an earlier cycle, oldest first
    pub already_seen: Vec<FeedItem>,
    /// Distinct media URLs referenced by new posts, in first-reference order
    pub media_urls: Vec<String>,
    /// Total number of posts in the snapshot
    pub total_items: usize,
}

impl UpdatePlan {
    pub fn has_updates(&self) -> bool {
        !self.new_items.is_empty()
    }

    /// Identifiers to commit to the seen-set once the cycle is done
    pub fn new_ids(&self) -> impl Iterator<Item = &str> {
        self.new_items.iter().map(|item| item.id.as_str())
    }
}

/// Split a snapshot into new and already seen posts
///
/// The snapshot arrives newest first; the plan lists posts oldest first so
/// they are shown and remembered in the order they were written. A post that
/// appears twice in one snapshot is only reported once.
pub fn detect_updates(snapshot: Vec<FeedItem>, seen: &SeenSet) -> UpdatePlan {
    let total_items = snapshot.len();
    let mut new_items = Vec::new();
    let mut already_seen = Vec::new();
    let mut media_urls = Vec::new();
    let mut new_ids = HashSet::new();
    let mut requested = HashSet::new();

    for item in snapshot.into_iter().rev() {
        if seen.contains(&item.id) || !new_ids.insert(item.id.clone()) {
            already_seen.push(item);
            continue;
        }

        for media in &item.media {
            if requested.insert(media.url.clone()) {
                media_urls.push(media.url.clone());
            }
        }

        new_items.push(item);
    }

    UpdatePlan {
        new_items,
        already_seen,
        media_urls,
        total_items,
    }
}
