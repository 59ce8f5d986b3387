// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::FeedError;
use crate::http::HttpClient;

use super::name::{FeedEndpoint, FeedName};
use super::parse::{FeedItem, parse_listing};

/// Fetch the latest page of a feed, newest post first
pub async fn fetch_feed<C: HttpClient + ?Sized>(
    client: &C,
    endpoint: &FeedEndpoint,
    feed: &FeedName,
) -> Result<Vec<FeedItem>, FeedError> {
    let url = endpoint.listing_url(feed);
    let bytes = client.get_bytes(url.as_str()).await?;
    parse_listing(&bytes, endpoint)
}
