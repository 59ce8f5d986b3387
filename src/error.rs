// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use thiserror::Error;

/// Errors in the watcher configuration, fatal before polling starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("You did not specify the subreddit name")]
    MissingFeedName,

    #[error("Invalid subreddit name '{name}': {reason}")]
    InvalidFeedName { name: String, reason: &'static str },

    #[error("Poll interval must be greater than zero")]
    ZeroInterval,

    #[error("Seen-set capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Maximum media width must be greater than zero")]
    ZeroMediaWidth,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Errors returned by an HTTP client
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP request failed for {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Errors that can occur when fetching or decoding the feed listing
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed: {0}")]
    FetchFailed(#[from] HttpError),

    #[error("Failed to parse feed listing: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("Invalid permalink '{permalink}': {source}")]
    InvalidPermalink {
        permalink: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur while fetching a single media resource
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("{0}")]
    FetchFailed(#[from] HttpError),

    #[error("Timed out after {}s fetching {url}", .after.as_secs_f32())]
    TimedOut { url: String, after: Duration },

    #[error("Fetch task for {url} was aborted")]
    Aborted { url: String },
}

/// Errors raised while writing an item to the terminal
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
