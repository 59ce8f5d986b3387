// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// Name of the subreddit to watch, validated on construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedName(String);

impl FeedName {
    /// Longest name reddit accepts
    pub const MAX_LEN: usize = 21;

    /// Validate a subreddit name.
    ///
    /// A leading `r/` or `/r/` is accepted and stripped. Names joined with `+`
    /// (multireddits) are allowed as long as every part is valid.
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let name = raw.trim();
        let name = name
            .strip_prefix("/r/")
            .or_else(|| name.strip_prefix("r/"))
            .unwrap_or(name)
            .trim_end_matches('/');

        if name.is_empty() {
            return Err(ConfigError::MissingFeedName);
        }

        let invalid = |reason| ConfigError::InvalidFeedName {
            name: raw.to_string(),
            reason,
        };

        for part in name.split('+') {
            if part.is_empty() {
                return Err(invalid("empty name between '+' separators"));
            }
            if part.len() > Self::MAX_LEN {
                return Err(invalid("longer than 21 characters"));
            }
            if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("only letters, digits and '_' are allowed"));
            }
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r/{}", self.0)
    }
}

/// Location of the listing API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoint {
    base: Url,
}

impl FeedEndpoint {
    pub const DEFAULT_BASE: &'static str = "https://www.reddit.com/";

    /// Create an endpoint from a base URL such as `https://www.reddit.com/`
    pub fn parse(base: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidEndpoint(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of the "new" listing for a feed: `<base>/r/<name>/new.json`
    pub fn listing_url(&self, feed: &FeedName) -> Url {
        let mut url = self.base.clone();
        // parse() rejects cannot-be-a-base URLs, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["r", feed.as_str(), "new.json"]);
        }
        url
    }

    /// Resolve a site-relative permalink against the endpoint base
    pub fn resolve(&self, permalink: &str) -> Result<Url, url::ParseError> {
        self.base.join(permalink)
    }
}

impl Default for FeedEndpoint {
    fn default() -> Self {
        Self {
            base: Url::parse(Self::DEFAULT_BASE).expect("default endpoint is a valid URL"),
        }
    }
}
