mod fetch;
mod name;
mod parse;

pub use fetch::fetch_feed;
pub use name::{FeedEndpoint, FeedName};
pub use parse::{FeedItem, MediaReference, parse_listing};
