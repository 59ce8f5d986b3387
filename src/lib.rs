pub mod detect;
pub mod enrich;
pub mod error;
pub mod feed;
pub mod http;
pub mod media;
pub mod poll;
pub mod progress;
pub mod render;
pub mod seen;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use detect::{UpdatePlan, detect_updates};
pub use enrich::{DEFAULT_MAX_MEDIA_WIDTH, EnrichedItem, ResolvedMedia, enrich};
pub use error::{ConfigError, FeedError, HttpError, MediaError, RenderError};
pub use feed::{FeedEndpoint, FeedItem, FeedName, MediaReference, fetch_feed, parse_listing};
pub use http::{HttpClient, ReqwestClient};
pub use media::{MediaMap, MediaOptions, MediaOutcome, fetch_all};
pub use poll::{CycleOutcome, PollLoop, PollOptions, PollState};
pub use progress::{
    NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter, TracingReporter,
};
pub use render::{NotificationCue, Presenter, TerminalPresenter};
pub use seen::SeenSet;
