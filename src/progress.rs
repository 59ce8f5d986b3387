use std::sync::Arc;
use std::time::Duration;

/// Events emitted during a polling cycle for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The listing is being fetched
    FetchingFeed { url: String },

    /// The listing was decoded and compared against the seen-set
    FeedParsed {
        total_items: usize,
        new_items: usize,
    },

    /// Media for the new posts is being fetched
    FetchingMedia { count: usize },

    /// A media fetch failed; the post is shown without it
    MediaFetchFailed { url: String, error: String },

    /// The cycle was abandoned
    CycleFailed { error: String },

    /// The cycle ran to completion
    CycleCompleted {
        new_items: usize,
        media_failed: usize,
        elapsed: Duration,
    },
}

/// Trait for reporting progress events during polling.
///
/// Implementations can use this to log messages or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingFeed { url } => {
                tracing::debug!(%url, "fetching feed");
            }
            ProgressEvent::FeedParsed {
                total_items,
                new_items,
            } => {
                tracing::debug!(total_items, new_items, "feed parsed");
            }
            ProgressEvent::FetchingMedia { count } => {
                tracing::debug!(count, "fetching media");
            }
            ProgressEvent::MediaFetchFailed { url, error } => {
                tracing::warn!(%url, %error, "media unavailable");
            }
            ProgressEvent::CycleFailed { error } => {
                tracing::warn!(%error, "cycle abandoned");
            }
            ProgressEvent::CycleCompleted {
                new_items,
                media_failed,
                elapsed,
            } => {
                tracing::info!(
                    new_items,
                    media_failed,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "cycle completed"
                );
            }
        }
    }
}
