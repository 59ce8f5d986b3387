// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use crate::detect::detect_updates;
use crate::enrich::{DEFAULT_MAX_MEDIA_WIDTH, enrich};
use crate::error::{ConfigError, FeedError};
use crate::feed::{FeedEndpoint, FeedName, fetch_feed};
use crate::http::HttpClient;
use crate::media::{MediaOptions, fetch_all};
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::render::Presenter;
use crate::seen::{DEFAULT_SEEN_CAPACITY, SeenSet};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Options for the polling loop
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Time between the start of two cycles
    pub poll_interval: Duration,
    /// Number of post identifiers remembered
    pub seen_capacity: usize,
    /// Widest an inline image is drawn
    pub max_media_width: u32,
    pub media: MediaOptions,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            seen_capacity: DEFAULT_SEEN_CAPACITY,
            max_media_width: DEFAULT_MAX_MEDIA_WIDTH,
            media: MediaOptions::default(),
        }
    }
}

impl PollOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.seen_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_media_width == 0 {
            return Err(ConfigError::ZeroMediaWidth);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Waiting for the next tick
    Idle,
    /// A cycle is in progress
    Fetching,
}

/// What a single cycle did
#[derive(Debug)]
pub enum CycleOutcome {
    Completed { new_items: usize, media_failed: usize },
    /// The feed could not be fetched or decoded; nothing was shown or recorded
    Failed(FeedError),
}

/// Watches one feed: fetch, detect, fetch media, enrich, render, remember
pub struct PollLoop<C, P> {
    client: C,
    endpoint: FeedEndpoint,
    feed: FeedName,
    options: PollOptions,
    seen: SeenSet,
    presenter: P,
    reporter: SharedProgressReporter,
    state: PollState,
}

impl<C, P> PollLoop<C, P>
where
    C: HttpClient + Clone + 'static,
    P: Presenter,
{
    pub fn new(
        client: C,
        endpoint: FeedEndpoint,
        feed: FeedName,
        options: PollOptions,
        presenter: P,
        reporter: SharedProgressReporter,
    ) -> Result<Self, ConfigError> {
        options.validate()?;

        Ok(Self {
            client,
            endpoint,
            feed,
            seen: SeenSet::new(options.seen_capacity),
            options,
            presenter,
            reporter,
            state: PollState::Idle,
        })
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Poll until `shutdown` resolves
    ///
    /// The first cycle starts immediately. Cycles never overlap: ticks that
    /// come due while a cycle is running are skipped, so the cadence stays
    /// fixed no matter how long a cycle takes.
    pub async fn run<F: Future<Output = ()>>(&mut self, shutdown: F) {
        let mut ticker = tokio::time::interval(self.options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            feed = %self.feed,
            interval_secs = self.options.poll_interval.as_secs(),
            "watching feed"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.run_cycle() => {
                    tracing::debug!(?outcome, "cycle finished");
                }
            }
        }

        self.state = PollState::Idle;
        tracing::info!(feed = %self.feed, "stopped watching");
    }

    /// Run one fetch-detect-enrich-render cycle
    ///
    /// Feed errors are reported and leave the seen-set untouched. Media and
    /// render errors are reported per item; the cycle still completes.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = PollState::Fetching;
        let outcome = self.cycle().await;
        self.state = PollState::Idle;
        outcome
    }

    async fn cycle(&mut self) -> CycleOutcome {
        let started = Instant::now();

        self.reporter.report(ProgressEvent::FetchingFeed {
            url: self.endpoint.listing_url(&self.feed).to_string(),
        });

        let snapshot = match fetch_feed(&self.client, &self.endpoint, &self.feed).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.reporter.report(ProgressEvent::CycleFailed {
                    error: e.to_string(),
                });
                self.presenter.report_error(&e.to_string());
                return CycleOutcome::Failed(e);
            }
        };

        let plan = detect_updates(snapshot, &self.seen);

        self.reporter.report(ProgressEvent::FeedParsed {
            total_items: plan.total_items,
            new_items: plan.new_items.len(),
        });

        if !plan.has_updates() {
            self.reporter.report(ProgressEvent::CycleCompleted {
                new_items: 0,
                media_failed: 0,
                elapsed: started.elapsed(),
            });
            return CycleOutcome::Completed {
                new_items: 0,
                media_failed: 0,
            };
        }

        let new_ids: Vec<String> = plan.new_ids().map(String::from).collect();

        self.reporter.report(ProgressEvent::FetchingMedia {
            count: plan.media_urls.len(),
        });

        // Barrier: every fetch settles before anything is shown
        let media = fetch_all(
            &self.client,
            plan.media_urls,
            &self.options.media,
            &self.reporter,
        )
        .await;
        let media_failed = media.failed_count();

        let items = enrich(plan.new_items, &media, self.options.max_media_width);

        for item in &items {
            if let Err(e) = self.presenter.render(item) {
                self.presenter
                    .report_error(&format!("Failed to show post {}: {}", item.id, e));
            }
        }

        self.presenter.notify();
        self.seen.record_all(new_ids);

        self.reporter.report(ProgressEvent::CycleCompleted {
            new_items: items.len(),
            media_failed,
            elapsed: started.elapsed(),
        });

        CycleOutcome::Completed {
            new_items: items.len(),
            media_failed,
        }
    }
}
