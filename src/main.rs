use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use console::Emoji;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use subwatch::{
    FeedEndpoint, FeedName, MediaOptions, NotificationCue, PollLoop, PollOptions, ReqwestClient,
    TerminalPresenter, TracingReporter,
};

// Emoji with fallback for terminals without Unicode support
static EYES: Emoji<'_, '_> = Emoji("👀 ", "");
static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Watch a subreddit and get notified about new posts
#[derive(Parser, Debug)]
#[command(name = "subwatch")]
#[command(about = "Watch a subreddit and get notified about new posts")]
#[command(version)]
struct Args {
    /// Subreddit to watch, e.g. `rust`, `r/rust` or `rust+programming`
    subreddit: String,

    /// Seconds between polls
    #[arg(short, long, default_value = "60", value_name = "SECONDS")]
    interval: u64,

    /// Number of post ids remembered to suppress repeats
    #[arg(long, default_value = "1000")]
    capacity: usize,

    /// Maximum width of inline images in pixels
    #[arg(short = 'w', long, default_value = "400")]
    max_width: u32,

    /// Seconds before a single image fetch is given up
    #[arg(short, long, default_value = "10", value_name = "SECONDS")]
    timeout: u64,

    /// Maximum number of concurrent image fetches (default: unlimited)
    #[arg(short = 'c', long)]
    concurrent: Option<usize>,

    /// Command to play a sound on new posts, e.g. "paplay notify.wav"
    #[arg(long, value_name = "COMMAND", conflicts_with = "silent")]
    sound: Option<String>,

    /// Do not ring the terminal bell on new posts
    #[arg(long)]
    silent: bool,

    /// Base URL of the listing API
    #[arg(long, default_value = FeedEndpoint::DEFAULT_BASE)]
    endpoint: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("subwatch={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let feed = FeedName::new(&args.subreddit).context("Invalid configuration")?;
    let endpoint = FeedEndpoint::parse(&args.endpoint).context("Invalid configuration")?;

    let cue = match (&args.sound, args.silent) {
        (_, true) => NotificationCue::Silent,
        (Some(line), false) => {
            NotificationCue::command(line).context("Invalid configuration: empty --sound command")?
        }
        (None, false) => NotificationCue::Bell,
    };

    let options = PollOptions {
        poll_interval: Duration::from_secs(args.interval),
        seen_capacity: args.capacity,
        max_media_width: args.max_width,
        media: MediaOptions {
            fetch_timeout: Duration::from_secs(args.timeout),
            max_concurrent: args.concurrent,
        },
    };

    let mut poll = PollLoop::new(
        ReqwestClient::new(),
        endpoint,
        feed.clone(),
        options,
        TerminalPresenter::stdout(cue),
        TracingReporter::shared(),
    )
    .context("Invalid configuration")?;

    println!(
        "\n{}{} {}\n{}{}\n",
        EYES,
        "subwatch".bold().magenta(),
        format!("- watching {}", feed).dimmed(),
        CLOCK,
        format!("polling every {}s, press Ctrl-C to stop", args.interval).dimmed()
    );

    poll.run(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    Ok(())
}
