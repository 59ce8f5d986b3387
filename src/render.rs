// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use html_escape::decode_html_entities;

use crate::enrich::EnrichedItem;
use crate::error::RenderError;

/// Output side of the watcher
pub trait Presenter: Send {
    /// Show one post
    fn render(&mut self, item: &EnrichedItem) -> Result<(), RenderError>;

    /// Signal that new posts arrived. Called at most once per cycle.
    fn notify(&mut self);

    /// Show an error without stopping
    fn report_error(&mut self, message: &str);
}

/// How new posts are announced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NotificationCue {
    /// Ring the terminal bell
    #[default]
    Bell,
    /// Run an external program, e.g. `paplay notify.wav`
    Command { program: String, args: Vec<String> },
    Silent,
}

impl NotificationCue {
    /// Build a command cue from a shell-like line split on whitespace
    pub fn command(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self::Command {
            program,
            args: parts.collect(),
        })
    }
}

/// Renders posts as text blocks with inline images (iTerm2 image protocol)
pub struct TerminalPresenter<W: Write> {
    out: W,
    cue: NotificationCue,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout(cue: NotificationCue) -> Self {
        Self::new(io::stdout(), cue)
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, cue: NotificationCue) -> Self {
        Self { out, cue }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_item(&mut self, item: &EnrichedItem) -> io::Result<()> {
        let out = &mut self.out;

        writeln!(out, "{}", decode_html_entities(&item.title).bold().green())?;

        let time = format_time(&item.created_at.with_timezone(&Local)).magenta();
        match &item.category {
            Some(category) => writeln!(out, "{}  {}", time, category.cyan())?,
            None => writeln!(out, "{}", time)?,
        }

        writeln!(out, "{}", item.url.dimmed())?;
        if item.permalink.as_str() != item.url {
            writeln!(out, "{}", item.permalink.as_str().dimmed())?;
        }

        for media in &item.media {
            match &media.payload {
                Some(payload) => write_inline_image(out, payload, media.width)?,
                None => writeln!(
                    out,
                    "{}",
                    format!("[image unavailable: {}]", media.url).dimmed()
                )?,
            }
        }

        if !item.body.trim().is_empty() {
            writeln!(out, "{}", decode_html_entities(&item.body))?;
        }

        writeln!(out)?;
        out.flush()
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn render(&mut self, item: &EnrichedItem) -> Result<(), RenderError> {
        Ok(self.write_item(item)?)
    }

    fn notify(&mut self) {
        match &self.cue {
            NotificationCue::Bell => {
                let _ = self.out.write_all(b"\x07");
                let _ = self.out.flush();
            }
            NotificationCue::Command { program, args } => {
                let spawned = Command::new(program)
                    .args(args)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn();

                match spawned {
                    // Reap the player in the background so it never blocks a cycle
                    Ok(mut child) => {
                        std::thread::spawn(move || child.wait());
                    }
                    Err(e) => tracing::warn!(%program, error = %e, "failed to play notification"),
                }
            }
            NotificationCue::Silent => {}
        }
    }

    fn report_error(&mut self, message: &str) {
        let _ = writeln!(self.out, "{} {}", "Error:".bold().red(), message);
        let _ = self.out.flush();
    }
}

/// Clock time in the `h:MM:ss AM` style
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%-I:%M:%S %p").to_string()
}

/// Write an image using the `ESC ] 1337 ; File=` inline image sequence
fn write_inline_image<W: Write>(out: &mut W, payload: &[u8], width: u32) -> io::Result<()> {
    let encoded = general_purpose::STANDARD.encode(payload);
    writeln!(
        out,
        "\x1b]1337;File=inline=1;size={};width={}px:{}\x07",
        payload.len(),
        width,
        encoded
    )
}
