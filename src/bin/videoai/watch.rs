//! Drives the countdown with a progress bar until it finishes or the user
//! presses Ctrl-C.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use videoai::generation::format_clock;
use videoai::{FileStore, GenerationController, SessionEvent, SystemClock};

use crate::output;

/// How `follow` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The countdown reached zero.
    Completed,
    /// Interrupted; the session keeps running in the store.
    Detached,
    /// Nothing was running.
    Idle,
}

pub async fn follow(
    controller: &mut GenerationController<FileStore, SystemClock>,
) -> Result<Outcome> {
    if !controller.is_generating() {
        return Ok(Outcome::Idle);
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );
    pb.set_position(u64::from(controller.progress_percent()));
    pb.set_message(remaining_message(controller.remaining_secs()));

    let mut ticker = interval(controller.config().tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately.
    ticker.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let event = controller.tick().context("Failed to persist session state")?;
                match event {
                    Some(SessionEvent::Progress { remaining_secs, progress_percent }) => {
                        pb.set_position(u64::from(progress_percent));
                        pb.set_message(remaining_message(remaining_secs));
                    }
                    Some(event @ SessionEvent::Completed { .. }) => {
                        pb.set_position(100);
                        pb.finish_and_clear();
                        output::print_notice(&event);
                        return Ok(Outcome::Completed);
                    }
                    Some(other) => debug!(?other, "unexpected tick event"),
                    None => {
                        pb.finish_and_clear();
                        return Ok(Outcome::Idle);
                    }
                }
            }
            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                pb.abandon_with_message("detached");
                println!(
                    "Generation keeps running ({} left). Run `videoai watch` to follow it.",
                    format_clock(controller.remaining_secs())
                );
                return Ok(Outcome::Detached);
            }
        }
    }
}

fn remaining_message(remaining_secs: u32) -> String {
    format!("{} left", format_clock(remaining_secs))
}
