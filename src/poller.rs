// Fixed-interval purchase loop for a single item.
//
// A ticker is created per polling session and selected against the console
// channel. A `0` that arrives first ends the session; a tick triggers one
// purchase attempt. Attempts are never interrupted: a `0` typed while a
// request is in flight is picked up on the next tick, before any further
// attempt. Anything typed during the final, successful request is dropped
// so it cannot leak into the next item prompt.

use crate::api::RewardsApi;
use crate::error::ApiError;
use crate::input::{discard_pending, is_cancel, take_pending_cancel};
use crossbeam::channel::{self, Receiver};
use crossbeam::select;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How a polling session ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Purchased,
    Cancelled,
}

enum Event {
    // `None` once the console has closed.
    Input(Option<String>),
    Tick,
}

/// Failures that end the program, not just the polling session.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to write to console: {0}")]
    Io(#[from] std::io::Error),
}

/// Retry a purchase of `item_id` every `interval` until it succeeds or a
/// cancel sentinel arrives on `input`.
pub fn poll_purchase<A, W>(
    api: &A,
    api_key: &str,
    item_id: i64,
    interval: Duration,
    input: &Receiver<String>,
    out: &mut W,
) -> Result<PollOutcome, PollError>
where
    A: RewardsApi + ?Sized,
    W: Write,
{
    info!(item_id, ?interval, "polling started");
    let ticker = channel::tick(interval);
    let mut console = input.clone();
    let mut attempts: u64 = 0;

    let outcome = loop {
        let event = select! {
            recv(console) -> line => Event::Input(line.ok()),
            recv(ticker) -> _ => Event::Tick,
        };

        match event {
            Event::Input(Some(line)) if is_cancel(&line) => {
                writeln!(out, "Operation cancelled")?;
                break PollOutcome::Cancelled;
            }
            Event::Input(Some(line)) => {
                warn!(input = %line, "ignoring input while purchasing; enter 0 to stop");
            }
            Event::Input(None) => {
                info!("console closed, polling continues without cancellation");
                console = channel::never();
            }
            Event::Tick => {
                // A sentinel queued during the last attempt wins over this tick.
                if take_pending_cancel(&console) {
                    writeln!(out, "Operation cancelled")?;
                    break PollOutcome::Cancelled;
                }

                attempts += 1;
                let response = api.purchase(api_key, item_id)?;
                if response.is_success() {
                    writeln!(out, "Purchase succeeded!")?;
                    let dropped = discard_pending(&console);
                    if dropped > 0 {
                        debug!(dropped, "discarded input typed during the final attempt");
                    }
                    break PollOutcome::Purchased;
                }
                writeln!(out, "Purchase attempt: {}", response.message)?;
            }
        }
    };

    info!(item_id, attempts, ?outcome, "polling finished");
    Ok(outcome)
}
