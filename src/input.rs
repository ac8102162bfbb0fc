// Console input. A single background thread reads lines and forwards them
// over a channel, so the foreground loop can select on "next line" and
// "next tick" without leaking a reader per purchase.

use crossbeam::channel::{self, Receiver};
use std::io::BufRead;
use std::thread;
use tracing::debug;

/// Value that means "stop" at every prompt.
pub const CANCEL_SENTINEL: i64 = 0;

/// Spawn a thread that forwards trimmed lines from `reader`. The channel
/// disconnects once input ends, a read fails, or the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = channel::unbounded();
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    debug!(error = %e, "console read failed");
                    break;
                }
            };
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
        debug!("console input closed");
    });
    rx
}

/// True when `line` is the cancel sentinel.
pub fn is_cancel(line: &str) -> bool {
    line.trim().parse::<i64>() == Ok(CANCEL_SENTINEL)
}

/// Consume lines already waiting on `input`, stopping right after the first
/// sentinel. Returns whether a sentinel was found.
pub fn take_pending_cancel(input: &Receiver<String>) -> bool {
    input.try_iter().any(|line| is_cancel(&line))
}

/// Throw away every line already waiting on `input`.
pub fn discard_pending(input: &Receiver<String>) -> usize {
    input.try_iter().count()
}
