// UI layer: the interactive loop. It lists items, reads the item to grab
// and hands over to the poller, then starts again with a fresh listing.
// Fatal errors are returned to `main`, which prints them and exits.

use crate::api::{Item, RewardsApi};
use crate::input::CANCEL_SENTINEL;
use crate::poller::poll_purchase;
use anyhow::{bail, Context, Result};
use crossbeam::channel::Receiver;
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tracing::info;

const API_KEY_PROMPT: &str = "Enter API key";
const ITEM_PROMPT: &str = "Enter item ID to purchase (0 to exit): ";

/// Ask for the API key with hidden input. Only usable on a terminal, and
/// only before the console reader thread starts.
pub fn prompt_api_key() -> Result<String> {
    let key: String = Password::new().with_prompt(API_KEY_PROMPT).interact()?;
    checked_api_key(&key)
}

/// Read the API key as a plain line, for when stdin is not a terminal.
pub fn read_api_key<W: Write>(input: &Receiver<String>, out: &mut W) -> Result<String> {
    write!(out, "{}: ", API_KEY_PROMPT)?;
    out.flush()?;
    match input.recv() {
        Ok(key) => checked_api_key(&key),
        Err(_) => bail!("No API key provided"),
    }
}

/// Trim `raw` and refuse a key that is empty afterwards.
pub fn checked_api_key(raw: &str) -> Result<String> {
    let key = raw.trim();
    if key.is_empty() {
        bail!("No API key provided");
    }
    Ok(key.to_string())
}

enum State {
    Listing,
    Selecting,
    Polling(i64),
}

/// One interactive run: the API key is fixed for its whole lifetime.
pub struct Session<'a, A: ?Sized, W> {
    api: &'a A,
    api_key: String,
    interval: Duration,
    input: Receiver<String>,
    out: W,
}

impl<'a, A, W> Session<'a, A, W>
where
    A: RewardsApi + ?Sized,
    W: Write,
{
    pub fn new(api: &'a A, api_key: String, interval: Duration, input: Receiver<String>, out: W) -> Self {
        Session {
            api,
            api_key,
            interval,
            input,
            out,
        }
    }

    /// Drive the listing / selection / polling cycle until the user enters
    /// the sentinel at selection or input ends. Returns an error for
    /// anything that should end the program.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Listing;
        loop {
            state = match state {
                State::Listing => {
                    let items = self.fetch_with_spinner()?;
                    self.show_items(&items)?;
                    State::Selecting
                }
                State::Selecting => match self.read_item_id()? {
                    Some(item_id) => State::Polling(item_id),
                    None => break,
                },
                State::Polling(item_id) => {
                    let outcome =
                        poll_purchase(self.api, &self.api_key, item_id, self.interval, &self.input, &mut self.out)
                            .context("Purchase failed")?;
                    info!(item_id, ?outcome, "back to item list");
                    State::Listing
                }
            };
        }
        Ok(())
    }

    fn fetch_with_spinner(&self) -> Result<Vec<Item>> {
        // Draws to stderr and stays hidden when that is not a terminal.
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message("Fetching items...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        let items = self.api.fetch_items(&self.api_key);
        spinner.finish_and_clear();
        items.context("Failed to fetch item list")
    }

    fn show_items(&mut self, items: &[Item]) -> Result<()> {
        writeln!(self.out, "Available items:")?;
        for item in items {
            writeln!(self.out, "ID: {}, Name: {}", item.id, item.name)?;
        }
        writeln!(self.out, "While purchasing, enter 0 and press Enter to stop")?;
        Ok(())
    }

    /// `None` means exit: the sentinel was entered or input ended.
    fn read_item_id(&mut self) -> Result<Option<i64>> {
        loop {
            write!(self.out, "{}", ITEM_PROMPT)?;
            self.out.flush()?;
            let line = match self.input.recv() {
                Ok(line) => line,
                Err(_) => {
                    writeln!(self.out)?;
                    return Ok(None);
                }
            };
            match line.parse::<i64>() {
                Ok(CANCEL_SENTINEL) => return Ok(None),
                Ok(id) if id > 0 => return Ok(Some(id)),
                _ => writeln!(self.out, "Invalid item ID: {}", line)?,
            }
        }
    }

    /// Give back the output sink, mostly useful to inspect captured output.
    pub fn into_output(self) -> W {
        self.out
    }
}
