// Entrypoint for the CLI application.
// - Parse flags, set up logging, obtain the API key, then hand over to the
//   interactive session.
// - Fatal errors end up here: printed to stderr with a non-zero exit code.

use anyhow::Result;
use clap::Parser;
use rewards_grab::api::ApiClient;
use rewards_grab::config::Config;
use rewards_grab::input::spawn_line_reader;
use rewards_grab::ui::{prompt_api_key, read_api_key, Session};
use std::io::{self, BufReader, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing_subscriber(config.verbose);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    let api = ApiClient::from_config(&config)?;

    // The hidden prompt has to run before the reader thread owns stdin.
    let api_key = match config.api_key.clone() {
        Some(key) => Some(key),
        None if io::stdin().is_terminal() => Some(prompt_api_key()?),
        None => None,
    };

    let input = spawn_line_reader(BufReader::new(io::stdin()));
    let mut out = io::stdout();
    let api_key = match api_key {
        Some(key) => key,
        None => read_api_key(&input, &mut out)?,
    };

    let mut session = Session::new(&api, api_key, config.interval(), input, out);
    session.run()
}

fn init_tracing_subscriber(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(format!(
        "{}_LOG_LEVEL",
        env!("CARGO_PKG_NAME").to_uppercase().replace('-', "_")
    ))
    .unwrap_or_else(|_| EnvFilter::new(fallback))
    .add_directive("reqwest=warn".parse().expect("valid directive"))
    .add_directive("hyper=warn".parse().expect("valid directive"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
