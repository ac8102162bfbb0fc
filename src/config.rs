// Command line / environment configuration. Every option has a default,
// so running the binary with no flags gives the plain interactive flow.

use clap::Parser;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.v2.rainyun.com/user/reward/items";

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Poll a rewards shop and grab an item as soon as it can be redeemed",
    after_help = "Exit status: 0 when you leave with 0 at the item prompt, 1 after a fatal error (item list unavailable, network or decode failure)."
)]
pub struct Config {
    /// Rewards endpoint used for both listing and purchasing
    #[arg(long, env = "REWARDS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key; prompted for interactively when absent
    #[arg(long, env = "REWARDS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Delay between purchase attempts, in milliseconds
    #[arg(long, env = "REWARDS_INTERVAL_MS", default_value_t = 500,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "REWARDS_TIMEOUT_SECS", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Log request details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
