use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(author = "Giovanni Bassi <giggio@giggio.net>", version = env!("CARGO_PKG_VERSION"), about = "Watches a TikTok profile and posts new videos to a Discord webhook", long_about = None)]
pub struct Args {
    #[clap(long, env = "DISCORD_WEBHOOK", help = "Discord webhook url", hide_env_values = true)]
    pub webhook_url: Option<String>,
    #[clap(long, env = "TIKTOK_USERNAME", default_value = "yeekzyofficial", help = "TikTok profile to watch")]
    pub username: String,
    #[clap(long, env = "PORT", default_value_t = 3000, help = "Port of the health check endpoint")]
    pub port: u16,
    #[clap(
        long,
        env = "STATE_FILE",
        default_value = "lastVideo.json",
        help = "File where the last notified video id is kept"
    )]
    pub state_file: PathBuf,
    #[clap(
        long = "interval",
        env = "POLL_INTERVAL_SECS",
        default_value_t = 120,
        help = "Seconds between profile checks"
    )]
    pub interval_secs: u64,
    #[clap(
        long = "timeout",
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 30,
        help = "Timeout in seconds for each HTTP request"
    )]
    pub timeout_secs: u64,
    #[clap(long, env = "USER_AGENT", default_value = "Mozilla/5.0", help = "User agent sent to TikTok")]
    pub user_agent: String,
    #[clap(long, env = "TIKTOK_BASE_URL", default_value = "https://www.tiktok.com", help = "TikTok base url")]
    pub base_url: String,

    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Args {
    pub fn new() -> Args {
        Args::parse()
    }
    #[allow(dead_code)]
    pub(crate) fn new_from<I, T>(args: I) -> Args
    where
        I: Iterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Args::parse_from(args)
    }
}
