use super::args::Args;
use super::error::RelayError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Settings read once at startup and shared, read only, by every component.
#[derive(Clone)]
pub struct Config {
    pub webhook_url: String,
    pub username: String,
    pub port: u16,
    pub state_file: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub base_url: String,
}

impl Config {
    pub fn profile_url(&self) -> String {
        format!("{}/@{}", self.base_url.trim_end_matches('/'), self.username)
    }
}

impl TryFrom<Args> for Config {
    type Error = RelayError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let webhook_url = match args.webhook_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(RelayError::ConfigurationMissing("DISCORD_WEBHOOK environment variable not set.")),
        };
        Ok(Config {
            webhook_url,
            username: args.username,
            port: args.port,
            state_file: args.state_file,
            poll_interval: Duration::from_secs(args.interval_secs.max(1)),
            request_timeout: Duration::from_secs(args.timeout_secs.max(1)),
            user_agent: args.user_agent,
            base_url: args.base_url,
        })
    }
}

// The webhook url carries its own credentials, keep it out of the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("webhook_url", &"<redacted>")
            .field("username", &self.username)
            .field("port", &self.port)
            .field("state_file", &self.state_file)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config(base_url: &str, webhook_url: &str) -> Config {
    Config {
        webhook_url: webhook_url.to_owned(),
        username: "someone".to_owned(),
        port: 3000,
        state_file: PathBuf::from("lastVideo.json"),
        poll_interval: Duration::from_secs(120),
        request_timeout: Duration::from_secs(5),
        user_agent: "Mozilla/5.0".to_owned(),
        base_url: base_url.to_owned(),
    }
}
