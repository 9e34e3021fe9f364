use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use teloxide::types::ChatId;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} has invalid value '{1}'")]
    Invalid(&'static str, String),
    #[error("WEBHOOK_URL and WEBHOOK_ADDR must be set together")]
    PartialWebhook,
}

/// Process configuration, read once at startup. Any error here is fatal
/// before the dispatcher starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
    /// Operator chats notified on a first-ever sighting of a user.
    pub admin_chats: Vec<ChatId>,
    pub assets_dir: PathBuf,
    pub followup_delay: Duration,
    /// When set, serve updates over an axum webhook instead of polling.
    pub webhook: Option<(SocketAddr, Url)>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            std::env::var("TELOXIDE_TOKEN").map_err(|_| ConfigError::Missing("TELOXIDE_TOKEN"))?;
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let admin_chats = match std::env::var("ADMIN_CHAT_IDS") {
            Ok(raw) => parse_admin_chats(&raw)?,
            Err(_) => Vec::new(),
        };

        let assets_dir = std::env::var("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets"));

        let followup_delay = match std::env::var("FOLLOWUP_DELAY_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("FOLLOWUP_DELAY_SECS", raw))?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(120),
        };

        let webhook_url = std::env::var("WEBHOOK_URL").ok();
        let webhook_addr = std::env::var("WEBHOOK_ADDR").ok();
        let webhook = match (webhook_url, webhook_addr) {
            (Some(url), Some(addr)) => {
                let url = url
                    .parse::<Url>()
                    .map_err(|_| ConfigError::Invalid("WEBHOOK_URL", url))?;
                let addr = addr
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::Invalid("WEBHOOK_ADDR", addr))?;
                Some((addr, url))
            }
            (None, None) => None,
            _ => return Err(ConfigError::PartialWebhook),
        };

        Ok(Self {
            bot_token,
            database_url,
            admin_chats,
            assets_dir,
            followup_delay,
            webhook,
        })
    }
}

fn parse_admin_chats(raw: &str) -> Result<Vec<ChatId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map(ChatId)
                .map_err(|_| ConfigError::Invalid("ADMIN_CHAT_IDS", raw.to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_admin_chats() {
        let chats = parse_admin_chats("528017102, 406865885").unwrap();
        assert_eq!(chats, vec![ChatId(528017102), ChatId(406865885)]);
        assert!(parse_admin_chats("").unwrap().is_empty());
        assert!(parse_admin_chats("not-a-number").is_err());
    }
}
