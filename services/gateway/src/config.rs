//! Process configuration
//!
//! Read from the environment once at startup. A missing token or channel
//! list is fatal: the process must not start serving without them.

use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use types::ids::ChannelId;
use types::variant::{ParserVariant, UnknownVariant};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,

    #[error("CHANNEL_IDS is not set")]
    MissingChannels,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Variant(#[from] UnknownVariant),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub channel_ids: HashSet<ChannelId>,
    pub port: u16,
    pub parser_variant: ParserVariant,
    pub poll_interval: Duration,
    pub discord_api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let channel_ids: HashSet<ChannelId> = lookup("CHANNEL_IDS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ChannelId::new)
            .collect();
        if channel_ids.is_empty() {
            return Err(ConfigError::MissingChannels);
        }

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let parser_variant = match lookup("PARSER_VARIANT") {
            Some(raw) => raw.parse()?,
            None => ParserVariant::default(),
        };

        let poll_secs = match lookup("POLL_INTERVAL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "POLL_INTERVAL_SECS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let discord_api_base = lookup("DISCORD_API_BASE")
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string());

        Ok(Self {
            discord_token,
            channel_ids,
            port,
            parser_variant,
            poll_interval: Duration::from_secs(poll_secs),
            discord_api_base,
        })
    }

    /// Loopback URL the relay forwards captured embeds to.
    pub fn ingest_url(&self) -> String {
        format!("http://127.0.0.1:{}/pets", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("CHANNEL_IDS", "111, 222,,"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.parser_variant, ParserVariant::QuickJoin);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.discord_api_base, DEFAULT_DISCORD_API_BASE);
        assert_eq!(config.channel_ids.len(), 2);
        assert!(config.channel_ids.contains(&ChannelId::new("222")));
        assert_eq!(config.ingest_url(), "http://127.0.0.1:3000/pets");
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("CHANNEL_IDS", "111")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));

        let err = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "  "),
            ("CHANNEL_IDS", "111"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_missing_channels_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingChannels));

        let err = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("CHANNEL_IDS", " , "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingChannels));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("CHANNEL_IDS", "111"),
            ("SERVER_PORT", "8088"),
            ("PARSER_VARIANT", "job-script"),
            ("POLL_INTERVAL_SECS", "2"),
            ("DISCORD_API_BASE", "http://localhost:9000/api/"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.parser_variant, ParserVariant::JobScript);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.discord_api_base, "http://localhost:9000/api");
    }

    #[test]
    fn test_invalid_values() {
        let base = [("DISCORD_TOKEN", "abc"), ("CHANNEL_IDS", "111")];

        let mut pairs = base.to_vec();
        pairs.push(("SERVER_PORT", "eighty"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SERVER_PORT", .. }));

        let mut pairs = base.to_vec();
        pairs.push(("POLL_INTERVAL_SECS", "0"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "POLL_INTERVAL_SECS", .. }));

        let mut pairs = base.to_vec();
        pairs.push(("PARSER_VARIANT", "merged"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Variant(_)));
    }
}
