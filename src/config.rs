//! Command-line and environment configuration.
use std::path::PathBuf;

use thiserror::Error;

/// The default size of the invocation channel.
pub const DEFAULT_CHANNEL_SIZE: usize = 100;

/// Environment variable overriding the channel size.
pub const CHANNEL_SIZE_VAR: &str = "INTERBANK_CHANNEL_SIZE";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Usage: {0} <store_id> <accounts_csv> <users_csv> <requests_csv>")]
    Usage(String),
    #[error("Invalid INTERBANK_CHANNEL_SIZE: {0}")]
    InvalidChannelSize(String),
}

/// Runtime configuration of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The store instance every ledger call goes to.
    pub store_id: String,
    pub accounts_path: PathBuf,
    pub users_path: PathBuf,
    pub requests_path: PathBuf,
    pub channel_size: usize,
}

impl Config {
    /// Builds the configuration from the process arguments and environment.
    pub fn load(args: &[String]) -> Result<Self, ConfigError> {
        Config::from_args(args)?.with_channel_size(std::env::var(CHANNEL_SIZE_VAR).ok())
    }

    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let [_, store_id, accounts, users, requests] = args else {
            let program = args.first().map_or("interbank", String::as_str);
            return Err(ConfigError::Usage(program.to_string()));
        };
        Ok(Config {
            store_id: store_id.clone(),
            accounts_path: PathBuf::from(accounts),
            users_path: PathBuf::from(users),
            requests_path: PathBuf::from(requests),
            channel_size: DEFAULT_CHANNEL_SIZE,
        })
    }

    /// Applies a channel size override, if any.
    pub fn with_channel_size(mut self, value: Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = value {
            self.channel_size = match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidChannelSize(value)),
            };
        }
        Ok(self)
    }
}
