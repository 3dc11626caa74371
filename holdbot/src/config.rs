//! Configuration
//!
//! The configuration is read from a TOML file and can be overridden by environment variables
//! prefixed with `HOLDBOT_`, where nested keys are separated by `__`, e.g.
//! `HOLDBOT_IRC__NICKNAME=holdbot`.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;
use crate::consts;
use crate::storage::channel_key;

/// The complete bot configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// IRC client configuration
    pub irc: IrcConfig,
    /// Bag of holding configuration
    #[serde(default)]
    pub bag: BagConfig,
    /// Storage backend for the bags
    #[serde(default)]
    pub storage: StorageConfig,
    /// Tracing configuration
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Settings for the bag of holding game.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BagConfig {
    /// The prefix that commands start with.
    #[serde(default = "default_command_prefix")]
    pub prefix: String,
    /// The default weight capacity of a channel's bag. `0` means unbounded.
    #[serde(default = "default_bag_capacity")]
    pub capacity: usize,
    /// Seed for the random number generator. A random seed is used when unset.
    pub seed: Option<u64>,
}

/// Where bags are persisted, selected by the `backend` key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Keep bags in memory only. Everything is lost on exit.
    Memory,
    /// Keep bags in a JSON file.
    File {
        /// Path to the JSON file.
        #[serde(default = "default_storage_path")]
        path: PathBuf,
    },
    /// Keep bags in a PostgreSQL database.
    Postgres(DbConfig),
}

/// PostgreSQL connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbConfig {
    /// Connection URL
    pub url: String,
    /// Maximum number of connections to keep in the connection pool
    #[serde(default = "default_max_db_connections")]
    pub max_connections: u32,
    /// Maximum idle duration for individual connections
    #[serde(default = "default_db_idle_timeout", with = "humantime_serde")]
    pub idle_timeout: Duration,
}

/// Logging and trace export settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TracingConfig {
    /// Export spans over OTLP
    #[serde(default)]
    pub enabled: bool,
    /// Log as JSON lines instead of human-readable text
    #[serde(default = "default_true")]
    pub json: bool,
}

/// Settings for a single channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrcChannelConfig {
    /// The shared key to access the channel.
    pub key: Option<String>,
    /// Overrides the bag capacity in this channel.
    pub bag_capacity: Option<usize>,
}

/// TLS settings for the IRC connection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrcTlsConfig {
    /// Enable TLS.
    pub enabled: bool,
}

/// IRC client settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrcConfig {
    /// The client's nickname.
    pub nickname: String,
    /// Alternative nicknames for the client, if the default is taken.
    #[serde(default)]
    pub alt_nicks: Vec<String>,
    /// The client's username.
    pub username: Option<String>,
    /// The client's real name.
    pub realname: Option<String>,
    /// The hostname of the server to connect to.
    pub hostname: String,
    /// The password to connect to the server.
    pub password: Option<String>,
    /// The port number of the server to connect to.
    pub port: Option<u16>,
    /// TLS configuration.
    pub tls: Option<IrcTlsConfig>,
    /// List of channels to automatically manage.
    #[serde(default)]
    pub channels: HashMap<String, Option<IrcChannelConfig>>,
}

impl Config {
    /// Loads the configuration from the TOML file at `path`, merged with `HOLDBOT_` environment
    /// variables. A missing file is not an error, as long as the environment provides the
    /// required keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration cannot be read or is missing required
    /// keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, Error> {
        let path = path.as_ref();

        debug!(?path, "loading configuration");

        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(consts::ENV_PREFIX).split("__"))
            .extract()
            .map_err(|err| Error::Config(Box::new(err)))
    }

    /// Returns the bag capacity for `channel`.
    ///
    /// Channel names are compared the same way bags are keyed, so an override always applies
    /// to the bag it names.
    #[must_use]
    pub fn capacity_for(&self, channel: &str) -> usize {
        let key = channel_key(channel);

        self.irc
            .channels
            .iter()
            .find(|(name, _)| channel_key(name) == key)
            .and_then(|(_, config)| config.as_ref()?.bag_capacity)
            .unwrap_or(self.bag.capacity)
    }
}

impl IrcConfig {
    /// Returns the configured port, or the default port for plain or TLS connections.
    #[must_use]
    pub fn port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None => self.fallback_port(),
        }
    }

    /// Return the port number to use based on whether the connection requires TLS or not.
    fn fallback_port(&self) -> u16 {
        if self.tls.as_ref().map(|tls| tls.enabled) == Some(true) {
            6697
        } else {
            6667
        }
    }
}

impl From<IrcConfig> for irc::client::data::Config {
    fn from(config: IrcConfig) -> Self {
        let port = config.port();
        let use_tls = config.tls.map(|x| x.enabled);
        let channel_keys = config
            .channels
            .iter()
            .filter_map(|(name, channel)| {
                let key = channel.as_ref()?.key.clone()?;

                Some((name.clone(), key))
            })
            .collect();
        let channels = config.channels.into_keys().collect::<Vec<_>>();

        irc::client::data::Config {
            nickname: Some(config.nickname),
            username: config.username,
            realname: config.realname,
            server: Some(config.hostname),
            password: config.password,
            port: Some(port),
            use_tls,
            channels,
            channel_keys,
            alt_nicks: config.alt_nicks,
            ..Default::default()
        }
    }
}

impl Default for BagConfig {
    fn default() -> Self {
        BagConfig {
            prefix: default_command_prefix(),
            capacity: default_bag_capacity(),
            seed: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            path: default_storage_path(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig {
            enabled: false,
            json: true,
        }
    }
}

/// Returns the default command prefix.
#[must_use]
pub fn default_command_prefix() -> String {
    consts::DEFAULT_COMMAND_PREFIX.to_string()
}

/// Returns the default bag capacity.
#[must_use]
pub const fn default_bag_capacity() -> usize {
    consts::DEFAULT_BAG_CAPACITY
}

/// Returns the default path of the bag file.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    PathBuf::from(consts::DEFAULT_STORAGE_PATH)
}

/// Returns the default size of the connection pool.
#[must_use]
pub const fn default_max_db_connections() -> u32 {
    consts::DEFAULT_MAX_DB_CONNECTIONS
}

/// Returns the default idle timeout of pooled connections.
#[must_use]
pub const fn default_db_idle_timeout() -> Duration {
    consts::DEFAULT_DB_IDLE_TIMEOUT
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .expect("valid config")
    }

    const MINIMAL: &str = r#"
        [irc]
        nickname = "holdbot"
        hostname = "irc.example.com"
    "#;

    #[test]
    fn it_should_apply_defaults() {
        let config = parse(MINIMAL);

        assert_eq!(config.bag, BagConfig::default());
        assert_eq!(config.bag.prefix, ".");
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.tracing, TracingConfig::default());
        assert_eq!(config.irc.port(), 6667);
    }

    #[test]
    fn it_should_use_tls_port() {
        let config = parse(
            r#"
            [irc]
            nickname = "holdbot"
            hostname = "irc.example.com"
            tls = { enabled = true }
        "#,
        );

        assert_eq!(config.irc.port(), 6697);
    }

    #[test]
    fn it_should_override_capacity_per_channel() {
        let config = parse(
            r##"
            [irc]
            nickname = "holdbot"
            hostname = "irc.example.com"

            [irc.channels."#Small"]
            bag_capacity = 10

            [irc.channels."#plain"]

            [bag]
            capacity = 300
        "##,
        );

        assert_eq!(config.capacity_for("#small"), 10);
        assert_eq!(config.capacity_for("#plain"), 300);
        assert_eq!(config.capacity_for("#unknown"), 300);
    }

    #[test]
    fn it_should_match_capacity_like_bag_keys() {
        let config = parse(
            r##"
            [irc]
            nickname = "holdbot"
            hostname = "irc.example.com"

            [irc.channels."#ÆRØ"]
            bag_capacity = 7
        "##,
        );

        assert_eq!(config.capacity_for("#ærø"), 7);
        assert_eq!(
            channel_key("#ærø"),
            channel_key("#ÆRØ"),
            "both names share one bag"
        );
    }

    #[test]
    fn it_should_parse_postgres_storage() {
        let config = parse(
            r#"
            [irc]
            nickname = "holdbot"
            hostname = "irc.example.com"

            [storage]
            backend = "postgres"
            url = "postgres://localhost/holdbot"
            idle_timeout = "30s"
        "#,
        );

        assert_eq!(
            config.storage,
            StorageConfig::Postgres(DbConfig {
                url: "postgres://localhost/holdbot".to_string(),
                max_connections: consts::DEFAULT_MAX_DB_CONNECTIONS,
                idle_timeout: Duration::from_secs(30),
            })
        );
    }

    #[test]
    fn it_should_convert_into_irc_config() {
        let config = parse(
            r##"
            [irc]
            nickname = "holdbot"
            hostname = "irc.example.com"

            [irc.channels."#secret"]
            key = "hunter2"
        "##,
        );
        let irc_config: irc::client::data::Config = config.irc.into();

        assert_eq!(irc_config.nickname.as_deref(), Some("holdbot"));
        assert_eq!(irc_config.channels, vec!["#secret".to_string()]);
        assert_eq!(
            irc_config.channel_keys.get("#secret").map(String::as_str),
            Some("hunter2")
        );
    }
}
