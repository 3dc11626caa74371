//! Default values.

use std::time::Duration;

/// The prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "HOLDBOT_";

/// The default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "holdbot.toml";

/// The default prefix that commands start with.
pub const DEFAULT_COMMAND_PREFIX: &str = ".";

/// The default weight capacity of a channel's bag.
pub const DEFAULT_BAG_CAPACITY: usize = 200;

/// The default path of the JSON file that bags are kept in.
pub const DEFAULT_STORAGE_PATH: &str = "bags.json";

/// The default value for the maximum number of connections the database connection pool will keep
/// open at once.
pub const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

/// The default value for the duration the connection pool will keep an idle connection open.
pub const DEFAULT_DB_IDLE_TIMEOUT: Duration = Duration::from_secs(5);
