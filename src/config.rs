use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt as _;

use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu};

/// Process configuration, read from the environment (and `.env` when present).
///
/// | variable | default |
/// |---|---|
/// | `HOST_ADDRESS` | `0.0.0.0:9090` |
/// | `SURREAL_URL` | `mem://` |
/// | `SURREAL_NS`, `SURREAL_DB` | `stats` |
/// | `SURREAL_USER`, `SURREAL_PASS` | unset, no sign in |
/// | `LOG_DIR` | `logs` |
/// | `LOG_FILE` | `stats-server.log`, prefix of the daily JSON files |
/// | `LOG_LEVEL` | `info`, used when `RUST_LOG` is unset |
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(flatten)]
    pub database: DatabaseConfig,
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9090))
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file() -> String {
    "stats-server.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn load() -> Result<Config, ApplicationError> {
    envy::from_env::<Config>().context(ConfigLoadSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn everything_has_a_default() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();

        assert_eq!(config.host, default_host());
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log_file, "stats-server.log");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database.url.as_str(), "mem://");
        assert_eq!(config.database.namespace, "stats");
        assert!(config.database.credentials.is_none());
    }

    #[test]
    fn reads_database_settings() {
        let config: Config = envy::from_iter(vars(&[
            ("HOST_ADDRESS", "127.0.0.1:8080"),
            ("SURREAL_URL", "ws://localhost:8000"),
            ("SURREAL_NS", "ewm"),
            ("SURREAL_DB", "hits"),
            ("SURREAL_USER", "root"),
            ("SURREAL_PASS", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host.port(), 8080);
        assert_eq!(config.database.url.as_str(), "ws://localhost:8000/");
        assert_eq!(config.database.namespace, "ewm");
        assert_eq!(config.database.database, "hits");

        let credentials = config.database.credentials.unwrap();
        assert_eq!(credentials.username, "root");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn reads_log_settings() {
        let config: Config = envy::from_iter(vars(&[
            ("LOG_DIR", "/var/log/ewm"),
            ("LOG_FILE", "hits.log"),
            ("LOG_LEVEL", "stats_server=debug,surrealdb=warn"),
        ]))
        .unwrap();

        assert_eq!(config.log_dir, PathBuf::from("/var/log/ewm"));
        assert_eq!(config.log_file, "hits.log");
        assert_eq!(config.log_level, "stats_server=debug,surrealdb=warn");
    }
}
