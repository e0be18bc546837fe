use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "todo.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("DATABASE_URL must be set and non-empty")]
    MissingDatabaseUrl,

    #[error("MAX_CONNECTIONS must be at least 1")]
    ZeroConnections,
}

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server listen address.
    /// Env: `LISTEN_ADDR`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// Env: `LISTEN_PORT`. Default: `8000`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database connection string, `postgresql://`, `postgres://` or `sqlite:`.
    /// Env: `DATABASE_URL`. Required.
    #[serde(default)]
    pub database_url: String,

    /// Fallback filter for the tracing subscriber when `RUST_LOG` is unset.
    /// Env: `LOGLEVEL`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Upper bound on pooled database connections.
    /// Env: `MAX_CONNECTIONS`. Default: `10`.
    #[serde(default)]
    pub max_connections: u32,

    /// Externally reachable URL of this server, advertised in the startup log.
    /// Env: `PUBLIC_URL`. Default: unset.
    #[serde(default)]
    pub public_url: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: String::new(),
            loglevel: "info".to_string(),
            max_connections: 10,
            public_url: None,
        }
    }
}

impl Config {
    /// Defaults, then `todo.toml` if present, then raw environment variables
    /// (field names in UPPER_SNAKE_CASE).
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if Path::new(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::raw().only(&[
            "LISTEN_ADDR",
            "LISTEN_PORT",
            "DATABASE_URL",
            "LOGLEVEL",
            "MAX_CONNECTIONS",
            "PUBLIC_URL",
        ]))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: Self = figment.extract().map_err(Box::new)?;
        if cfg.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if cfg.max_connections == 0 {
            return Err(ConfigError::ZeroConnections);
        }
        Ok(cfg)
    }

    pub fn listen_socket(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.listen_port)
    }
}

fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

fn default_listen_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DATABASE_URL", "sqlite::memory:");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.listen_socket(), "0.0.0.0:8000".parse().unwrap());
            assert_eq!(cfg.loglevel, "info");
            assert_eq!(cfg.max_connections, 10);
            assert!(cfg.public_url.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DATABASE_URL", "postgresql://u:p@db/todos");
            jail.set_env("LISTEN_ADDR", "127.0.0.1");
            jail.set_env("LISTEN_PORT", "9001");
            jail.set_env("MAX_CONNECTIONS", "3");
            jail.set_env("PUBLIC_URL", "https://todos.example.com");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.listen_socket(), "127.0.0.1:9001".parse().unwrap());
            assert_eq!(cfg.max_connections, 3);
            assert_eq!(cfg.public_url.unwrap().as_str(), "https://todos.example.com/");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_merged_below_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                database_url = "sqlite::memory:"
                listen_port = 7000
                loglevel = "debug"
                "#,
            )?;
            jail.set_env("LISTEN_PORT", "7100");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.database_url, "sqlite::memory:");
            assert_eq!(cfg.loglevel, "debug");
            assert_eq!(cfg.listen_port, 7100);
            Ok(())
        });
    }

    #[test]
    fn missing_database_url_is_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = Config::load().unwrap_err();
            assert!(matches!(err, ConfigError::MissingDatabaseUrl));
            Ok(())
        });
    }

    #[test]
    fn zero_connections_is_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DATABASE_URL", "sqlite::memory:");
            jail.set_env("MAX_CONNECTIONS", "0");
            let err = Config::load().unwrap_err();
            assert!(matches!(err, ConfigError::ZeroConnections));
            Ok(())
        });
    }
}
