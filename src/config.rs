use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
};

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Application configuration managed by Figment.
///
/// Values merge in three layers: struct defaults, an optional `config.toml`,
/// and environment variables. Setting `DATABASE_URL` alone is enough to take
/// the service out of degraded mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server listen address. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port. Default: `3000`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Connection string for the SQLite store (e.g. `sqlite://data.db`).
    /// When absent, data endpoints respond 503; health and static serving
    /// keep working.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Log level for tracing subscriber initialization.
    /// Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Directory served for any request that matches no API route.
    /// Default: `public`.
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: None,
            loglevel: default_loglevel(),
            static_root: default_static_root(),
        }
    }
}

impl Config {
    /// Builds a Figment merging defaults, the optional TOML file, and env vars.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::raw().only(&[
            "listen_addr",
            "listen_port",
            "database_url",
            "loglevel",
            "static_root",
        ]))
    }

    /// Loads configuration; an unreadable layer is a startup failure.
    pub fn load() -> Self {
        Self::figment()
            .extract()
            .unwrap_or_else(|err| panic!("failed to extract configuration: {err}"))
    }
}

fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

fn default_listen_port() -> u16 {
    3000
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_static_root() -> PathBuf {
    PathBuf::from("public")
}
