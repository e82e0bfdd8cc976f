use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail};
use location_tracker_data_management::{resolve_path, StoreKind, DATABASE_PATH};
use tracing::{info, warn};

pub const DEFAULT_LOG_DIR: &str = "server/log";

pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub store: StoreKind,
    pub admin_token: Option<String>,
    pub tls: Option<TlsPaths>,
}

pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let store = match try_load::<String>(&var, "LOCATION_STORE", "sqlite")?.as_str() {
            "sqlite" => StoreKind::Database(resolve_path(&PathBuf::from(try_load::<String>(
                &var,
                "LOCATION_DATABASE",
                DATABASE_PATH,
            )?))),
            "memory" => StoreKind::Memory,
            other => bail!("LOCATION_STORE must be `sqlite` or `memory`, got `{other}`"),
        };

        let admin_token = var("LOCATION_ADMIN_TOKEN");
        if admin_token.is_none() {
            warn!("LOCATION_ADMIN_TOKEN not set, listing and clearing locations is open to anyone");
        }

        let tls = match (var("LOCATION_TLS_CERT"), var("LOCATION_TLS_KEY")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: resolve_path(&PathBuf::from(cert)),
                key: resolve_path(&PathBuf::from(key)),
            }),
            (None, None) => None,
            _ => bail!("LOCATION_TLS_CERT and LOCATION_TLS_KEY must be set together"),
        };

        Ok(Self {
            host: try_load(&var, "LOCATION_HOST", "0.0.0.0")?,
            port: try_load(&var, "LOCATION_PORT", "5000")?,
            store,
            admin_token,
            tls,
        })
    }
}

/// Read before logging is set up, so it stays silent.
pub fn log_dir() -> PathBuf {
    let dir = env::var("LOCATION_LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    resolve_path(&PathBuf::from(dir))
}

fn try_load<T: FromStr>(var: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}
