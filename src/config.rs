use anyhow::{Result, bail};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Endpoint the gateway talks to unless `MONGODB_URI` says otherwise.
pub const DEFAULT_MONGO_URI: &str = "mongodb://192.168.100.5";

/// Logical database every command is run against.
pub const DEFAULT_DATABASE_NAME: &str = "mondocks";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// How the gateway obtains a database handle for each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Open a fresh client for every call and drop it afterwards.
    #[default]
    PerCall,
    /// Connect once and reuse the handle for the lifetime of the gateway.
    Shared,
}

impl FromStr for ConnectionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "per-call" | "per_call" | "percall" => Ok(ConnectionMode::PerCall),
            "shared" => Ok(ConnectionMode::Shared),
            other => bail!("Unknown connection mode '{}'. Expected 'per-call' or 'shared'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mongo_uri: String,
    pub database_name: String,
    pub connection_mode: ConnectionMode,
    /// `None` leaves the driver's own server selection timeout in place.
    pub server_selection_timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            connection_mode: ConnectionMode::default(),
            server_selection_timeout: None,
        }
    }
}

impl GatewayConfig {
    /// Load `.env` (if any) and apply overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mongo_uri = lookup("MONGODB_URI")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.mongo_uri);

        let database_name = lookup("MONGODB_DATABASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.database_name);

        let connection_mode = match lookup("MONGODB_CONNECTION_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.connection_mode,
        };

        let server_selection_timeout = lookup("MONGODB_SERVER_SELECTION_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis);

        Ok(Self {
            mongo_uri,
            database_name,
            connection_mode,
            server_selection_timeout,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid BIND_ADDR '{}': {}", raw, e))?;
        Ok(Self { bind_addr })
    }
}
