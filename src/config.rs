use std::env;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub tracker_api_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = raw_address.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDRESS",
            value: raw_address.clone(),
        })?;

        let tracker_api_url = lookup("TRACKER_API_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("TRACKER_API_URL"))?
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match lookup("TRACKER_TIMEOUT_SECS") {
            None => Duration::from_secs(30),
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    name: "TRACKER_TIMEOUT_SECS",
                    value: raw,
                })?,
        };

        Ok(Config {
            bind_address,
            tracker_api_url,
            client_id: lookup("TRACKER_CLIENT_ID").filter(|v| !v.is_empty()),
            client_secret: lookup("TRACKER_CLIENT_SECRET").filter(|v| !v.is_empty()),
            request_timeout,
        })
    }
}
