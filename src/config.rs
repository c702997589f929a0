use std::{env, fmt::Display, net::IpAddr, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "8080")?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &value)
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_port_with_whitespace() {
        let port: u16 = parse_value("PORT", " 3000 ").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn rejects_unparsable_port() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().starts_with("invalid PORT value"));
    }

    #[test]
    fn addr_combines_host_and_port() {
        let config = Config {
            host: "127.0.0.1".parse().unwrap(),
            port: 9000,
        };
        assert_eq!(config.addr().to_string(), "127.0.0.1:9000");
    }
}
