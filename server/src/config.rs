use rextract_core::OcrConfig;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_POOL_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error(transparent)]
    Ocr(#[from] rextract_core::ocr::ConfigError),
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Postgres URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    pub ocr: OcrConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `DATABASE_URL`: Postgres connection string (optional)
    /// - `REXTRACT_BIND_ADDR`: listen address (default: 0.0.0.0:8080)
    /// - `REXTRACT_DB_POOL_SIZE`: connection pool size (default: 10)
    ///
    /// plus everything [`OcrConfig::from_env`] reads.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_bind_addr(
            &env::var("REXTRACT_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let db_pool_size = match env::var("REXTRACT_DB_POOL_SIZE") {
            Ok(value) => parse_pool_size(&value)?,
            Err(_) => DEFAULT_DB_POOL_SIZE,
        };

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            bind_addr,
            database_url,
            db_pool_size,
            ocr: OcrConfig::from_env()?,
        })
    }
}

fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: "REXTRACT_BIND_ADDR".to_string(),
        value: value.to_string(),
    })
}

fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidValue {
            name: "REXTRACT_DB_POOL_SIZE".to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_addr() {
        let addr = parse_bind_addr(DEFAULT_BIND_ADDR).unwrap();
        assert_eq!(addr.port(), 8080);
        assert_eq!(parse_bind_addr(" 127.0.0.1:3000 ").unwrap().port(), 3000);
        assert!(matches!(
            parse_bind_addr("localhost"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_pool_size() {
        assert_eq!(parse_pool_size("4").unwrap(), 4);
        assert!(parse_pool_size("0").is_err());
        assert!(parse_pool_size("many").is_err());
    }
}
