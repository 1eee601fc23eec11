use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_JWT_TTL_SECS: i64 = 3600;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} missing, it is required")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    pub store: StoreConfig,
    pub static_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .ok_or(ConfigError::Missing("PORT"))?
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: "must be a valid u16 number".to_string(),
            })?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_ttl_secs = match lookup("JWT_TTL_SECS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_TTL_SECS",
                        reason: "must be a positive number of seconds".to_string(),
                    })
                }
            },
            None => DEFAULT_JWT_TTL_SECS,
        };

        let store = match lookup("STORE").as_deref() {
            None | Some("postgres") => StoreConfig::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => StoreConfig::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    reason: format!("unknown store `{other}`, expected postgres or memory"),
                })
            }
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            jwt_ttl_secs,
            store,
            static_dir: lookup("STATIC_DIR").map(PathBuf::from),
            log_format,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[
            ("PORT", "3000"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/tasks"),
        ])
        .unwrap();

        assert_eq!(cfg.addr(), "127.0.0.1:3000");
        assert_eq!(cfg.jwt_ttl_secs, 3600);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert!(cfg.static_dir.is_none());
        assert_eq!(
            cfg.store,
            StoreConfig::Postgres {
                database_url: "postgres://localhost/tasks".to_string()
            }
        );
    }

    #[test]
    fn test_missing_port() {
        let err = config(&[("JWT_SECRET", "s")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("PORT"));
    }

    #[test]
    fn test_bad_port() {
        let err = config(&[("PORT", "99999"), ("JWT_SECRET", "s")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_postgres_needs_database_url() {
        let err = config(&[("PORT", "3000"), ("JWT_SECRET", "s")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_memory_store_needs_no_database() {
        let cfg = config(&[
            ("PORT", "3000"),
            ("JWT_SECRET", "s"),
            ("STORE", "memory"),
            ("LOG_FORMAT", "json"),
            ("STATIC_DIR", "client/out"),
        ])
        .unwrap();

        assert_eq!(cfg.store, StoreConfig::Memory);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.static_dir, Some(PathBuf::from("client/out")));
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        let err = config(&[
            ("PORT", "3000"),
            ("JWT_SECRET", "s"),
            ("STORE", "memory"),
            ("JWT_TTL_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_TTL_SECS", .. }));
    }
}
