//! Persistence configuration.
//!
//! Layering, lowest precedence first: built-in defaults, an optional YAML
//! file, then `COURSEKIT__*` environment variables (`__` separates nesting,
//! e.g. `COURSEKIT__DATABASE__DSN`).

use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::LimitCfg;

pub const ENV_PREFIX: &str = "COURSEKIT__";

#[derive(Debug, Error)]
#[error("invalid persistence configuration: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_conns: u32,
    pub min_conns: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
    /// Forward every statement to the `sqlx` log target.
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            max_conns: 10,
            min_conns: None,
            acquire_timeout: Duration::from_secs(30),
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory SQLite database, used by tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        is_memory_dsn(&self.dsn)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistenceConfig {
    pub database: DatabaseConfig,
    pub limits: LimitCfg,
}

impl PersistenceConfig {
    /// Defaults, optionally overlaid by a YAML file, overlaid by environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a layer cannot be read or does not match the schema.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        Self::from_figment(&figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract from an already assembled figment.
    ///
    /// # Errors
    /// Returns `ConfigError` if the figment does not match the schema.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError(Box::new(e)))
    }
}

#[must_use]
pub fn is_memory_dsn(dsn: &str) -> bool {
    (dsn.starts_with("sqlite") && dsn.contains(":memory:")) || dsn.contains("mode=memory")
}

/// Redact credentials from DSN for logging.
#[must_use]
pub fn redact_credentials_in_dsn(dsn: &str) -> String {
    if !dsn.contains('@') {
        return dsn.to_owned();
    }
    match url::Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "***".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults_point_at_in_memory_sqlite() {
        let cfg = PersistenceConfig::default();
        assert!(cfg.database.is_memory());
        assert_eq!(cfg.limits.max, 1000);
    }

    #[test]
    fn yaml_then_env_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "persistence.yaml",
                r"
database:
  dsn: postgres://app:secret@db:5432/lms
  max_conns: 4
  acquire_timeout: 5s
limits:
  max: 200
",
            )?;
            jail.set_env("COURSEKIT__LIMITS__MAX", "50");

            let cfg = PersistenceConfig::load(Some(Path::new("persistence.yaml"))).unwrap();
            assert_eq!(cfg.database.dsn, "postgres://app:secret@db:5432/lms");
            assert_eq!(cfg.database.max_conns, 4);
            assert_eq!(cfg.database.acquire_timeout, Duration::from_secs(5));
            assert_eq!(cfg.limits.max, 50);
            assert!(!cfg.database.is_memory());
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "database": { "dsn": "sqlite::memory:", "pool": 3 }
        })));
        assert!(PersistenceConfig::from_figment(&figment).is_err());
    }

    #[test]
    fn credentials_are_redacted() {
        let redacted = redact_credentials_in_dsn("postgres://app:secret@db:5432/lms");
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("app"));
        assert_eq!(redact_credentials_in_dsn("sqlite::memory:"), "sqlite::memory:");
    }
}
