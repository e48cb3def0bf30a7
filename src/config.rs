//! Runtime configuration.
//!
//! Values are layered with figment, lowest precedence first:
//! compiled defaults, an optional `config.toml` in the working directory,
//! then `CRM_`-prefixed environment variables (`CRM_DATABASE__URL`, ...).

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::CrmError;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "CRM_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL; the file is created when missing.
    pub url: String,
    pub max_connections: u32,
    /// Enforce a unique index on `customers.email`.
    pub unique_email: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:crm.db".to_string(),
            max_connections: 5,
            unique_email: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, CrmError> {
        let cfg: Config = Self::figment()
            .extract()
            .map_err(|e| CrmError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), CrmError> {
        if self.database.max_connections == 0 {
            return Err(CrmError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        let page = &self.pagination;
        if page.default_limit == 0 || page.max_limit == 0 {
            return Err(CrmError::Config(
                "pagination limits must be at least 1".to_string(),
            ));
        }
        if page.default_limit > page.max_limit {
            return Err(CrmError::Config(format!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                page.default_limit, page.max_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
            assert_eq!(cfg.database.url, "sqlite:crm.db");
            assert!(cfg.database.unique_email);
            assert_eq!(cfg.pagination.default_limit, 10);
            assert_eq!(cfg.pagination.max_limit, 100);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [database]
                url = "sqlite:from-file.db"
                unique_email = false

                [pagination]
                max_limit = 50
                "#,
            )?;
            jail.set_env("CRM_DATABASE__URL", "sqlite:from-env.db");

            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.database.url, "sqlite:from-env.db");
            assert!(!cfg.database.unique_email);
            assert_eq!(cfg.pagination.max_limit, 50);
            assert_eq!(cfg.pagination.default_limit, 10);
            Ok(())
        });
    }

    #[test]
    fn rejects_default_limit_above_max() {
        Jail::expect_with(|jail| {
            jail.set_env("CRM_PAGINATION__DEFAULT_LIMIT", "200");
            assert!(matches!(Config::load(), Err(CrmError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn rejects_empty_pool() {
        let mut cfg = Config::default();
        cfg.database.max_connections = 0;
        assert!(cfg.validate().is_err());
    }
}
