use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    Memory,
    Postgres,
}

impl RepoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoKind::Memory => "memory",
            RepoKind::Postgres => "postgres",
        }
    }
}

/// Service configuration, sourced from the process environment.
///
/// `REPOSITORY` is the only required variable; the postgres credentials
/// become required once that backend is selected (checked by
/// [`AppConfig::postgres`]).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub server_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub repository: RepoKind,
    #[serde(default)]
    pub postgres_user: Option<String>,
    #[serde(default)]
    pub postgres_password: Option<String>,
    #[serde(default)]
    pub postgres_db: Option<String>,
    #[serde(default = "default_pg_host")]
    pub postgres_host: String,
    #[serde(default = "default_pg_port")]
    pub postgres_port: u16,
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pg_host() -> String {
    "localhost".to_string()
}

fn default_pg_port() -> u16 {
    5432
}

/// Connection parameters for the relational backend, with every
/// required credential present.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub user: String,
    pub password: String,
    pub db: String,
    pub host: String,
    pub port: u16,
}

/// Command line overrides applied on top of the environment.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub verbose: u8,
}

const ENV_KEYS: &[&str] = &[
    "SERVER_PORT",
    "LOG_LEVEL",
    "REPOSITORY",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
    "POSTGRES_DB",
    "POSTGRES_HOST",
    "POSTGRES_PORT",
];

impl AppConfig {
    /// Load configuration from the environment. A missing or invalid
    /// `REPOSITORY` value is a startup-fatal error.
    pub fn from_env() -> Result<Self> {
        use figment::{providers::Env, Figment};

        Figment::new()
            .merge(Env::raw().only(ENV_KEYS))
            .extract()
            .context("failed to load configuration from environment")
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server_port = port;
        }
        match args.verbose {
            0 => {}
            1 => self.log_level = "debug".to_string(),
            _ => self.log_level = "trace".to_string(),
        }
    }

    /// Assemble the relational connection parameters, failing on any
    /// missing required credential.
    pub fn postgres(&self) -> Result<PostgresConfig> {
        let user = self
            .postgres_user
            .clone()
            .context("env var POSTGRES_USER not set")?;
        let password = self
            .postgres_password
            .clone()
            .context("env var POSTGRES_PASSWORD not set")?;
        let db = self
            .postgres_db
            .clone()
            .context("env var POSTGRES_DB not set")?;

        Ok(PostgresConfig {
            user,
            password,
            db,
            host: self.postgres_host.clone(),
            port: self.postgres_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_environment_with_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPOSITORY", "memory");
            jail.set_env("SERVER_PORT", "9100");

            let cfg = AppConfig::from_env().expect("config should load");
            assert_eq!(cfg.repository, RepoKind::Memory);
            assert_eq!(cfg.server_port, 9100);
            assert_eq!(cfg.log_level, "info");
            assert_eq!(cfg.postgres_host, "localhost");
            assert_eq!(cfg.postgres_port, 5432);
            Ok(())
        });
    }

    #[test]
    fn missing_repository_is_fatal() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SERVER_PORT", "9100");
            assert!(AppConfig::from_env().is_err());
            Ok(())
        });
    }

    #[test]
    fn unknown_repository_value_is_fatal() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPOSITORY", "cassandra");
            assert!(AppConfig::from_env().is_err());
            Ok(())
        });
    }

    #[test]
    fn postgres_credentials_are_required_together() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPOSITORY", "postgres");
            jail.set_env("POSTGRES_USER", "svc");
            jail.set_env("POSTGRES_PASSWORD", "secret");

            let cfg = AppConfig::from_env().expect("config should load");
            let err = cfg.postgres().expect_err("db name is missing");
            assert!(err.to_string().contains("POSTGRES_DB"));
            Ok(())
        });
    }

    #[test]
    fn cli_overrides_take_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPOSITORY", "memory");

            let mut cfg = AppConfig::from_env().expect("config should load");
            cfg.apply_cli_overrides(&CliArgs {
                port: Some(8087),
                verbose: 2,
            });
            assert_eq!(cfg.server_port, 8087);
            assert_eq!(cfg.log_level, "trace");
            Ok(())
        });
    }
}
