//! Process-level plumbing shared by binaries: environment-driven
//! configuration, tracing bootstrap and the PostgreSQL pool constructor.

pub mod config;
pub mod db;
pub mod logging;

pub use config::{AppConfig, CliArgs, PostgresConfig, RepoKind};
