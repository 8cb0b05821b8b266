//! Handles settings for the application. Configuration is read from
//! `settings.toml` (optional) and `APP__*` environment variables, e.g.
//! `APP__SERVER__PORT=8080`.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! port = 3000
//! store_timeout_ms = 5000
//! database = { sqlite = "spendlog.db" }
//! ```
use std::time::Duration;

use config::{Config, ConfigError, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub store_timeout_ms: Option<u64>,
}

impl Server {
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(engine::DEFAULT_STORE_TIMEOUT)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("APP").separator("__")),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn server_section_is_optional() {
        let settings = parse("[app]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(settings.app.level, "debug");
        assert!(settings.server.is_none());
    }

    #[test]
    fn level_defaults_to_info() {
        let settings = parse("").unwrap();
        assert_eq!(settings.app.level, "info");
    }

    #[test]
    fn sqlite_server_with_timeout() {
        let settings = parse(
            r#"
            [server]
            port = 8080
            store_timeout_ms = 250
            database = { sqlite = "data.db" }
            "#,
        )
        .unwrap();
        let server = settings.server.unwrap();
        assert_eq!(server.port, 8080);
        assert_eq!(server.store_timeout(), Duration::from_millis(250));
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "data.db"));
    }

    #[test]
    fn memory_database_uses_default_timeout() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        )
        .unwrap();
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Memory));
        assert_eq!(server.store_timeout(), engine::DEFAULT_STORE_TIMEOUT);
    }
}
