//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and overridden by `GIFTSHARE__*` environment
//! variables (e.g. `GIFTSHARE__SERVER__PORT=8080`).
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub session_ttl_hours: Option<i64>,
    /// Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Server {
    /// The configured session lifetime, if any. It must be a positive number
    /// of hours that fits a `chrono::Duration`.
    pub fn session_ttl(&self) -> Result<Option<chrono::Duration>, ConfigError> {
        let Some(hours) = self.session_ttl_hours else {
            return Ok(None);
        };
        if hours <= 0 {
            return Err(ConfigError::Message(format!(
                "server.session_ttl_hours must be positive, got {hours}"
            )));
        }
        chrono::Duration::try_hours(hours).map(Some).ok_or_else(|| {
            ConfigError::Message(format!("server.session_ttl_hours is too large: {hours}"))
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_file(File::with_name("settings").required(false))
    }

    fn with_file<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("GIFTSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        if let Some(server) = &settings.server {
            server.session_ttl()?;
        }
        Ok(settings)
    }
}
