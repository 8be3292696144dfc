//! # configs
//!
//! Layered runtime settings for rusty-forum. Sources, lowest precedence
//! first:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. `config/default.toml` (optional)
//! 3. `config/local.toml` (optional, not committed)
//! 4. `FORUM__`-prefixed environment variables, `__` between sections
//!    (`FORUM__SERVER__BIND=0.0.0.0:4567`), after `.env` has been loaded.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "FORUM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub forum: ForumSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:4567".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForumSettings {
    /// Store the poster's address on each post.
    pub track_ip_per_post: bool,
    pub categories_per_page: usize,
    pub sub_categories_per_page: usize,
    /// Upper bound on category nodes visited when masking teasers.
    pub mask_node_budget: usize,
    /// Seed a demo category tree and accounts on startup.
    pub seed_demo_data: bool,
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            track_ip_per_post: false,
            categories_per_page: 50,
            sub_categories_per_page: 10,
            mask_node_budget: 1000,
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads `.env`, then every layer rooted at `./config`.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => debug!("no .env file"),
            Err(err) => return Err(ConfigError::Invalid(".env", err.to_string())),
        }
        Self::load_from(Path::new("config"), ENV_PREFIX)
    }

    /// Loads the file layers from `dir` and environment variables under `prefix`.
    pub fn load_from(dir: &Path, prefix: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join("local")).required(false))
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind", "must not be empty".into()));
        }
        if self.forum.categories_per_page == 0 {
            return Err(ConfigError::Invalid(
                "forum.categories_per_page",
                "must be at least 1".into(),
            ));
        }
        if self.forum.mask_node_budget == 0 {
            return Err(ConfigError::Invalid(
                "forum.mask_node_budget",
                "must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
