use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use strum::{Display, EnumString};

use crate::domain::search::{FuzzyStrategy, PopularityFormula, SearchConfig, StrsimMatcher};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    /// Origins allowed by CORS; empty allows none
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_connections: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub acquire_timeout_secs: u64,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_page_size: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_page_size: u32,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub suggestion_limit: usize,
    pub fuzzy_strategy: FuzzyStrategy,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub fuzzy_threshold: f64,
    pub popularity: PopularityFormula,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }

    /// Pool options; connections are opened lazily on first use.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

impl SearchSettings {
    pub fn service_config(&self) -> SearchConfig {
        SearchConfig {
            default_page_size: self.default_page_size.min(self.max_page_size),
            max_page_size: self.max_page_size,
            suggestion_limit: self.suggestion_limit,
            popularity: self.popularity,
        }
    }

    pub fn matcher(&self) -> StrsimMatcher {
        StrsimMatcher::new(self.fuzzy_strategy, self.fuzzy_threshold)
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("no current directory: {e}")))?;
    let config_directory = base_path.join("config");

    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
    let environment = Environment::from_str(&environment).map_err(|_| {
        config::ConfigError::Message(format!("unknown APP_ENVIRONMENT '{environment}'"))
    })?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("SEARCH")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString, PartialEq, Eq)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
