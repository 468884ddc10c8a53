use anyhow::Result;
use chrono::TimeDelta;
use config::Config;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Strategy for pairing expanded windows against existing occurrence records.
///
/// Anything other than `index`/`datetime` in the configuration lands on
/// `Unknown`, which matches nothing and therefore always creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    Index,
    #[default]
    Datetime,
    #[serde(other)]
    Unknown,
}

impl UpdateMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Datetime => "datetime",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Wall-clock horizon for materialization, in days from "now".
    pub max_build_period_days: i64,
    /// Row-count horizon for materialization. Zero or negative disables it.
    pub max_build_count: i64,
    pub update_mode: UpdateMode,
}

impl EngineConfig {
    /// ## Summary
    /// Returns the wall-clock horizon as a `TimeDelta`.
    #[must_use]
    pub fn max_build_period(&self) -> TimeDelta {
        TimeDelta::days(self.max_build_period_days)
    }

    /// ## Summary
    /// Rejects configurations the engine cannot run under. A non-positive
    /// build period would make every horizon empty; the count bound may be
    /// zero or negative (that disables it).
    ///
    /// ## Errors
    /// `InvalidConfiguration` with the offending value.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_build_period_days <= 0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "max_build_period_days must be positive, got {}",
                self.max_build_period_days
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_build_period_days: 365,
            max_build_count: 100,
            update_mode: UpdateMode::default(),
        }
    }
}

/// Logging settings for the embedding application.
///
/// The engine crates emit `tracing` events but never install a subscriber;
/// the embedder reads `level` when initializing its own.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive for the embedder's `tracing` subscriber, e.g.
    /// `"debug"` or `"cadence_engine=trace"`.
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("engine.max_build_period_days", 365)?
            .set_default("engine.max_build_count", 100)?
            .set_default("engine.update_mode", "datetime")?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.engine.validate()?;
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
