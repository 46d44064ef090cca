//! Generation limits configuration.
//!
//! Limits are layered: built-in defaults, then an optional TOML file, then
//! `EVENTSERIES_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CAMP_MAX_SCAN_DAYS, DEFAULT_HORIZON_WEEKS, MAX_OCCURRENCES, WEEKLY_ITERATION_FACTOR,
};
use crate::error::{SeriesError, SeriesResult};

static ENV_PREFIX: &str = "EVENTSERIES";

/// Safety caps applied during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLimits {
    pub camp_max_scan_days: u32,
    pub max_occurrences: u32,
    pub default_horizon_weeks: u32,
    pub weekly_iteration_factor: u32,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        GenerationLimits {
            camp_max_scan_days: CAMP_MAX_SCAN_DAYS,
            max_occurrences: MAX_OCCURRENCES,
            default_horizon_weeks: DEFAULT_HORIZON_WEEKS,
            weekly_iteration_factor: WEEKLY_ITERATION_FACTOR,
        }
    }
}

fn config_err(e: config::ConfigError) -> SeriesError {
    SeriesError::Config(e.to_string())
}

impl GenerationLimits {
    /// Default location: `<config_dir>/eventseries/config.toml`
    pub fn config_path() -> SeriesResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SeriesError::Config("Could not determine config directory".into()))?
            .join("eventseries");

        Ok(config_dir.join("config.toml"))
    }

    /// Load limits.
    ///
    /// An explicit `path` must exist. Without one, the default config path is
    /// read if present.
    pub fn load(path: Option<&Path>) -> SeriesResult<Self> {
        Self::load_layered(path, None)
    }

    /// `env` replaces the process environment as the variable source when set.
    fn load_layered(path: Option<&Path>, env: Option<Map<String, String>>) -> SeriesResult<Self> {
        let (file_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        let defaults = GenerationLimits::default();

        let settings = Config::builder()
            .set_default("camp_max_scan_days", i64::from(defaults.camp_max_scan_days))
            .map_err(config_err)?
            .set_default("max_occurrences", i64::from(defaults.max_occurrences))
            .map_err(config_err)?
            .set_default(
                "default_horizon_weeks",
                i64::from(defaults.default_horizon_weeks),
            )
            .map_err(config_err)?
            .set_default(
                "weekly_iteration_factor",
                i64::from(defaults.weekly_iteration_factor),
            )
            .map_err(config_err)?
            .add_source(
                File::from(file_path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        let limits: GenerationLimits = settings.try_deserialize().map_err(config_err)?;
        limits.validate()?;

        tracing::debug!(?limits, path = %file_path.display(), "Generation limits loaded");

        Ok(limits)
    }

    /// Every cap must be at least 1.
    pub fn validate(&self) -> SeriesResult<()> {
        let fields = [
            ("camp_max_scan_days", self.camp_max_scan_days),
            ("max_occurrences", self.max_occurrences),
            ("default_horizon_weeks", self.default_horizon_weeks),
            ("weekly_iteration_factor", self.weekly_iteration_factor),
        ];

        for (name, value) in fields {
            if value == 0 {
                return Err(SeriesError::Config(format!("{name} must be greater than 0")));
            }
        }

        Ok(())
    }

    /// Write a default config file with every option commented out.
    pub fn create_default_config(path: &Path) -> SeriesResult<()> {
        let contents = format!(
            "\
# eventseries configuration

# Calendar days scanned when expanding a camp range:
# camp_max_scan_days = {CAMP_MAX_SCAN_DAYS}

# Most sessions any recurrence may produce:
# max_occurrences = {MAX_OCCURRENCES}

# Horizon used for recurrences that never end:
# default_horizon_weeks = {DEFAULT_HORIZON_WEEKS}

# Weekly expansion visits at most factor x max_occurrences weeks:
# weekly_iteration_factor = {WEEKLY_ITERATION_FACTOR}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SeriesError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SeriesError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
