use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::settings::SimulationSettings;

#[derive(Error, Debug)]
pub enum SettingsYamlError {
    #[error("failed to read settings file {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid epoch in {path}: {value} (expected YYYY-MM-DD)")]
    InvalidEpoch { path: PathBuf, value: String },
    #[error("invalid value for {field} in {path}: {value}")]
    InvalidValue {
        path: PathBuf,
        field: &'static str,
        value: f64,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsRecord {
    epoch: Option<String>,
    complexity_base: Option<f64>,
    default_complexity: Option<f64>,
    weeks_per_month: Option<f64>,
    engine_default_capacity: Option<u32>,
    input_default_capacity: Option<u32>,
    default_sales_speed: Option<f64>,
}

/// Settings from `path` when given, the built-in defaults otherwise.
pub fn load_settings_if_provided(path: Option<&str>) -> Result<SimulationSettings, SettingsYamlError> {
    match path {
        Some(path) => load_settings_from_yaml_file(path),
        None => Ok(SimulationSettings::default()),
    }
}

/// Loads a settings file. Keys left out keep their default value.
///
/// # Errors
/// - I/O or YAML syntax failures, and unknown keys.
/// - An epoch that is not a `YYYY-MM-DD` date.
/// - A non-positive complexity base, default complexity or weeks-per-month,
///   or a negative default sales speed.
pub fn load_settings_from_yaml_file<P: AsRef<Path>>(path: P) -> Result<SimulationSettings, SettingsYamlError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsYamlError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = deserialize_settings_from_yaml_str(&contents, path)?;
    info!(path = %path.display(), epoch = %settings.epoch, "loaded simulation settings");
    Ok(settings)
}

pub fn deserialize_settings_from_yaml_str(
    input: &str,
    origin_path: &Path,
) -> Result<SimulationSettings, SettingsYamlError> {
    let record: Option<SettingsRecord> =
        serde_yaml::from_str(input).map_err(|source| SettingsYamlError::Parse {
            path: origin_path.to_path_buf(),
            source,
        })?;
    let record = record.unwrap_or_default();

    let mut settings = SimulationSettings::default();
    if let Some(value) = record.epoch {
        settings.epoch = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            SettingsYamlError::InvalidEpoch {
                path: origin_path.to_path_buf(),
                value,
            }
        })?;
    }
    if let Some(value) = record.complexity_base {
        settings.complexity_base = positive(value, "complexity_base", origin_path)?;
    }
    if let Some(value) = record.default_complexity {
        settings.default_complexity = positive(value, "default_complexity", origin_path)?;
    }
    if let Some(value) = record.weeks_per_month {
        settings.weeks_per_month = positive(value, "weeks_per_month", origin_path)?;
    }
    if let Some(value) = record.engine_default_capacity {
        settings.engine_default_capacity = value;
    }
    if let Some(value) = record.input_default_capacity {
        settings.input_default_capacity = value;
    }
    if let Some(value) = record.default_sales_speed {
        if !value.is_finite() || value < 0.0 {
            return Err(SettingsYamlError::InvalidValue {
                path: origin_path.to_path_buf(),
                field: "default_sales_speed",
                value,
            });
        }
        settings.default_sales_speed = value;
    }
    Ok(settings)
}

fn positive(value: f64, field: &'static str, origin_path: &Path) -> Result<f64, SettingsYamlError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SettingsYamlError::InvalidValue {
            path: origin_path.to_path_buf(),
            field,
            value,
        })
    }
}
