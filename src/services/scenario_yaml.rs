use std::collections::BTreeMap;
use std::io;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::capacity::CapacityTable;
use crate::domain::project::{Portfolio, PortfolioError, Project};
use crate::domain::settings::{SimulationSettings, MAX_TIMELINE_WEEKS};
use crate::services::inventory::GroupSalesSpeeds;
use crate::services::production_rate::RatePoint;

#[derive(Error, Debug)]
pub enum ScenarioYamlError {
    #[error("failed to read scenario file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse scenario yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid project list: {0}")]
    Portfolio(#[from] PortfolioError),
}

/// Input of one simulation run after every numeric field was repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub timeline_weeks: u32,
    pub capacities: CapacityTable,
    pub sales_speeds: GroupSalesSpeeds,
    pub rate_points: Vec<RatePoint>,
    pub portfolio: Portfolio,
}

#[derive(Deserialize)]
struct ScenarioRecord {
    #[serde(default, alias = "timelineWeeks")]
    timeline_weeks: Option<Value>,
    #[serde(default, alias = "quarterlyCapacities")]
    quarterly_capacities: Option<BTreeMap<String, Value>>,
    #[serde(default, alias = "groupSalesSpeeds")]
    group_sales_speeds: Option<BTreeMap<String, Value>>,
    #[serde(default, alias = "preSalesLeadTimes")]
    pre_sales_lead_times: Option<BTreeMap<String, Value>>,
    #[serde(default, alias = "productionRatePoints")]
    production_rate_points: Option<Vec<RatePointRecord>>,
    #[serde(default)]
    projects: Option<Vec<ProjectRecord>>,
}

#[derive(Deserialize)]
struct RatePointRecord {
    #[serde(alias = "date")]
    month: String,
    rate: Value,
    #[serde(default = "active_by_default", alias = "isActive")]
    active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Deserialize)]
struct ProjectRecord {
    name: String,
    start_week: u32,
    #[serde(default)]
    muted: bool,
    original_hours: Option<f64>,
    complexity: Option<f64>,
    group: Option<String>,
    units: Option<Value>,
    pre_sales_lead_months: Option<Value>,
}

pub fn load_scenario_from_yaml_file(
    path: &str,
    settings: &SimulationSettings,
) -> Result<Scenario, ScenarioYamlError> {
    let contents = std::fs::read_to_string(path)?;
    let scenario = deserialize_scenario_from_yaml_str(&contents, settings)?;
    info!(
        path,
        projects = scenario.portfolio.len(),
        timeline_weeks = scenario.timeline_weeks,
        "loaded scenario"
    );
    Ok(scenario)
}

/// Parses a scenario; JSON exports of the same shape are accepted too.
pub fn deserialize_scenario_from_yaml_str(
    input: &str,
    settings: &SimulationSettings,
) -> Result<Scenario, ScenarioYamlError> {
    let record: ScenarioRecord = serde_yaml::from_str(input)?;

    let timeline_weeks = record
        .timeline_weeks
        .as_ref()
        .map(coerce_timeline_weeks)
        .unwrap_or(0);

    let mut capacities = CapacityTable::new();
    for (key, value) in record.quarterly_capacities.unwrap_or_default() {
        capacities.insert(&key, coerce_capacity(&key, &value, settings.input_default_capacity));
    }

    let sales_speeds: GroupSalesSpeeds = record
        .group_sales_speeds
        .unwrap_or_default()
        .into_iter()
        .map(|(group, value)| {
            let speed = coerce_sales_speed(&group, &value, settings.default_sales_speed);
            (group, speed)
        })
        .collect();

    let rate_points = record
        .production_rate_points
        .unwrap_or_default()
        .into_iter()
        .filter_map(rate_point_from_record)
        .collect();

    let lead_times = record.pre_sales_lead_times.unwrap_or_default();
    let projects = record
        .projects
        .unwrap_or_default()
        .into_iter()
        .map(|project| project_from_record(project, &lead_times, settings))
        .collect();

    Ok(Scenario {
        timeline_weeks,
        capacities,
        sales_speeds,
        rate_points,
        portfolio: Portfolio::new(projects)?,
    })
}

fn project_from_record(
    record: ProjectRecord,
    lead_times: &BTreeMap<String, Value>,
    settings: &SimulationSettings,
) -> Project {
    let lead_months = record
        .pre_sales_lead_months
        .as_ref()
        .or_else(|| lead_times.get(&record.name))
        .map(coerce_lead_months)
        .unwrap_or(0);

    let mut project = Project::new(
        &record.name,
        record.start_week,
        record.original_hours.unwrap_or(0.0),
        record.complexity.unwrap_or(settings.default_complexity),
    );
    project.muted = record.muted;
    project.group = record.group;
    project.units = record.units.as_ref().and_then(units_text);
    project.pre_sales_lead_months = lead_months;
    project
}

// Points with an unreadable month or rate are dropped.
fn rate_point_from_record(record: RatePointRecord) -> Option<RatePoint> {
    let Some(month) = parse_month(&record.month) else {
        warn!(month = %record.month, "production rate point with invalid month skipped");
        return None;
    };
    let Some(rate) = float_value(&record.rate) else {
        warn!(%month, rate = ?record.rate, "production rate point with invalid rate skipped");
        return None;
    };
    Some(RatePoint {
        month,
        rate,
        active: record.active,
    })
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM` and timestamps starting with a date.
fn parse_month(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    text.get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok())
}

/// Integer view of a scalar: integers as-is, floats truncated, strings
/// parsed as integers. Anything else has no integer value.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn float_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub fn coerce_timeline_weeks(value: &Value) -> u32 {
    match integer_value(value) {
        Some(weeks) if weeks > i64::from(MAX_TIMELINE_WEEKS) => {
            warn!(weeks, max = MAX_TIMELINE_WEEKS, "timeline length clamped to maximum");
            MAX_TIMELINE_WEEKS
        }
        Some(weeks) => weeks.max(0) as u32,
        None => {
            warn!(?value, "invalid timeline length replaced by 0");
            0
        }
    }
}

pub fn coerce_capacity(key: &str, value: &Value, default: u32) -> i64 {
    match integer_value(value) {
        Some(capacity) => capacity.max(0),
        None => {
            warn!(quarter = key, ?value, default, "invalid capacity replaced by default");
            i64::from(default)
        }
    }
}

pub fn coerce_sales_speed(group: &str, value: &Value, default: f64) -> f64 {
    match float_value(value) {
        Some(speed) => speed.max(0.0),
        None => {
            warn!(group, ?value, default, "invalid sales speed replaced by default");
            default
        }
    }
}

pub fn coerce_lead_months(value: &Value) -> u32 {
    integer_value(value)
        .map(|months| months.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

fn units_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
