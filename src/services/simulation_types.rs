use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::calendar::QuarterRange;
use crate::services::production_rate::RatePoint;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectResult {
    pub name: String,
    pub start_week: u32,
    pub end_week: u32,
    pub muted: bool,
    pub original: f64,
    pub adjusted: f64,
    pub rounded_adjusted: f64,
    pub remaining_hours: f64,
    pub group: Option<String>,
    pub units: Option<String>,
    pub pre_sales_lead_months: u32,
    pub sales_contribution_start_week: Option<u32>,
    /// `timeline_weeks + 1` slots, slot 0 unused.
    pub allocations: Vec<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthLabelRecord {
    pub month: u32,
    pub year: i32,
    pub start_week: u32,
    pub week_count: u32,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub total_original_hours: f64,
    pub total_adjusted_hours: f64,
    pub average_quarter_capacity: f64,
    pub peak_weekly_hours: f64,
    pub last_end_week: Option<u32>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub monthly_sales_speed: f64,
    pub peak_inventory: f64,
    pub final_inventory: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    pub epoch: NaiveDate,
    pub timeline_weeks: u32,
    pub summary: SimulationSummary,
    pub projects: Vec<ProjectResult>,
    pub weekly_hours: Vec<f64>,
    pub weekly_capacity: Vec<f64>,
    /// Stock per week, index 0 being week 1.
    pub group_inventory: BTreeMap<String, Vec<f64>>,
    pub group_sales: BTreeMap<String, Vec<f64>>,
    pub groups: BTreeMap<String, GroupSummary>,
    pub month_labels: Vec<MonthLabelRecord>,
    pub quarters: Vec<QuarterRange>,
    /// One entry per calendar month of the timeline, empty without rate points.
    pub production_rates: Vec<RatePoint>,
}
