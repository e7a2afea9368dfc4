use chrono::NaiveDate;

use crate::domain::calendar::WeekCalendar;
use crate::domain::capacity::CapacityTable;
use crate::domain::project::Project;
use crate::domain::settings::default_epoch;

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// The same weekly capacity for every quarter touched by the first `weeks` weeks.
pub fn flat_capacity(weekly_hours: i64, weeks: u32) -> CapacityTable {
    let calendar = WeekCalendar::new(default_epoch());
    let mut table = CapacityTable::new();
    for range in calendar.quarter_ranges(weeks.max(1)) {
        table.insert(range.key().as_str(), weekly_hours);
    }
    table
}

// Baseline complexity, so adjusted hours equal the given hours.
pub fn project_with_hours(name: &str, start_week: u32, hours: f64) -> Project {
    Project::new(name, start_week, hours, 4.5)
}

pub fn grouped_project(name: &str, start_week: u32, group: &str, units: &str, lead_months: u32) -> Project {
    let mut project = project_with_hours(name, start_week, 100.0);
    project.group = Some(group.to_string());
    project.units = Some(units.to_string());
    project.pre_sales_lead_months = lead_months;
    project
}
