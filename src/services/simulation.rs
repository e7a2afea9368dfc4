use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::calendar::WeekCalendar;
use crate::domain::project::Portfolio;
use crate::domain::settings::{SimulationSettings, MAX_TIMELINE_WEEKS};
use crate::services::allocation::{AllocationEngine, AllocationTable};
use crate::services::hours_adjustment::adjust_portfolio;
use crate::services::inventory::{simulate_inventory, GroupInventory};
use crate::services::production_rate::build_monthly_series;
use crate::services::scenario_yaml::{load_scenario_from_yaml_file, Scenario, ScenarioYamlError};
use crate::services::settings_yaml::{load_settings_if_provided, SettingsYamlError};
use crate::services::simulation_types::{
    GroupSummary, MonthLabelRecord, ProjectResult, SimulationOutput, SimulationSummary,
};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] SettingsYamlError),
    #[error("failed to load scenario: {0}")]
    Scenario(#[from] ScenarioYamlError),
}

/// Loads settings and scenario, then runs the whole pipeline.
///
/// `weeks_override` replaces the scenario's timeline length when given.
pub fn simulate_from_yaml_file(
    scenario_path: &str,
    settings_path: Option<&str>,
    weeks_override: Option<u32>,
) -> Result<SimulationOutput, SimulationError> {
    let settings = load_settings_if_provided(settings_path)?;
    let mut scenario = load_scenario_from_yaml_file(scenario_path, &settings)?;
    if let Some(weeks) = weeks_override {
        scenario.timeline_weeks = weeks;
    }
    Ok(run_simulation(scenario, &settings))
}

/// Hours adjustment, capacity allocation, inventory simulation and timeline
/// labels for one scenario. Never fails for an already validated scenario.
pub fn run_simulation(scenario: Scenario, settings: &SimulationSettings) -> SimulationOutput {
    let Scenario {
        timeline_weeks,
        capacities,
        sales_speeds,
        rate_points,
        mut portfolio,
    } = scenario;
    if timeline_weeks > MAX_TIMELINE_WEEKS {
        warn!(timeline_weeks, max = MAX_TIMELINE_WEEKS, "timeline length clamped to maximum");
    }
    let timeline_weeks = timeline_weeks.min(MAX_TIMELINE_WEEKS);
    if portfolio.is_empty() {
        warn!("scenario has no projects; only capacity and labels are computed");
    }

    adjust_portfolio(&mut portfolio, settings);
    let engine = AllocationEngine::new(settings, &capacities);
    let allocations = engine.allocate(&mut portfolio, timeline_weeks);
    let groups = simulate_inventory(&mut portfolio, &sales_speeds, timeline_weeks, settings);

    let calendar = WeekCalendar::new(settings.epoch);
    let month_labels = calendar
        .month_labels(timeline_weeks)
        .into_iter()
        .map(|label| MonthLabelRecord {
            name: label.name(),
            month: label.month,
            year: label.year,
            start_week: label.start_week,
            week_count: label.week_count,
        })
        .collect();
    let quarters = calendar.quarter_ranges(timeline_weeks);
    let production_rates = if rate_points.is_empty() {
        Vec::new()
    } else {
        build_monthly_series(
            &rate_points,
            settings.epoch,
            calendar.week_to_date(timeline_weeks.max(1)),
        )
    };

    let average_quarter_capacity = if quarters.is_empty() {
        0.0
    } else {
        let total: f64 = quarters
            .iter()
            .map(|range| engine.capacity_for_week(range.start_week))
            .sum();
        (total / quarters.len() as f64).round()
    };

    let summary = summarize(&portfolio, &allocations, average_quarter_capacity);
    info!(
        projects = portfolio.len(),
        groups = groups.len(),
        timeline_weeks,
        "simulation finished"
    );

    SimulationOutput {
        epoch: settings.epoch,
        timeline_weeks,
        summary,
        projects: project_results(&portfolio, &allocations),
        weekly_hours: allocations.weekly_hours().to_vec(),
        weekly_capacity: allocations.weekly_capacity().to_vec(),
        group_inventory: map_groups(&groups, |group| group.inventory.clone()),
        group_sales: map_groups(&groups, |group| group.sales.clone()),
        groups: map_groups(&groups, |group| GroupSummary {
            monthly_sales_speed: group.monthly_sales_speed,
            peak_inventory: group.peak(),
            final_inventory: group.last(),
        }),
        month_labels,
        quarters,
        production_rates,
    }
}

fn project_results(portfolio: &Portfolio, allocations: &AllocationTable) -> Vec<ProjectResult> {
    portfolio
        .iter()
        .map(|(id, project)| ProjectResult {
            name: project.name.clone(),
            start_week: project.start_week,
            end_week: project.end_week_or_start(),
            muted: project.muted,
            original: project.original_hours,
            adjusted: project.adjusted_hours,
            rounded_adjusted: project.rounded_adjusted_hours,
            remaining_hours: project.remaining_hours,
            group: project.group.clone(),
            units: project.units.clone(),
            pre_sales_lead_months: project.pre_sales_lead_months,
            sales_contribution_start_week: project.sales_contribution_start_week,
            allocations: allocations.project(id).to_vec(),
        })
        .collect()
}

fn summarize(
    portfolio: &Portfolio,
    allocations: &AllocationTable,
    average_quarter_capacity: f64,
) -> SimulationSummary {
    let projects = portfolio.projects();
    SimulationSummary {
        total_original_hours: projects.iter().map(|p| p.original_hours).sum(),
        total_adjusted_hours: projects
            .iter()
            .filter(|p| !p.muted)
            .map(|p| p.rounded_adjusted_hours)
            .sum(),
        average_quarter_capacity,
        peak_weekly_hours: allocations.weekly_hours().iter().copied().fold(0.0, f64::max),
        last_end_week: projects
            .iter()
            .filter(|p| !p.muted)
            .map(|p| p.end_week_or_start())
            .max(),
    }
}

fn map_groups<T>(
    groups: &BTreeMap<String, GroupInventory>,
    f: impl Fn(&GroupInventory) -> T,
) -> BTreeMap<String, T> {
    groups
        .iter()
        .map(|(name, group)| (name.clone(), f(group)))
        .collect()
}
