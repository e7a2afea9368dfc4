use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::project::Portfolio;
use crate::domain::settings::SimulationSettings;

/// Monthly sales speed per group, in units per month.
pub type GroupSalesSpeeds = BTreeMap<String, f64>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GroupInventory {
    pub monthly_sales_speed: f64,
    /// Stock at the end of each week; index 0 is week 1.
    pub inventory: Vec<f64>,
    pub sales: Vec<f64>,
}

impl GroupInventory {
    pub fn peak(&self) -> f64 {
        self.inventory.iter().copied().fold(0.0, f64::max)
    }

    pub fn last(&self) -> f64 {
        self.inventory.last().copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
struct StockEvent {
    sales_start_week: u32,
    units: u64,
}

/// Week from which a project's units count as sellable: its start week
/// pulled forward by the pre-sales lead time, never before week 1.
pub fn sales_contribution_start_week(start_week: u32, lead_months: u32, weeks_per_month: f64) -> u32 {
    let lead_weeks = (f64::from(lead_months) * weeks_per_month).round_ties_even() as i64;
    (i64::from(start_week) - lead_weeks).max(1) as u32
}

/// Sales speed actually used for `group`: missing or non-finite values fall
/// back to the default, negative values clamp to zero.
pub fn resolve_sales_speed(speeds: &GroupSalesSpeeds, group: &str, default: f64) -> f64 {
    match speeds.get(group) {
        Some(speed) if !speed.is_finite() => {
            warn!(group, "invalid sales speed replaced by default");
            default
        }
        Some(speed) if *speed < 0.0 => {
            warn!(group, speed, "negative sales speed clamped to zero");
            0.0
        }
        Some(speed) => *speed,
        None => default,
    }
}

/// Stamps `sales_contribution_start_week` on every inventory participant and
/// simulates stock per group over `timeline_weeks`.
pub fn simulate_inventory(
    portfolio: &mut Portfolio,
    sales_speeds: &GroupSalesSpeeds,
    timeline_weeks: u32,
    settings: &SimulationSettings,
) -> BTreeMap<String, GroupInventory> {
    let mut events_by_group: BTreeMap<String, Vec<StockEvent>> = BTreeMap::new();

    for (_, project) in portfolio.iter_mut() {
        let (Some(group), Some(units)) = (project.group.clone(), project.stock_units) else {
            continue;
        };
        let sales_start_week = sales_contribution_start_week(
            project.start_week,
            project.pre_sales_lead_months,
            settings.weeks_per_month,
        );
        project.sales_contribution_start_week = Some(sales_start_week);
        events_by_group.entry(group).or_default().push(StockEvent {
            sales_start_week,
            units,
        });
    }

    let groups: BTreeMap<String, GroupInventory> = events_by_group
        .into_iter()
        .map(|(group, events)| {
            let speed = resolve_sales_speed(sales_speeds, &group, settings.default_sales_speed);
            let inventory = simulate_group(&events, speed, timeline_weeks, settings.weeks_per_month);
            debug!(group = %group, speed, peak = inventory.peak(), "simulated group inventory");
            (group, inventory)
        })
        .collect();

    info!(groups = groups.len(), timeline_weeks, "inventory simulation finished");
    groups
}

fn simulate_group(
    events: &[StockEvent],
    monthly_sales_speed: f64,
    timeline_weeks: u32,
    weeks_per_month: f64,
) -> GroupInventory {
    let weeks = timeline_weeks as usize;
    let weekly_speed = if weeks_per_month > 0.0 {
        monthly_sales_speed / weeks_per_month
    } else {
        0.0
    };

    let mut inventory = Vec::with_capacity(weeks);
    let mut sales = Vec::with_capacity(weeks);
    let mut stock = 0.0_f64;

    for week in 1..=timeline_weeks {
        let produced: f64 = events
            .iter()
            .filter(|event| event.sales_start_week == week)
            .map(|event| event.units as f64)
            .sum();
        let selling = events.iter().any(|event| event.sales_start_week <= week);
        let demand = if selling { weekly_speed } else { 0.0 };

        let available = stock + produced;
        let sold = if demand > 0.0 {
            demand.min(available.max(0.0))
        } else {
            0.0
        };
        stock = (stock + produced - sold).max(0.0);

        inventory.push(stock);
        sales.push(sold);
    }

    GroupInventory {
        monthly_sales_speed,
        inventory,
        sales,
    }
}
