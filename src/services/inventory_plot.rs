use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation::{simulate_from_yaml_file, SimulationError};
use crate::services::simulation_types::SimulationOutput;

#[derive(Error, Debug)]
pub enum InventoryPlotError {
    #[error("failed to simulate scenario: {0}")]
    Simulation(#[from] SimulationError),
    #[error("scenario has no inventory groups")]
    NoGroups,
    #[error("timeline is empty")]
    EmptyTimeline,
    #[error("failed to render inventory plot: {0}")]
    Plot(String),
}

pub fn plot_inventory_from_yaml_file(
    scenario_path: &str,
    settings_path: Option<&str>,
    output_path: &str,
) -> Result<(), InventoryPlotError> {
    let simulation = simulate_from_yaml_file(scenario_path, settings_path, None)?;
    write_inventory_png(output_path, &simulation)
}

/// Draws one line per group showing its stock over the timeline.
pub fn write_inventory_png(
    output_path: &str,
    simulation: &SimulationOutput,
) -> Result<(), InventoryPlotError> {
    if simulation.group_inventory.is_empty() {
        return Err(InventoryPlotError::NoGroups);
    }
    if simulation.timeline_weeks == 0 {
        return Err(InventoryPlotError::EmptyTimeline);
    }

    let max_inventory = simulation
        .group_inventory
        .values()
        .flat_map(|values| values.iter().copied())
        .fold(0.0_f64, f64::max);
    let max_y = (max_inventory * 1.1).max(1.0);
    let max_x = simulation.timeline_weeks as i32;

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| InventoryPlotError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Inventory Over Time", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(1..max_x.max(2), 0.0..max_y)
        .map_err(|e| InventoryPlotError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Week")
        .y_desc("Inventory (units)")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .draw()
        .map_err(|e| InventoryPlotError::Plot(e.to_string()))?;

    let group_count = simulation.group_inventory.len();
    for (idx, (group, values)) in simulation.group_inventory.iter().enumerate() {
        let color = HSLColor(idx as f64 / group_count as f64, 0.7, 0.5);
        chart
            .draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(week, value)| (week as i32 + 1, *value)),
                color.stroke_width(2),
            ))
            .map_err(|e| InventoryPlotError::Plot(e.to_string()))?
            .label(group.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 18))
        .draw()
        .map_err(|e| InventoryPlotError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| InventoryPlotError::Plot(e.to_string()))?;
    Ok(())
}
