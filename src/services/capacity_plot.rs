use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation::{simulate_from_yaml_file, SimulationError};
use crate::services::simulation_types::SimulationOutput;

#[derive(Error, Debug)]
pub enum CapacityPlotError {
    #[error("failed to simulate scenario: {0}")]
    Simulation(#[from] SimulationError),
    #[error("timeline is empty")]
    EmptyTimeline,
    #[error("failed to render capacity plot: {0}")]
    Plot(String),
}

pub fn plot_capacity_from_yaml_file(
    scenario_path: &str,
    settings_path: Option<&str>,
    output_path: &str,
) -> Result<(), CapacityPlotError> {
    let simulation = simulate_from_yaml_file(scenario_path, settings_path, None)?;
    write_capacity_png(output_path, &simulation)
}

/// Allocated hours per week as bars under the resolved capacity line.
pub fn write_capacity_png(
    output_path: &str,
    simulation: &SimulationOutput,
) -> Result<(), CapacityPlotError> {
    if simulation.timeline_weeks == 0 {
        return Err(CapacityPlotError::EmptyTimeline);
    }

    let weeks = simulation.timeline_weeks as i32;
    let max_hours = simulation
        .weekly_capacity
        .iter()
        .chain(simulation.weekly_hours.iter())
        .copied()
        .fold(0.0_f64, f64::max);
    let max_y = (max_hours + 100.0).max(1.0);

    let root = BitMapBackend::new(output_path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| CapacityPlotError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Weekly Capacity", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(1..weeks + 1, 0.0..max_y)
        .map_err(|e| CapacityPlotError::Plot(e.to_string()))?;

    let label_count = simulation.month_labels.len().clamp(1, 24);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Week")
        .y_desc("Hours")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_labels(label_count)
        .x_label_formatter(&|week| {
            simulation
                .month_labels
                .iter()
                .find(|label| label.start_week as i32 == *week)
                .map(|label| label.name.clone())
                .unwrap_or_else(|| week.to_string())
        })
        .draw()
        .map_err(|e| CapacityPlotError::Plot(e.to_string()))?;

    let bar_color = RGBColor(30, 122, 204);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series((1..=weeks).map(|week| {
            let hours = simulation
                .weekly_hours
                .get(week as usize)
                .copied()
                .unwrap_or(0.0);
            Rectangle::new([(week, 0.0), (week + 1, hours)], bar_style)
        }))
        .map_err(|e| CapacityPlotError::Plot(e.to_string()))?;

    let line_color = RGBColor(75, 192, 192);
    chart
        .draw_series(LineSeries::new(
            (1..=weeks).map(|week| {
                let capacity = simulation
                    .weekly_capacity
                    .get(week as usize)
                    .copied()
                    .unwrap_or(0.0);
                (week, capacity)
            }),
            line_color.stroke_width(3),
        ))
        .map_err(|e| CapacityPlotError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| CapacityPlotError::Plot(e.to_string()))?;
    Ok(())
}
