use crate::services::simulation_types::SimulationOutput;

pub fn format_simulation_report(output: &SimulationOutput) -> String {
    let summary = &output.summary;
    let last_end_week = match summary.last_end_week {
        Some(week) => week.to_string(),
        None => "n/a".to_string(),
    };

    let mut lines = Vec::new();
    lines.push("Capacity Plan Report".to_string());
    lines.push(format!("Epoch: {}", output.epoch));
    lines.push(format!("Timeline weeks: {}", output.timeline_weeks));
    lines.push(format!("Total hours: {:.0}", summary.total_original_hours));
    lines.push(format!("Adjusted hours: {:.0}", summary.total_adjusted_hours));
    lines.push(format!("Average capacity: {:.0}", summary.average_quarter_capacity));
    lines.push(format!("Peak weekly hours: {:.2}", summary.peak_weekly_hours));
    lines.push(format!("Last end week: {last_end_week}"));
    lines.push(String::new());
    lines.push("Projects:".to_string());
    lines.push("Project | Start | End | Adjusted".to_string());
    lines.push("--------|-------|-----|---------".to_string());
    for project in &output.projects {
        let muted = if project.muted { " (muted)" } else { "" };
        lines.push(format!(
            "{}{muted} | {} | {} | {:.0}",
            project.name, project.start_week, project.end_week, project.rounded_adjusted
        ));
    }

    if !output.groups.is_empty() {
        lines.push(String::new());
        lines.push("Groups:".to_string());
        lines.push("Group | Speed | Peak inventory | Final inventory".to_string());
        lines.push("------|-------|----------------|----------------".to_string());
        for (group, summary) in &output.groups {
            lines.push(format!(
                "{group} | {:.2} | {:.2} | {:.2}",
                summary.monthly_sales_speed, summary.peak_inventory, summary.final_inventory
            ));
        }
    }

    if !output.production_rates.is_empty() {
        lines.push(String::new());
        lines.push("Production rate:".to_string());
        lines.push("Month | Rate".to_string());
        lines.push("------|-----".to_string());
        for point in &output.production_rates {
            let marker = if point.active { " *" } else { "" };
            lines.push(format!("{} | {:.1}{marker}", point.month.format("%b %Y"), point.rate));
        }
    }

    lines.join("\n")
}
