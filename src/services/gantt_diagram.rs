use std::path::Path;

use chrono::Duration;

use crate::domain::calendar::WeekCalendar;
use crate::services::simulation_types::{ProjectResult, SimulationOutput};

const UNGROUPED_SECTION: &str = "Ungrouped";

/// Diagram title derived from the scenario file name.
pub fn title_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Scenario")
        .to_string()
}

/// Renders project spans as a Mermaid Gantt chart, one section per group.
pub fn generate_gantt_diagram(title: &str, simulation: &SimulationOutput) -> String {
    let calendar = WeekCalendar::new(simulation.epoch);

    let mut sections: Vec<(&str, Vec<(usize, &ProjectResult)>)> = Vec::new();
    for (idx, project) in simulation.projects.iter().enumerate() {
        let section = project
            .group
            .as_deref()
            .filter(|group| !group.is_empty())
            .unwrap_or(UNGROUPED_SECTION);
        match sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, entries)) => entries.push((idx, project)),
            None => sections.push((section, vec![(idx, project)])),
        }
    }

    let mut lines = Vec::new();
    lines.push("".to_string());
    lines.push(format!("# {title} Timeline"));
    lines.push("```mermaid".to_string());
    lines.push("gantt".to_string());
    lines.push("    dateFormat  YYYY-MM-DD".to_string());

    for (section, entries) in sections {
        lines.push(format!("    section {}", sanitize(section)));
        for (idx, project) in entries {
            let name = sanitize(&project.name);
            let start = calendar.week_to_date(project.start_week);
            if project.muted {
                lines.push(format!(
                    "    {name} (muted) :milestone, p{idx}, {}, 0d",
                    start.format("%Y-%m-%d")
                ));
                continue;
            }
            let end = calendar.week_to_date(project.end_week) + Duration::days(7);
            lines.push(format!(
                "    {name} :p{idx}, {}, {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ));
        }
    }
    lines.push("```".to_string());

    lines.join("\n")
}

// Mermaid treats ':' and '#' as syntax inside task lines.
fn sanitize(text: &str) -> String {
    text.replace([':', '#'], " ").trim().to_string()
}
