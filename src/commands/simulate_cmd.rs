use crate::commands::base_commands::Commands;
use crate::commands::report_format::format_simulation_report;
use crate::services::gantt_diagram::{generate_gantt_diagram, title_from_path};
use crate::services::inventory_plot::write_inventory_png;
use crate::services::simulation::simulate_from_yaml_file;
use crate::services::simulation_types::SimulationOutput;

pub fn simulate_command(cmd: Commands) {
    if let Commands::Simulate {
        input,
        output,
        settings,
        weeks,
    } = cmd
    {
        let simulation = match simulate_from_yaml_file(&input, settings.as_deref(), weeks) {
            Ok(simulation) => simulation,
            Err(e) => {
                eprintln!("Failed to simulate scenario: {e:?}");
                return;
            }
        };

        let gantt_path = format!("{output}.gantt.md");
        let diagram = generate_gantt_diagram(&title_from_path(&input), &simulation);
        if let Err(e) = std::fs::write(&gantt_path, diagram) {
            eprintln!("Failed to write gantt diagram: {e:?}");
        }

        let inventory_path = format!("{output}.inventory.png");
        let has_inventory = !simulation.group_inventory.is_empty();
        if has_inventory {
            if let Err(e) = write_inventory_png(&inventory_path, &simulation) {
                eprintln!("Failed to write inventory plot: {e:?}");
            }
        }

        let contents = match serialize_output(&output, &simulation) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize simulation output: {e}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&output, contents) {
            eprintln!("Failed to write simulation output: {e:?}");
        } else {
            println!("{}", format_simulation_report(&simulation));
            println!();
            println!("Simulation result written to {output}");
            println!("Gantt diagram written to {gantt_path}");
            if has_inventory {
                println!("Inventory plot written to {inventory_path}");
            }
        }
    }
}

fn serialize_output(output_path: &str, simulation: &SimulationOutput) -> Result<String, String> {
    if output_path.ends_with(".json") {
        serde_json::to_string_pretty(simulation).map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(simulation).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simulation::simulate_from_yaml_file;
    use assert_fs::prelude::*;

    #[test]
    fn serialize_output_picks_json_by_extension() {
        let file = assert_fs::NamedTempFile::new("scenario.yaml").unwrap();
        file.write_str("timeline_weeks: 2\nprojects:\n  - name: A\n    start_week: 1\n")
            .unwrap();
        let simulation = simulate_from_yaml_file(file.path().to_str().unwrap(), None, None).unwrap();

        let json = serialize_output("out.json", &simulation).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("\"epoch\": \"2025-01-01\""));

        let yaml = serialize_output("out.yaml", &simulation).unwrap();
        assert!(yaml.contains("epoch:"));
        assert!(yaml.contains("2025-01-01"));
    }
}
