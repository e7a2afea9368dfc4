use crate::commands::base_commands::Commands;
use crate::services::gantt_diagram::{generate_gantt_diagram, title_from_path};
use crate::services::simulation::simulate_from_yaml_file;

pub fn plot_gantt_command(cmd: Commands) {
    if let Commands::PlotGantt {
        input,
        output,
        settings,
    } = cmd
    {
        let simulation = match simulate_from_yaml_file(&input, settings.as_deref(), None) {
            Ok(simulation) => simulation,
            Err(e) => {
                eprintln!("Failed to simulate scenario: {e:?}");
                return;
            }
        };

        let diagram = generate_gantt_diagram(&title_from_path(&input), &simulation);
        if let Err(e) = std::fs::write(&output, diagram) {
            eprintln!("Failed to write gantt diagram: {e:?}");
        } else {
            println!("Gantt diagram written to {output}");
        }
    }
}
