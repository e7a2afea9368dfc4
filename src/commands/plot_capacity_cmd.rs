use crate::commands::base_commands::Commands;
use crate::services::capacity_plot::plot_capacity_from_yaml_file;

pub fn plot_capacity_command(cmd: Commands) {
    if let Commands::PlotCapacity {
        input,
        output,
        settings,
    } = cmd
    {
        match plot_capacity_from_yaml_file(&input, settings.as_deref(), &output) {
            Ok(()) => println!("Capacity plot written to {output}"),
            Err(e) => eprintln!("Failed to plot capacity: {e:?}"),
        }
    }
}
