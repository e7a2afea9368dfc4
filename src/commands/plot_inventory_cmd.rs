use crate::commands::base_commands::Commands;
use crate::services::inventory_plot::plot_inventory_from_yaml_file;

pub fn plot_inventory_command(cmd: Commands) {
    if let Commands::PlotInventory {
        input,
        output,
        settings,
    } = cmd
    {
        match plot_inventory_from_yaml_file(&input, settings.as_deref(), &output) {
            Ok(()) => println!("Inventory plot written to {output}"),
            Err(e) => eprintln!("Failed to plot inventory: {e:?}"),
        }
    }
}
