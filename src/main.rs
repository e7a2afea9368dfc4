use capacity_planner::commands::base_commands::{CliArgs, Commands};
use capacity_planner::commands::labels_cmd::labels_command;
use capacity_planner::commands::plot_capacity_cmd::plot_capacity_command;
use capacity_planner::commands::plot_gantt_cmd::plot_gantt_command;
use capacity_planner::commands::plot_inventory_cmd::plot_inventory_command;
use capacity_planner::commands::simulate_cmd::simulate_command;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.command {
        cmd @ Commands::Simulate { .. } => simulate_command(cmd),
        cmd @ Commands::PlotCapacity { .. } => plot_capacity_command(cmd),
        cmd @ Commands::PlotInventory { .. } => plot_inventory_command(cmd),
        cmd @ Commands::PlotGantt { .. } => plot_gantt_command(cmd),
        cmd @ Commands::Labels { .. } => labels_command(cmd),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }
}
