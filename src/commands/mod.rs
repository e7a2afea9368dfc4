pub mod base_commands;
pub mod labels_cmd;
pub mod plot_capacity_cmd;
pub mod plot_gantt_cmd;
pub mod plot_inventory_cmd;
pub mod report_format;
pub mod simulate_cmd;
