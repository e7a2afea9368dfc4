pub mod allocation;
pub mod capacity_plot;
pub mod gantt_diagram;
pub mod hours_adjustment;
pub mod inventory;
pub mod inventory_plot;
pub mod production_rate;
pub mod scenario_yaml;
pub mod settings_yaml;
pub mod simulation;
pub mod simulation_types;
