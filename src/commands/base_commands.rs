use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::settings::MAX_TIMELINE_WEEKS;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Allocate capacity and simulate inventory for a scenario
    Simulate {
        /// Scenario YAML or JSON file
        #[arg(short, long)]
        input: String,
        /// Output file (JSON when it ends in .json, YAML otherwise)
        #[arg(short, long)]
        output: String,
        /// Optional settings YAML file
        #[arg(short, long)]
        settings: Option<String>,
        /// Override the scenario's timeline length in weeks
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_TIMELINE_WEEKS)))]
        weeks: Option<u32>,
    },
    /// Plot weekly capacity and allocated hours into a PNG chart
    PlotCapacity {
        /// Scenario YAML or JSON file
        #[arg(short, long)]
        input: String,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
        /// Optional settings YAML file
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Plot group inventory over time into a PNG chart
    PlotInventory {
        /// Scenario YAML or JSON file
        #[arg(short, long)]
        input: String,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
        /// Optional settings YAML file
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Write project spans as a Mermaid Gantt diagram
    PlotGantt {
        /// Scenario YAML or JSON file
        #[arg(short, long)]
        input: String,
        /// Output Markdown file
        #[arg(short, long)]
        output: String,
        /// Optional settings YAML file
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Print month labels and quarter ranges for a timeline
    Labels {
        /// Timeline length in weeks
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_TIMELINE_WEEKS)))]
        weeks: u32,
        /// Optional settings YAML file
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
