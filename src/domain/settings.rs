use chrono::NaiveDate;

pub const DEFAULT_EPOCH_YEAR: i32 = 2025;
pub const DEFAULT_EPOCH_MONTH: u32 = 1;
pub const DEFAULT_EPOCH_DAY: u32 = 1;
pub const DEFAULT_COMPLEXITY_BASE: f64 = 4.5;
pub const DEFAULT_WEEKS_PER_MONTH: f64 = 4.33;
pub const DEFAULT_ENGINE_CAPACITY: u32 = 500;
pub const DEFAULT_INPUT_CAPACITY: u32 = 450;
pub const DEFAULT_SALES_SPEED: f64 = 5.0;
/// Longest timeline accepted from input, one hundred years of weeks.
pub const MAX_TIMELINE_WEEKS: u32 = 5200;

/// Fixed parameters shared by every stage of one simulation run.
///
/// `engine_default_capacity` and `input_default_capacity` are intentionally
/// kept apart: the first fills quarters missing from the capacity table, the
/// second replaces unparseable values while reading a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub epoch: NaiveDate,
    pub complexity_base: f64,
    pub default_complexity: f64,
    pub weeks_per_month: f64,
    pub engine_default_capacity: u32,
    pub input_default_capacity: u32,
    pub default_sales_speed: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            complexity_base: DEFAULT_COMPLEXITY_BASE,
            default_complexity: DEFAULT_COMPLEXITY_BASE,
            weeks_per_month: DEFAULT_WEEKS_PER_MONTH,
            engine_default_capacity: DEFAULT_ENGINE_CAPACITY,
            input_default_capacity: DEFAULT_INPUT_CAPACITY,
            default_sales_speed: DEFAULT_SALES_SPEED,
        }
    }
}

pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(DEFAULT_EPOCH_YEAR, DEFAULT_EPOCH_MONTH, DEFAULT_EPOCH_DAY)
        .unwrap_or(NaiveDate::MIN)
}
