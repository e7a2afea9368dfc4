use serde::Serialize;
use tracing::debug;

use crate::domain::project::Portfolio;
use crate::domain::settings::SimulationSettings;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct AdjustedHours {
    pub original: f64,
    pub adjusted: f64,
    pub rounded_adjusted: f64,
}

/// Scales nominal effort by `complexity / baseline`.
///
/// The rounded value uses round-half-to-even and is for display only; the
/// allocation works on the unrounded `adjusted` value.
pub fn adjust(original_hours: f64, complexity: f64, baseline: f64) -> AdjustedHours {
    let adjusted = original_hours * complexity / baseline;
    AdjustedHours {
        original: original_hours,
        adjusted,
        rounded_adjusted: adjusted.round_ties_even(),
    }
}

/// Fills `adjusted_hours`, `rounded_adjusted_hours` and resets
/// `remaining_hours` for every project.
pub fn adjust_portfolio(portfolio: &mut Portfolio, settings: &SimulationSettings) {
    for (_, project) in portfolio.iter_mut() {
        let hours = adjust(
            project.original_hours,
            project.complexity,
            settings.complexity_base,
        );
        project.adjusted_hours = hours.adjusted;
        project.rounded_adjusted_hours = hours.rounded_adjusted;
        project.remaining_hours = hours.adjusted;
        debug!(
            project = %project.name,
            original = hours.original,
            adjusted = hours.adjusted,
            "adjusted project hours"
        );
    }
}
