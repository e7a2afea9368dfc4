use tracing::{debug, info, warn};

use crate::domain::calendar::WeekCalendar;
use crate::domain::capacity::CapacityTable;
use crate::domain::project::{Portfolio, ProjectId};
use crate::domain::settings::SimulationSettings;

/// Capacity below this is treated as exhausted; stops rounds that would only
/// redistribute floating point residue.
const CAPACITY_EPSILON: f64 = 1e-9;

/// Hours granted to each project per week. Vectors have `timeline_weeks + 1`
/// slots; slot 0 is never written.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationTable {
    per_project: Vec<Vec<f64>>,
    weekly_hours: Vec<f64>,
    weekly_capacity: Vec<f64>,
}

impl AllocationTable {
    fn new(project_count: usize, timeline_weeks: u32) -> Self {
        let slots = timeline_weeks as usize + 1;
        Self {
            per_project: vec![vec![0.0; slots]; project_count],
            weekly_hours: vec![0.0; slots],
            weekly_capacity: vec![0.0; slots],
        }
    }

    pub fn project(&self, id: ProjectId) -> &[f64] {
        self.per_project.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total hours granted across all projects per week.
    pub fn weekly_hours(&self) -> &[f64] {
        &self.weekly_hours
    }

    /// Capacity each week resolved to, whether or not anything was active.
    pub fn weekly_capacity(&self) -> &[f64] {
        &self.weekly_capacity
    }

    fn last_allocated_week(&self, id: ProjectId) -> Option<u32> {
        self.project(id)
            .iter()
            .rposition(|hours| *hours > 0.0)
            .filter(|week| *week > 0)
            .map(|week| week as u32)
    }
}

/// Splits each week's capacity across the active projects with max-min
/// fairness.
pub struct AllocationEngine<'a> {
    calendar: WeekCalendar,
    capacities: &'a CapacityTable,
    default_capacity: u32,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(settings: &SimulationSettings, capacities: &'a CapacityTable) -> Self {
        Self {
            calendar: WeekCalendar::new(settings.epoch),
            capacities,
            default_capacity: settings.engine_default_capacity,
        }
    }

    pub fn capacity_for_week(&self, week: u32) -> f64 {
        let key = self.calendar.week_to_quarter_key(week);
        if let Some(value) = self.capacities.get(&key) {
            if value < 0 {
                warn!(quarter = %key, value, "negative capacity clamped to zero");
            }
        }
        self.capacities.resolve(&key, self.default_capacity)
    }

    /// Runs the weekly allocation, draining `remaining_hours` and setting
    /// `end_week` on every project of the portfolio.
    pub fn allocate(&self, portfolio: &mut Portfolio, timeline_weeks: u32) -> AllocationTable {
        let mut table = AllocationTable::new(portfolio.len(), timeline_weeks);
        let ids: Vec<ProjectId> = portfolio.ids().collect();

        for week in 1..=timeline_weeks {
            let capacity = self.capacity_for_week(week);
            table.weekly_capacity[week as usize] = capacity;

            let active: Vec<ProjectId> = ids
                .iter()
                .copied()
                .filter(|id| {
                    portfolio.get(*id).is_some_and(|project| {
                        !project.muted && project.start_week <= week && project.remaining_hours > 0.0
                    })
                })
                .collect();
            if active.is_empty() {
                continue;
            }

            let granted = self.fill_week(portfolio, &mut table, week, active, capacity);
            debug!(week, capacity, granted, "allocated week");
        }

        for id in ids {
            let last_week = table.last_allocated_week(id);
            if let Some(project) = portfolio.get_mut(id) {
                project.end_week = if project.muted {
                    Some(project.start_week)
                } else {
                    Some(last_week.unwrap_or(project.start_week))
                };
            }
        }

        info!(
            projects = portfolio.len(),
            timeline_weeks, "capacity allocation finished"
        );
        table
    }

    /// Water-filling for one week. Grants of a round are computed from the
    /// state at round start, so project order does not matter.
    fn fill_week(
        &self,
        portfolio: &mut Portfolio,
        table: &mut AllocationTable,
        week: u32,
        mut active: Vec<ProjectId>,
        capacity: f64,
    ) -> f64 {
        let slot = week as usize;
        let mut available = capacity;
        let mut granted_in_week = 0.0;

        while available > CAPACITY_EPSILON && !active.is_empty() {
            let share = available / active.len() as f64;
            let grants: Vec<(ProjectId, f64)> = active
                .iter()
                .map(|id| {
                    let remaining = portfolio.get(*id).map_or(0.0, |p| p.remaining_hours);
                    (*id, share.min(remaining))
                })
                .collect();

            let mut granted_in_round = 0.0;
            for (id, grant) in grants {
                if grant <= 0.0 {
                    continue;
                }
                if let Some(project) = portfolio.get_mut(id) {
                    project.remaining_hours = (project.remaining_hours - grant).max(0.0);
                    table.per_project[id.0][slot] += grant;
                    table.weekly_hours[slot] += grant;
                    granted_in_round += grant;
                }
            }

            available -= granted_in_round;
            granted_in_week += granted_in_round;
            active.retain(|id| portfolio.get(*id).is_some_and(|p| p.remaining_hours > 0.0));

            if granted_in_round <= 0.0 {
                break;
            }
        }
        granted_in_week
    }
}

/// Convenience wrapper building an engine for a single run.
pub fn allocate(
    portfolio: &mut Portfolio,
    capacities: &CapacityTable,
    timeline_weeks: u32,
    settings: &SimulationSettings,
) -> AllocationTable {
    AllocationEngine::new(settings, capacities).allocate(portfolio, timeline_weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Project;
    use crate::services::hours_adjustment::adjust_portfolio;
    use crate::test_support::{flat_capacity, project_with_hours};
    use proptest::prelude::*;

    fn run(projects: Vec<Project>, capacities: &CapacityTable, weeks: u32) -> (Portfolio, AllocationTable) {
        let settings = SimulationSettings::default();
        let mut portfolio = Portfolio::new(projects).unwrap();
        adjust_portfolio(&mut portfolio, &settings);
        let table = allocate(&mut portfolio, capacities, weeks, &settings);
        (portfolio, table)
    }

    #[test]
    fn single_project_consumes_full_capacity_until_done() {
        let (portfolio, table) = run(
            vec![Project::new("A", 1, 1000.0, 4.5)],
            &flat_capacity(500, 10),
            10,
        );

        let id = ProjectId(0);
        assert_eq!(table.project(id)[1], 500.0);
        assert_eq!(table.project(id)[2], 500.0);
        assert_eq!(table.project(id)[3], 0.0);
        let project = portfolio.get(id).unwrap();
        assert_eq!(project.remaining_hours, 0.0);
        assert_eq!(project.end_week, Some(2));
    }

    #[test]
    fn two_equal_projects_split_capacity_evenly() {
        let (portfolio, table) = run(
            vec![project_with_hours("A", 1, 300.0), project_with_hours("B", 1, 300.0)],
            &flat_capacity(500, 4),
            4,
        );

        assert_eq!(table.project(ProjectId(0))[1], 250.0);
        assert_eq!(table.project(ProjectId(1))[1], 250.0);
        assert_eq!(table.weekly_hours()[1], 500.0);
        assert_eq!(table.project(ProjectId(0))[2], 50.0);
        assert_eq!(portfolio.get(ProjectId(0)).unwrap().end_week, Some(2));
    }

    #[test]
    fn unused_share_of_a_finished_project_flows_to_the_others() {
        let (_, table) = run(
            vec![project_with_hours("Small", 1, 100.0), project_with_hours("Big", 1, 1000.0)],
            &flat_capacity(500, 2),
            2,
        );

        assert_eq!(table.project(ProjectId(0))[1], 100.0);
        assert_eq!(table.project(ProjectId(1))[1], 400.0);
        assert_eq!(table.weekly_hours()[1], 500.0);
    }

    #[test]
    fn weekly_total_stays_below_capacity_when_demand_is_lower() {
        let (portfolio, table) = run(
            vec![project_with_hours("A", 1, 120.0), project_with_hours("B", 1, 80.0)],
            &flat_capacity(500, 3),
            3,
        );

        assert_eq!(table.weekly_hours()[1], 200.0);
        assert_eq!(portfolio.get(ProjectId(0)).unwrap().end_week, Some(1));
        assert_eq!(portfolio.get(ProjectId(1)).unwrap().end_week, Some(1));
    }

    #[test]
    fn projects_wait_for_their_start_week() {
        let (portfolio, table) = run(
            vec![project_with_hours("Early", 1, 1000.0), project_with_hours("Late", 3, 200.0)],
            &flat_capacity(400, 6),
            6,
        );

        assert_eq!(table.project(ProjectId(1))[1], 0.0);
        assert_eq!(table.project(ProjectId(1))[2], 0.0);
        assert_eq!(table.project(ProjectId(0))[3], 200.0);
        assert_eq!(table.project(ProjectId(1))[3], 200.0);
        assert_eq!(portfolio.get(ProjectId(1)).unwrap().end_week, Some(3));
    }

    #[test]
    fn muted_project_gets_nothing_and_ends_at_start() {
        let mut muted = project_with_hours("Muted", 4, 500.0);
        muted.muted = true;
        let (portfolio, table) = run(
            vec![muted, project_with_hours("Live", 1, 600.0)],
            &flat_capacity(500, 8),
            8,
        );

        assert!(table.project(ProjectId(0)).iter().all(|hours| *hours == 0.0));
        let project = portfolio.get(ProjectId(0)).unwrap();
        assert_eq!(project.end_week, Some(4));
        assert_eq!(project.remaining_hours, 500.0);
        assert_eq!(table.project(ProjectId(1))[1], 500.0);
    }

    #[test]
    fn project_that_never_runs_ends_at_start_week() {
        let (portfolio, _) = run(
            vec![project_with_hours("Beyond", 20, 100.0)],
            &flat_capacity(500, 10),
            10,
        );
        assert_eq!(portfolio.get(ProjectId(0)).unwrap().end_week, Some(20));
    }

    #[test]
    fn missing_quarter_uses_engine_default_capacity() {
        let (_, table) = run(
            vec![project_with_hours("A", 1, 10_000.0)],
            &CapacityTable::new(),
            2,
        );
        assert_eq!(table.weekly_capacity()[1], 500.0);
        assert_eq!(table.project(ProjectId(0))[1], 500.0);
    }

    #[test]
    fn negative_capacity_stalls_the_week() {
        let capacities = CapacityTable::new().with("2025-Q1", -50);
        let (portfolio, table) = run(vec![project_with_hours("A", 1, 100.0)], &capacities, 3);

        assert_eq!(table.weekly_hours()[1], 0.0);
        assert_eq!(portfolio.get(ProjectId(0)).unwrap().remaining_hours, 100.0);
        assert_eq!(portfolio.get(ProjectId(0)).unwrap().end_week, Some(1));
    }

    #[test]
    fn capacity_changes_at_quarter_boundary() {
        let capacities = CapacityTable::new().with("2025-Q1", 100).with("2025-Q2", 300);
        let (_, table) = run(vec![project_with_hours("A", 1, 100_000.0)], &capacities, 14);

        assert_eq!(table.project(ProjectId(0))[13], 100.0);
        assert_eq!(table.project(ProjectId(0))[14], 300.0);
    }

    #[test]
    fn zero_week_timeline_leaves_projects_untouched() {
        let (portfolio, table) = run(vec![project_with_hours("A", 1, 100.0)], &flat_capacity(500, 1), 0);
        assert_eq!(table.weekly_hours(), &[0.0]);
        assert_eq!(portfolio.get(ProjectId(0)).unwrap().end_week, Some(1));
    }

    #[test]
    fn reversed_input_order_yields_the_same_allocations() {
        let forward = vec![
            project_with_hours("A", 1, 100.0),
            project_with_hours("B", 1, 333.3),
            project_with_hours("C", 1, 77.7),
        ];
        let reversed: Vec<Project> = forward.iter().rev().cloned().collect();

        let (first, first_table) = run(forward, &flat_capacity(500, 3), 3);
        let (second, second_table) = run(reversed, &flat_capacity(500, 3), 3);

        assert_allocations_match(&first, &first_table, &second, &second_table);
        let b = ProjectId(1);
        assert!((first_table.project(b)[1] - 322.3).abs() < 1e-9);
        assert!((first_table.project(b)[2] - 11.0).abs() < 1e-9);
    }

    // Matches projects by name; grants may differ in the last bits because
    // round totals are summed in input order.
    fn assert_allocations_match(
        first: &Portfolio,
        first_table: &AllocationTable,
        second: &Portfolio,
        second_table: &AllocationTable,
    ) {
        for (id, project) in first.iter() {
            let (other_id, _) = second
                .iter()
                .find(|(_, other)| other.name == project.name)
                .unwrap();
            let expected = first_table.project(id);
            let actual = second_table.project(other_id);
            assert_eq!(expected.len(), actual.len());
            for (week, (a, b)) in expected.iter().zip(actual).enumerate() {
                assert!((a - b).abs() < 1e-9, "{} week {week}: {a} vs {b}", project.name);
            }
        }
    }

    fn project_strategy() -> impl Strategy<Value = (u32, f64, bool)> {
        (1u32..12, 0.0f64..2_000.0, prop::bool::weighted(0.2))
    }

    fn build_projects(entries: &[(u32, f64, bool)]) -> Vec<Project> {
        entries
            .iter()
            .enumerate()
            .map(|(idx, (start, hours, muted))| {
                let mut project = project_with_hours(&format!("P{idx}"), *start, *hours);
                project.muted = *muted;
                project
            })
            .collect()
    }

    proptest! {
        #[test]
        fn allocation_respects_capacity_and_remaining_hours(
            entries in prop::collection::vec(project_strategy(), 1..8),
            capacity in 0i64..1_200,
            weeks in 0u32..30,
        ) {
            let (portfolio, table) = run(build_projects(&entries), &flat_capacity(capacity, 30), weeks);

            for week in 1..=weeks as usize {
                prop_assert!(table.weekly_hours()[week] <= table.weekly_capacity()[week] + 1e-6);
            }
            for (id, project) in portfolio.iter() {
                prop_assert!(project.remaining_hours >= 0.0);
                let total: f64 = table.project(id).iter().sum();
                prop_assert!((total + project.remaining_hours - project.adjusted_hours).abs() < 1e-6);
                prop_assert!(project.end_week_or_start() >= project.start_week);
                if project.muted {
                    prop_assert_eq!(total, 0.0);
                    prop_assert_eq!(project.end_week, Some(project.start_week));
                }
            }
        }

        #[test]
        fn allocation_does_not_depend_on_project_order(
            (entries, order) in prop::collection::vec(project_strategy(), 1..8).prop_flat_map(|entries| {
                let order: Vec<usize> = (0..entries.len()).collect();
                (Just(entries), Just(order).prop_shuffle())
            }),
            capacity in 0i64..1_200,
            weeks in 0u32..30,
        ) {
            let projects = build_projects(&entries);
            let shuffled: Vec<Project> = order.iter().map(|idx| projects[*idx].clone()).collect();

            let (first, first_table) = run(projects, &flat_capacity(capacity, 30), weeks);
            let (second, second_table) = run(shuffled, &flat_capacity(capacity, 30), weeks);
            assert_allocations_match(&first, &first_table, &second, &second_table);
        }

        #[test]
        fn remaining_hours_never_increase_or_go_negative(
            entries in prop::collection::vec(project_strategy(), 1..8),
            capacity in 0i64..1_200,
            weeks in 0u32..30,
        ) {
            let (portfolio, table) = run(build_projects(&entries), &flat_capacity(capacity, 30), weeks);

            for (id, project) in portfolio.iter() {
                let mut remaining = project.adjusted_hours;
                for week in 1..=weeks as usize {
                    let granted = table.project(id)[week];
                    prop_assert!(granted >= 0.0);
                    let next = remaining - granted;
                    prop_assert!(next <= remaining);
                    prop_assert!(next >= -1e-9, "{} dropped to {next} in week {week}", project.name);
                    remaining = next;
                }
                prop_assert!((remaining - project.remaining_hours).abs() < 1e-6);
            }
        }

        #[test]
        fn capacity_is_saturated_while_demand_exceeds_it(
            hours in prop::collection::vec(600.0f64..5_000.0, 1..6),
            capacity in 1i64..500,
        ) {
            let projects: Vec<Project> = hours
                .iter()
                .enumerate()
                .map(|(idx, h)| project_with_hours(&format!("P{idx}"), 1, *h))
                .collect();
            let (_, table) = run(projects, &flat_capacity(capacity, 1), 1);
            prop_assert!((table.weekly_hours()[1] - capacity as f64).abs() < 1e-6);
        }
    }
}
