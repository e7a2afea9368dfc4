use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use serde::Serialize;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `"{year}-Q{quarter}"`, the identity of the quarter a week falls into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QuarterKey(pub String);

impl QuarterKey {
    pub fn new(year: i32, quarter: u32) -> Self {
        Self(format!("{year}-Q{quarter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    /// 0-based month (January = 0).
    pub month: u32,
    pub year: i32,
    pub start_week: u32,
    pub week_count: u32,
}

impl MonthLabel {
    pub fn name(&self) -> String {
        let month = MONTH_NAMES
            .get(self.month as usize)
            .copied()
            .unwrap_or("???");
        format!("{month} {}", self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterRange {
    pub quarter: u32,
    pub year: i32,
    pub start_week: u32,
    pub week_count: u32,
}

impl QuarterRange {
    pub fn key(&self) -> QuarterKey {
        QuarterKey::new(self.year, self.quarter)
    }
}

/// Maps 1-based week indices onto 7-day weeks starting at `epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCalendar {
    pub epoch: NaiveDate,
}

impl WeekCalendar {
    pub fn new(epoch: NaiveDate) -> Self {
        Self { epoch }
    }

    /// Saturates at `NaiveDate::MAX` instead of overflowing.
    pub fn week_to_date(&self, week: u32) -> NaiveDate {
        let offset = i64::from(week) - 1;
        self.epoch
            .checked_add_signed(Duration::days(7 * offset))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn week_to_quarter_key(&self, week: u32) -> QuarterKey {
        let date = self.week_to_date(week);
        QuarterKey::new(date.year(), quarter_of(date))
    }

    /// Splits weeks `1..=weeks` into runs of the same calendar month.
    ///
    /// With `weeks == 0` a single empty label anchored at the epoch month is
    /// returned.
    pub fn month_labels(&self, weeks: u32) -> Vec<MonthLabel> {
        let mut labels = vec![MonthLabel {
            month: self.epoch.month0(),
            year: self.epoch.year(),
            start_week: 1,
            week_count: 0,
        }];

        for week in 1..=weeks {
            let date = self.week_to_date(week);
            let last = labels.len() - 1;
            let current = &mut labels[last];
            if date.month0() != current.month || date.year() != current.year {
                current.week_count = week - current.start_week;
                labels.push(MonthLabel {
                    month: date.month0(),
                    year: date.year(),
                    start_week: week,
                    week_count: 0,
                });
            }
        }

        if let Some(last) = labels.last_mut() {
            last.week_count = (weeks + 1).saturating_sub(last.start_week);
        }
        labels
    }

    /// Splits weeks `1..=weeks` into runs sharing the same quarter key.
    pub fn quarter_ranges(&self, weeks: u32) -> Vec<QuarterRange> {
        let mut ranges: Vec<QuarterRange> = Vec::new();
        for week in 1..=weeks {
            let date = self.week_to_date(week);
            let quarter = quarter_of(date);
            match ranges.last_mut() {
                Some(current) if current.quarter == quarter && current.year == date.year() => {
                    current.week_count += 1;
                }
                _ => ranges.push(QuarterRange {
                    quarter,
                    year: date.year(),
                    start_week: week,
                    week_count: 1,
                }),
            }
        }
        ranges
    }
}

fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::on_date;

    fn calendar() -> WeekCalendar {
        WeekCalendar::new(on_date(2025, 1, 1))
    }

    #[test]
    fn week_to_date_advances_seven_days_per_week() {
        let test_cases = vec![
            (1, on_date(2025, 1, 1)),
            (2, on_date(2025, 1, 8)),
            (5, on_date(2025, 1, 29)),
            (14, on_date(2025, 4, 2)),
            (53, on_date(2025, 12, 31)),
            (54, on_date(2026, 1, 7)),
        ];

        for (week, expected) in test_cases {
            assert_eq!(calendar().week_to_date(week), expected, "week {week}");
        }
    }

    #[test]
    fn week_to_date_saturates_past_the_last_representable_date() {
        assert_eq!(calendar().week_to_date(u32::MAX), NaiveDate::MAX);
    }

    #[test]
    fn week_zero_maps_to_the_week_before_the_epoch() {
        assert_eq!(calendar().week_to_date(0), on_date(2024, 12, 25));
    }

    #[test]
    fn quarter_key_follows_the_mapped_date() {
        assert_eq!(calendar().week_to_quarter_key(5).as_str(), "2025-Q1");
        assert_eq!(calendar().week_to_quarter_key(13).as_str(), "2025-Q1");
        assert_eq!(calendar().week_to_quarter_key(14).as_str(), "2025-Q2");
        assert_eq!(calendar().week_to_quarter_key(54).as_str(), "2026-Q1");
    }

    #[test]
    fn month_labels_open_a_label_on_each_month_change() {
        let labels = calendar().month_labels(10);
        assert_eq!(
            labels,
            vec![
                MonthLabel { month: 0, year: 2025, start_week: 1, week_count: 5 },
                MonthLabel { month: 1, year: 2025, start_week: 6, week_count: 4 },
                MonthLabel { month: 2, year: 2025, start_week: 10, week_count: 1 },
            ]
        );
        assert_eq!(labels[1].name(), "Feb 2025");
    }

    #[test]
    fn month_labels_for_empty_timeline_is_single_empty_label() {
        let labels = calendar().month_labels(0);
        assert_eq!(
            labels,
            vec![MonthLabel { month: 0, year: 2025, start_week: 1, week_count: 0 }]
        );
    }

    #[test]
    fn month_labels_distinguish_same_month_in_different_years() {
        let labels = WeekCalendar::new(on_date(2025, 1, 1)).month_labels(60);
        let januaries: Vec<_> = labels.iter().filter(|label| label.month == 0).collect();
        assert_eq!(januaries.len(), 2);
        assert_eq!(januaries[1].year, 2026);
    }

    #[test]
    fn quarter_ranges_count_weeks_per_quarter() {
        let ranges = calendar().quarter_ranges(30);
        assert_eq!(
            ranges,
            vec![
                QuarterRange { quarter: 1, year: 2025, start_week: 1, week_count: 13 },
                QuarterRange { quarter: 2, year: 2025, start_week: 14, week_count: 13 },
                QuarterRange { quarter: 3, year: 2025, start_week: 27, week_count: 4 },
            ]
        );
        assert_eq!(ranges[2].key().as_str(), "2025-Q3");
    }

    #[test]
    fn quarter_ranges_for_empty_timeline_is_empty() {
        assert!(calendar().quarter_ranges(0).is_empty());
    }

    #[test]
    fn label_week_counts_sum_to_timeline_length() {
        for weeks in [1, 4, 13, 52, 53, 104, 157] {
            let months: u32 = calendar().month_labels(weeks).iter().map(|l| l.week_count).sum();
            let quarters: u32 = calendar().quarter_ranges(weeks).iter().map(|q| q.week_count).sum();
            assert_eq!(months, weeks, "months for {weeks}");
            assert_eq!(quarters, weeks, "quarters for {weeks}");
        }
    }
}
