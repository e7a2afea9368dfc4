use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Planned production rate anchored at the first day of a month.
///
/// Inactive points are kept for display but never steer interpolation.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    pub month: NaiveDate,
    pub rate: f64,
    pub active: bool,
}

impl RatePoint {
    pub fn new(month: NaiveDate, rate: f64) -> Self {
        Self {
            month,
            rate,
            active: true,
        }
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Active points moved to the first of their month, ordered by month.
pub fn active_points(points: &[RatePoint]) -> Vec<RatePoint> {
    let mut active: Vec<RatePoint> = points
        .iter()
        .filter(|point| point.active)
        .map(|point| RatePoint {
            month: first_of_month(point.month),
            ..*point
        })
        .collect();
    active.sort_by_key(|point| point.month);
    active
}

/// Rate at `date` from `active` points: linear between neighbours, held flat
/// before the first and after the last point, never below zero.
pub fn interpolate_rate(date: NaiveDate, active: &[RatePoint]) -> f64 {
    let mut sorted = active.to_vec();
    sorted.sort_by_key(|point| point.month);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    if sorted.len() == 1 || date <= first.month {
        return first.rate.max(0.0);
    }
    if date >= last.month {
        return last.rate.max(0.0);
    }

    sorted
        .windows(2)
        .find(|pair| pair[0].month <= date && date <= pair[1].month)
        .map(|pair| {
            let span = (pair[1].month - pair[0].month).num_days();
            let ratio = if span == 0 {
                0.0
            } else {
                (date - pair[0].month).num_days() as f64 / span as f64
            };
            (pair[0].rate + ratio * (pair[1].rate - pair[0].rate)).max(0.0)
        })
        .unwrap_or(0.0)
}

/// One entry per month from `start` to `end` inclusive. A month carrying an
/// active point keeps its own rate; every other month is interpolated.
pub fn build_monthly_series(points: &[RatePoint], start: NaiveDate, end: NaiveDate) -> Vec<RatePoint> {
    let explicit: BTreeMap<NaiveDate, &RatePoint> = points
        .iter()
        .map(|point| (first_of_month(point.month), point))
        .collect();
    let active = active_points(points);

    let end = first_of_month(end);
    let mut cursor = first_of_month(start);
    let mut series = Vec::new();
    while cursor <= end {
        let existing = explicit.get(&cursor).filter(|point| point.active);
        series.push(RatePoint {
            month: cursor,
            rate: existing.map_or_else(|| interpolate_rate(cursor, &active), |point| point.rate),
            active: existing.is_some(),
        });
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    series
}
