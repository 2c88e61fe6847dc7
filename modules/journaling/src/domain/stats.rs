//! Pure aggregation over entry samples.
//!
//! The repository only counts rows and fetches `(entry_date, mood, energy)`
//! tuples; averaging, rounding and day bucketing happen here.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::contract::model::MoodTrendPoint;

/// Date and ratings of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodSample {
    pub entry_date: NaiveDate,
    pub mood_rating: Option<i32>,
    pub energy_level: Option<i32>,
}

/// Date bounds of one stats request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub as_of: NaiveDate,
    /// First day of `as_of`'s month.
    pub month_start: NaiveDate,
    /// `as_of` minus the trend window length.
    pub trend_start: NaiveDate,
}

impl StatsWindow {
    pub fn new(as_of: NaiveDate, trend_window_days: u32) -> Self {
        let month_start = NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1).unwrap_or(as_of);
        let trend_start = as_of
            .checked_sub_days(Days::new(u64::from(trend_window_days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            as_of,
            month_start,
            trend_start,
        }
    }

    /// Oldest date any aggregate needs.
    pub fn earliest(&self) -> NaiveDate {
        self.month_start.min(self.trend_start)
    }

    fn in_month(&self, d: NaiveDate) -> bool {
        d >= self.month_start
    }

    fn in_trend(&self, d: NaiveDate) -> bool {
        d >= self.trend_start && d <= self.as_of
    }
}

/// Round to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn mean(values: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, n) = values.fold((0i64, 0u32), |(s, n), v| (s + i64::from(v), n + 1));
    (n > 0).then(|| sum as f64 / f64::from(n))
}

/// Mean mood of this month's rated entries, rounded to two decimals.
pub fn average_mood_this_month(samples: &[MoodSample], window: &StatsWindow) -> Option<f64> {
    mean(
        samples
            .iter()
            .filter(|s| window.in_month(s.entry_date))
            .filter_map(|s| s.mood_rating),
    )
    .map(round2)
}

/// Mean energy of this month's rated entries, rounded to two decimals.
pub fn average_energy_this_month(samples: &[MoodSample], window: &StatsWindow) -> Option<f64> {
    mean(
        samples
            .iter()
            .filter(|s| window.in_month(s.entry_date))
            .filter_map(|s| s.energy_level),
    )
    .map(round2)
}

/// One point per day inside the trend window that has at least one mood rating,
/// ascending by date. Days without ratings are skipped, not zero-filled.
pub fn mood_trend(samples: &[MoodSample], window: &StatsWindow) -> Vec<MoodTrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, (i64, u32)> = BTreeMap::new();
    for s in samples.iter().filter(|s| window.in_trend(s.entry_date)) {
        if let Some(mood) = s.mood_rating {
            let slot = by_day.entry(s.entry_date).or_insert((0, 0));
            slot.0 += i64::from(mood);
            slot.1 += 1;
        }
    }
    by_day
        .into_iter()
        .map(|(date, (sum, n))| MoodTrendPoint {
            date,
            mood: sum as f64 / f64::from(n),
        })
        .collect()
}
