use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{
    Serialize,
    Deserialize
};
use tracing::debug;

use crate::optimizer::dateoptimization::{
    DateOptimization,
    NEAR_HOLIDAY_WINDOW
};
use crate::time::calendar::workingdayindex::WorkingDayIndex;
use crate::time::rangeofdates::RangeOfDates;
use crate::time::utility::{
    shift_days,
    trip_end_date
};

/// Days searched on each side of a selected start date.
pub const NEARBY_SEARCH_DAYS: i64 = 5;

/// Efficiency a nearby date must beat the selection by to be suggested.
pub const IMPROVEMENT_THRESHOLD: f64 = 0.5;

/// Scans every start date of an indexed year for one trip length.
pub struct LeaveScanner<'a> {
    index: &'a WorkingDayIndex
}

impl<'a> LeaveScanner<'a> {
    pub fn new(index: &'a WorkingDayIndex) -> LeaveScanner<'a> {
        LeaveScanner { index }
    }

    pub fn index(&self) -> &WorkingDayIndex {
        self.index
    }

    /// Working days consumed by a trip starting on `start`; `None` when the trip
    /// would run past the end of the indexed year.
    pub fn leave_days_needed(&self, start: NaiveDate, trip_days: u32) -> Option<u32> {
        self.index.leave_days_needed(start, trip_days)
    }

    /// Scores every start date whose trip fits inside the year, in date order.
    ///
    /// Start dates whose trip needs no leave are left out. A trip length of zero
    /// or longer than the year gives an empty table.
    #[tracing::instrument(skip(self), fields(year = self.index.year()))]
    pub fn score_all_start_dates(&self, trip_days: u32) -> ScoreTable {
        let days_in_year = self.index.days_in_year();
        let len = trip_days as usize;
        let mut table = ScoreTable::empty(self.index.year(), self.index.year_start(), days_in_year, trip_days);
        if len == 0 || len > days_in_year {
            return table;
        }

        let window = NEAR_HOLIDAY_WINDOW as usize;
        for start_index in 0..=(days_in_year - len) {
            let leave_days_needed = match self.index.leave_days_between(start_index, len) {
                Some(n) if n > 0 => n,
                _ => continue
            };
            let Some(date) = self.index.date_at(start_index) else {
                continue;
            };

            let end_index = start_index + len - 1;
            let near_start = start_index.saturating_sub(window);
            let near_end = (end_index + window).min(days_in_year - 1);
            let mut seen: HashSet<&str> = HashSet::new();
            let mut near_holidays = Vec::new();
            for i in near_start..=near_end {
                for name in self.index.holiday_names_at(i) {
                    if seen.insert(name.as_str()) {
                        near_holidays.push(name.clone());
                    }
                }
            }

            table.push(start_index, DateOptimization::new(date, trip_days, leave_days_needed, near_holidays));
        }

        debug!(trip_days, scored = table.len(), "scored start dates");
        table
    }
}

/// Scores of one scan, addressable by date.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    year: i32,
    year_start: NaiveDate,
    trip_days: u32,
    scores: Vec<DateOptimization>,
    position_by_index: Vec<Option<usize>>
}

impl ScoreTable {
    fn empty(year: i32, year_start: NaiveDate, days_in_year: usize, trip_days: u32) -> ScoreTable {
        ScoreTable {
            year,
            year_start,
            trip_days,
            scores: Vec::new(),
            position_by_index: vec![None; days_in_year]
        }
    }

    fn push(&mut self, start_index: usize, score: DateOptimization) {
        self.position_by_index[start_index] = Some(self.scores.len());
        self.scores.push(score);
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn trip_days(&self) -> u32 {
        self.trip_days
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> &[DateOptimization] {
        &self.scores
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DateOptimization> {
        self.scores.iter()
    }

    pub fn into_vec(self) -> Vec<DateOptimization> {
        self.scores
    }

    pub fn get(&self, d: NaiveDate) -> Option<&DateOptimization> {
        let offset = (d - self.year_start).num_days();
        if offset < 0 {
            return None;
        }
        self.position_by_index
            .get(offset as usize)
            .copied()
            .flatten()
            .map(|position| &self.scores[position])
    }

    /// The `n` most efficient start dates, earliest first among equals.
    pub fn top(&self, n: usize) -> Vec<&DateOptimization> {
        let mut ranked: Vec<&DateOptimization> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.efficiency().total_cmp(&a.efficiency()));
        ranked.truncate(n);
        ranked
    }

    /// Looks within five days either side of `selected_start` for a start date
    /// whose efficiency beats the selection's by more than 0.5.
    ///
    /// Offsets for which `is_disabled` holds, or whose date is already a
    /// booked day of one of `booked`, are skipped. The selection counts as efficiency 0 when it
    /// has no score. Among qualifying dates the most efficient wins; equal
    /// efficiencies keep the earliest offset.
    pub fn find_better_nearby<F>(
        &self,
        selected_start: NaiveDate,
        is_disabled: F,
        booked: &[RangeOfDates]
    ) -> Option<BetterDateSuggestion>
        where F: Fn(NaiveDate) -> bool {
        let current = self.get(selected_start);
        let current_efficiency = current.map_or(0.0, |s| s.efficiency());
        let current_leave_days_needed = current.map_or(0, |s| s.leave_days_needed());

        let mut best: Option<&DateOptimization> = None;
        for offset in -NEARBY_SEARCH_DAYS..=NEARBY_SEARCH_DAYS {
            if offset == 0 {
                continue;
            }
            let Some(candidate_date) = shift_days(selected_start, offset) else {
                continue;
            };
            if is_disabled(candidate_date) {
                continue;
            }
            if booked.iter().any(|r| r.contain(candidate_date)) {
                continue;
            }
            let Some(candidate) = self.get(candidate_date) else {
                continue;
            };
            if candidate.efficiency() <= current_efficiency + IMPROVEMENT_THRESHOLD {
                continue;
            }
            if best.is_none_or(|b| candidate.efficiency() > b.efficiency()) {
                best = Some(candidate);
            }
        }

        let best = best?;
        Some(BetterDateSuggestion {
            suggested_date: best.date(),
            suggested_end_date: trip_end_date(best.date(), self.trip_days)?,
            current_efficiency,
            suggested_efficiency: best.efficiency(),
            current_leave_days_needed,
            suggested_score: best.clone()
        })
    }
}

impl<'a> IntoIterator for &'a ScoreTable {
    type Item = &'a DateOptimization;
    type IntoIter = std::slice::Iter<'a, DateOptimization>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.iter()
    }
}

/// A nearby start date that spends noticeably less leave than the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetterDateSuggestion {
    suggested_date: NaiveDate,
    suggested_end_date: NaiveDate,
    current_efficiency: f64,
    suggested_efficiency: f64,
    current_leave_days_needed: u32,
    suggested_score: DateOptimization
}

impl BetterDateSuggestion {
    pub fn suggested_date(&self) -> NaiveDate {
        self.suggested_date
    }

    pub fn suggested_end_date(&self) -> NaiveDate {
        self.suggested_end_date
    }

    pub fn current_efficiency(&self) -> f64 {
        self.current_efficiency
    }

    pub fn suggested_efficiency(&self) -> f64 {
        self.suggested_efficiency
    }

    pub fn current_leave_days_needed(&self) -> u32 {
        self.current_leave_days_needed
    }

    pub fn suggested_score(&self) -> &DateOptimization {
        &self.suggested_score
    }
}
