use chrono::{
    Days,
    NaiveDate
};
use serde::{
    Serialize,
    Deserialize
};

use crate::time::utility::trip_end_date;

/// Closed range of calendar days `[start_date, end_date]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOfDates {
    start_date: NaiveDate,
    end_date: NaiveDate
}

impl RangeOfDates {
    pub fn new(d1: NaiveDate, d2: NaiveDate) -> RangeOfDates {
        if d1 > d2 {
            RangeOfDates {start_date: d2, end_date: d1}
        } else {
            RangeOfDates {start_date: d1, end_date: d2}
        }
    }

    /// The days covered by a trip of `trip_days` days starting on `start`.
    pub fn from_trip(start: NaiveDate, trip_days: u32) -> Option<RangeOfDates> {
        trip_end_date(start, trip_days).map(|end| RangeOfDates::new(start, end))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn len(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1) as usize
    }

    pub fn contain(&self, d: NaiveDate) -> bool {
        (d >= self.start_date) && (d <= self.end_date)
    }

    /// Inclusive-bounds intersection test: ranges sharing a single boundary day overlap.
    pub fn overlaps(&self, other: &RangeOfDates) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    /// Whether this range overlaps any of `booked`.
    pub fn conflicts_with<'a, I>(&self, booked: I) -> bool
        where I: IntoIterator<Item = &'a RangeOfDates> {
        booked.into_iter().any(|r| self.overlaps(r))
    }

    pub fn iter(&self) -> RangeOfDatesIterator<'_> {
        RangeOfDatesIterator {
            range_of_dates: self,
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<NaiveDate> {
        self.iter().collect()
    }
}

pub struct RangeOfDatesIterator<'a> {
    range_of_dates: &'a RangeOfDates,
    index: usize,
}

impl<'a> Iterator for RangeOfDatesIterator<'a> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.range_of_dates.len() {
            let result = self.range_of_dates.start_date() + Days::new(self.index as u64);
            self.index += 1;
            Some(result)
        } else {
            None
        }
    }
}
