use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{
    NaiveDate,
    Weekday
};
use serde::{
    Serialize,
    Deserialize
};
use tracing::debug;

use crate::plannererror::PlannerError;
use crate::time::calendar::leavecalendar::LeaveCalendar;
use crate::time::holiday::holiday::Holiday;
use crate::time::holiday::weekendadjustment::WeekendAdjustment;
use crate::time::holiday::weekendmask::WeekendMask;

pub const DEFAULT_YEAR: i32 = 2026;
pub const DEFAULT_ANNUAL_LEAVE: u32 = 18;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// Planner settings: the year being planned, the leave allowance, what counts
/// as a weekend and the public holidays as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default = "default_year")]
    year: i32,
    #[serde(default = "default_annual_leave")]
    annual_leave: u32,
    #[serde(default = "default_weekends")]
    weekends: HashSet<Weekday>,
    #[serde(default)]
    weekend_adjustment: WeekendAdjustment,
    #[serde(default = "default_holidays")]
    holidays: Vec<Holiday>
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

fn default_annual_leave() -> u32 {
    DEFAULT_ANNUAL_LEAVE
}

fn default_weekends() -> HashSet<Weekday> {
    WeekendMask::default().to_hashset()
}

fn holiday(year: i32, month: u32, day: u32, name: &str) -> Option<Holiday> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| Holiday::new(d, name))
}

/// Singapore public holidays of 2026, as gazetted (before observed-day shifts).
pub fn default_holidays() -> Vec<Holiday> {
    [
        holiday(2026, 1, 1, "New Year's Day"),
        holiday(2026, 2, 17, "Chinese New Year"),
        holiday(2026, 2, 18, "Chinese New Year"),
        holiday(2026, 3, 21, "Hari Raya Puasa"),
        holiday(2026, 4, 3, "Good Friday"),
        holiday(2026, 5, 1, "Labour Day"),
        holiday(2026, 5, 27, "Hari Raya Haji"),
        holiday(2026, 5, 31, "Vesak Day"),
        holiday(2026, 8, 9, "National Day"),
        holiday(2026, 11, 8, "Deepavali"),
        holiday(2026, 12, 25, "Christmas Day"),
    ]
    .into_iter()
    .flatten()
    .collect()
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            year: DEFAULT_YEAR,
            annual_leave: DEFAULT_ANNUAL_LEAVE,
            weekends: default_weekends(),
            weekend_adjustment: WeekendAdjustment::NextWeekday,
            holidays: default_holidays()
        }
    }

    /// Same weekend rules for another year, allowance and holiday list.
    pub fn with_year(&self, year: i32, annual_leave: u32, holidays: Vec<Holiday>) -> Result<Configuration, PlannerError> {
        let config = Configuration {
            year,
            annual_leave,
            weekends: self.weekends.clone(),
            weekend_adjustment: self.weekend_adjustment,
            holidays
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<P>(file_path: P) -> Result<Configuration, PlannerError>
        where P: AsRef<Path> {
        let file = File::open(file_path.as_ref())?;
        let reader = BufReader::new(file);
        let config: Configuration = serde_json::from_reader(reader)?;
        config.validate()?;
        debug!(path = %file_path.as_ref().display(), year = config.year, "loaded configuration");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, PlannerError> {
        let config: Configuration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(PlannerError::invalid_configuration(format!(
                "year {} outside {MIN_YEAR}..={MAX_YEAR}", self.year
            )));
        }
        if self.annual_leave > 366 {
            return Err(PlannerError::invalid_configuration(format!(
                "annual leave of {} days exceeds a year", self.annual_leave
            )));
        }
        if self.weekends.len() >= 7 {
            return Err(PlannerError::invalid_configuration("every day is a weekend"));
        }
        if let Some(h) = self.holidays.iter().find(|h| h.name().trim().is_empty()) {
            return Err(PlannerError::invalid_configuration(format!("holiday on {} has no name", h.date())));
        }
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn annual_leave(&self) -> u32 {
        self.annual_leave
    }

    pub fn weekends(&self) -> &HashSet<Weekday> {
        &self.weekends
    }

    pub fn weekend_adjustment(&self) -> WeekendAdjustment {
        self.weekend_adjustment
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Calendar of these settings for the given holidays.
    pub fn calendar_with(&self, holidays: Vec<Holiday>) -> LeaveCalendar {
        LeaveCalendar::new(self.weekends.clone(), self.weekend_adjustment, holidays)
    }
}
