//! ISO-8601 week arithmetic used to bucket callsheet entries.
//!
//! Weeks run Monday to Sunday. A [`WeekId`] names the ISO week a date
//! falls into, and its year is the ISO year (the year of that week's
//! Thursday), which is not always the calendar year of the date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid week identifier '{0}', expected YYYY-Www")]
    InvalidWeekId(String),
}

/// Week identifier of the form `YYYY-Www`, e.g. `2024-W01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|_| Self { year, week })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// First day (Monday) of the week.
    pub fn monday(&self) -> NaiveDate {
        // Only constructed through `new`/`week_identifier`, both of which
        // guarantee the ISO year/week pair exists.
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or_default()
    }

    /// Last day (Sunday) of the week.
    pub fn sunday(&self) -> NaiveDate {
        self.monday() + Duration::days(6)
    }

    pub fn next(&self) -> Self {
        week_identifier(self.monday() + Duration::days(7))
    }

    pub fn previous(&self) -> Self {
        week_identifier(self.monday() - Duration::days(7))
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidWeekId(s.to_string());
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        WeekId::new(year, week).ok_or_else(invalid)
    }
}

impl TryFrom<String> for WeekId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(id: WeekId) -> Self {
        id.to_string()
    }
}

/// Monday at or before `date`. Sunday is the last day of its week, so it
/// maps to the Monday six days earlier.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(offset))
}

/// Thursday of the Monday-start week containing `date`. Its calendar year
/// is the ISO year of the week.
fn thursday_of_week(date: NaiveDate) -> NaiveDate {
    monday_of_week(date) + Duration::days(3)
}

/// ISO-8601 week number (1..=53).
pub fn iso_week_number(date: NaiveDate) -> u32 {
    let thursday = thursday_of_week(date);
    // Ordinal of the Thursday counted from Jan 1 of its own year.
    (thursday.ordinal0() / 7) + 1
}

pub fn week_identifier(date: NaiveDate) -> WeekId {
    let monday = monday_of_week(date);
    WeekId {
        year: thursday_of_week(monday).year(),
        week: iso_week_number(monday),
    }
}

/// `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `DD/MM/YYYY`
pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse a `YYYY-MM-DD` value as produced by a date input.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(s.to_string()))
}
