use hifitime::Epoch;
use std::str::FromStr;

use crate::{
    aacgm_errors::AacgmError,
    constants::{FractionalYear, SECONDS_PER_DAY},
};

/// Calendar date and time of day (UTC, whole seconds) used as the epoch of every conversion.
///
/// An `Instant` built from a date alone is always at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instant {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

/// Any date-like value accepted at the public boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    /// Calendar date, promoted to midnight
    Date { year: i32, month: u8, day: u8 },
    DateTime {
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
    Epoch(Epoch),
    /// ISO 8601 text, `YYYY-MM-DD` or anything [`hifitime::Epoch`] parses
    Text(String),
    Resolved(Instant),
}

impl From<(i32, u8, u8)> for TimeInput {
    fn from((year, month, day): (i32, u8, u8)) -> Self {
        TimeInput::Date { year, month, day }
    }
}

impl From<(i32, u8, u8, u8, u8, u8)> for TimeInput {
    fn from((year, month, day, hour, minute, second): (i32, u8, u8, u8, u8, u8)) -> Self {
        TimeInput::DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl From<Epoch> for TimeInput {
    fn from(epoch: Epoch) -> Self {
        TimeInput::Epoch(epoch)
    }
}

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        TimeInput::Text(text.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(text: String) -> Self {
        TimeInput::Text(text)
    }
}

impl From<Instant> for TimeInput {
    fn from(instant: Instant) -> Self {
        TimeInput::Resolved(instant)
    }
}

impl From<&Instant> for TimeInput {
    fn from(instant: &Instant) -> Self {
        TimeInput::Resolved(*instant)
    }
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

fn days_before_month(year: i32, month: u8) -> u32 {
    const CUMULATIVE: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let leap = u32::from(month > 2 && is_leap_year(year));
    CUMULATIVE[usize::from(month - 1)] + leap
}

impl Instant {
    /// Build a validated instant from its Gregorian components.
    ///
    /// Time of day must lie within 00:00:00..=23:59:59; month/day ranges and leap days are
    /// checked by [`Epoch::maybe_from_gregorian_utc`].
    pub fn from_gregorian(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, AacgmError> {
        // hifitime accepts 24:00:00 and leap second 60, neither has a place on the calendar day
        if hour > 23 || minute > 59 || second > 59 {
            return Err(AacgmError::InvalidTime(format!(
                "{hour:02}:{minute:02}:{second:02} is not a valid time of day"
            )));
        }
        Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0)
            .map_err(|err| AacgmError::InvalidTime(err.to_string()))?;

        Ok(Instant {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Midnight of the given date.
    pub fn from_date(year: i32, month: u8, day: u8) -> Result<Self, AacgmError> {
        Instant::from_gregorian(year, month, day, 0, 0, 0)
    }

    /// Build an instant from a year and the (whole) seconds elapsed since January 1st, 00:00.
    pub fn from_year_seconds(year: i32, seconds_of_year: u32) -> Result<Self, AacgmError> {
        let days = seconds_of_year / SECONDS_PER_DAY as u32;
        if days >= days_in_year(year) {
            return Err(AacgmError::InvalidTime(format!(
                "{seconds_of_year} seconds exceed the length of year {year}"
            )));
        }
        // Whole days are counted on the calendar, not on the UTC time line, so leap
        // seconds never shift the result.
        let month = (1..=12u8)
            .rev()
            .find(|&m| days_before_month(year, m) <= days)
            .unwrap_or(1);
        let day = days - days_before_month(year, month) + 1;
        let seconds = seconds_of_year % SECONDS_PER_DAY as u32;

        Instant::from_gregorian(
            year,
            month,
            day as u8,
            (seconds / 3600) as u8,
            (seconds % 3600 / 60) as u8,
            (seconds % 60) as u8,
        )
    }

    /// Truncate an [`Epoch`] to whole UTC seconds.
    pub fn from_epoch(epoch: Epoch) -> Result<Self, AacgmError> {
        let (year, month, day, hour, minute, second, _) = epoch.to_gregorian_utc();
        Instant::from_gregorian(year, month, day, hour, minute, second)
    }

    /// Resolve any date-like input into an [`Instant`].
    ///
    /// Arguments
    /// ---------
    /// * `input`: a date (promoted to midnight), a date-time, a [`hifitime::Epoch`], or ISO 8601 text
    ///
    /// Return
    /// ------
    /// * the resolved instant, or [`AacgmError::InvalidTime`] if the value is not a valid date
    pub fn resolve(input: impl Into<TimeInput>) -> Result<Self, AacgmError> {
        match input.into() {
            TimeInput::Date { year, month, day } => Instant::from_date(year, month, day),
            TimeInput::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => Instant::from_gregorian(year, month, day, hour, minute, second),
            TimeInput::Epoch(epoch) => Instant::from_epoch(epoch),
            TimeInput::Text(text) => Instant::parse_text(&text),
            TimeInput::Resolved(instant) => Ok(instant),
        }
    }

    fn parse_text(text: &str) -> Result<Self, AacgmError> {
        let text = text.trim();
        let parts: Vec<&str> = text.split('-').collect();

        // Date only: YYYY-MM-DD
        if parts.len() == 3 && text.len() == 10 {
            let invalid = || AacgmError::InvalidTime(text.to_string());
            let year = i32::from_str(parts[0]).map_err(|_| invalid())?;
            let month = u8::from_str(parts[1]).map_err(|_| invalid())?;
            let day = u8::from_str(parts[2]).map_err(|_| invalid())?;
            return Instant::from_date(year, month, day);
        }

        let epoch =
            Epoch::from_str(text).map_err(|err| AacgmError::InvalidTime(format!("{text}: {err}")))?;
        Instant::from_epoch(epoch)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Day of year, 1 for January 1st.
    pub fn day_of_year(&self) -> u32 {
        days_before_month(self.year, self.month) + u32::from(self.day)
    }

    pub fn seconds_of_day(&self) -> u32 {
        u32::from(self.hour) * 3600 + u32::from(self.minute) * 60 + u32::from(self.second)
    }

    /// Decimal year used to interpolate the IGRF coefficients.
    ///
    /// The time of day is ignored and the day of year is divided by the actual number of
    /// days of the calendar year, so January 1st is `year + 1/365` (or `1/366`) and
    /// December 31st is `year + 1`.
    pub fn fractional_year(&self) -> FractionalYear {
        f64::from(self.year) + f64::from(self.day_of_year()) / f64::from(days_in_year(self.year))
    }

    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
    }
}

impl std::fmt::Display for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
