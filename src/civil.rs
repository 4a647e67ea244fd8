// File: ./src/civil.rs
/*! Civil (wall-clock) time handling for fixture start and end times.

The upstream calendar asserts each start as a local wall-clock value in
`Australia/Melbourne`. Values are kept as `NaiveDateTime` end to end: the
end time is plain calendar arithmetic on the wall-clock fields and is never
routed through a UTC instant, so a match on a DST changeover weekend keeps
the times printed on the fixture.

A trailing `Z` on the source value is ignored. The upstream feed appends it
to local values.
*/

use crate::error::CivilTimeError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// Zone every source calendar asserts, and the zone we re-emit in.
pub const SOURCE_TZID: &str = "Australia/Melbourne";

const WIRE_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A wall-clock date and time with no offset attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime(NaiveDateTime);

impl CivilDateTime {
    pub fn new(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(Self)
    }

    /// Parses the literal DTSTART/DTEND text (`YYYYMMDDTHHMMSS`, optional `Z`).
    pub fn parse_literal(value: &str) -> Result<Self, CivilTimeError> {
        let trimmed = value.trim();
        let literal = trimmed
            .strip_suffix('Z')
            .or_else(|| trimmed.strip_suffix('z'))
            .unwrap_or(trimmed);

        NaiveDateTime::parse_from_str(literal, WIRE_FORMAT)
            .map(Self)
            .map_err(|_| CivilTimeError::Unparseable(value.to_string()))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Adds `duration_minutes` to the wall-clock fields with normal carrying.
pub fn resolve_end(
    start: CivilDateTime,
    duration_minutes: i64,
) -> Result<CivilDateTime, CivilTimeError> {
    if duration_minutes <= 0 {
        return Err(CivilTimeError::NonPositiveDuration(duration_minutes));
    }

    let delta = Duration::try_minutes(duration_minutes).ok_or(CivilTimeError::OutOfRange)?;
    let end = start
        .0
        .checked_add_signed(delta)
        .ok_or(CivilTimeError::OutOfRange)?;

    if end <= start.0 {
        return Err(CivilTimeError::NotAfterStart {
            start: start.to_string(),
            end: end.format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    Ok(CivilDateTime(end))
}

/// Renders the local-time wire value, without a trailing `Z`.
pub fn format_civil(civil: &CivilDateTime) -> String {
    civil.0.format(WIRE_FORMAT).to_string()
}

/// Full content line for a zoned date-time property, e.g.
/// `DTSTART;TZID=Australia/Melbourne:20250405T143000`.
pub fn zoned_property(name: &str, civil: &CivilDateTime, tzid: &str) -> String {
    format!("{};TZID={}:{}", name, tzid, format_civil(civil))
}
