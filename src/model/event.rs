// File: ./src/model/event.rs
use crate::civil::CivilDateTime;

/// DTSTART exactly as the source wrote it.
///
/// The literal is kept instead of a parsed instant so the wall-clock fields
/// reach the civil-time resolver unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStart {
    pub value: String,
    pub tzid: Option<String>,
}

/// One VEVENT as parsed from the upstream calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub uid: Option<String>,
    pub title: String,
    pub start: Option<RawStart>,
    pub location: Option<String>,
}

/// A VEVENT ready to be written back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedEvent {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub start: CivilDateTime,
    pub end: CivilDateTime,
    pub location: Option<String>,
}
