// File: ./src/error.rs
// Typed errors for the transformation core. Application code wraps these in anyhow.
use thiserror::Error;

/// Failure to compute a valid end time. Skippable: the caller drops the event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CivilTimeError {
    #[error("unparseable wall-clock value '{0}'")]
    Unparseable(String),
    #[error("match duration must be positive, got {0} minutes")]
    NonPositiveDuration(i64),
    #[error("end {end} is not after start {start}")]
    NotAfterStart { start: String, end: String },
    #[error("end time overflows the calendar range")]
    OutOfRange,
}

/// Document-level failure. Fatal for a single `transcode` call.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("input is empty")]
    Empty,
    #[error("input has no VCALENDAR envelope")]
    MissingEnvelope,
    #[error("calendar parse failed: {0}")]
    Parse(String),
}

/// Malformed rule table entry. Fatal at compile time of the rule set.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid {stage} pattern '{pattern}': {source}")]
    InvalidPattern {
        stage: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
