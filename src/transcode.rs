// File: ./src/transcode.rs
/*! Calendar transcoder: upstream fixture calendar in, cleaned calendar out.

`transcode` is a pure function of its inputs. It parses the document, runs a
single pre-pass for the highest regular round, then rewrites, classifies and
re-times every event in input order. Events that cannot be emitted correctly
are logged and dropped; a document that cannot be parsed fails the call.
*/

use crate::civil::{CivilDateTime, SOURCE_TZID, resolve_end};
use crate::config::{DEFAULT_PRODUCT_ID, DEFAULT_ROUND_BASE_URL, Settings};
use crate::error::TranscodeError;
use crate::model::adapter;
use crate::model::{RawEvent, RosterEntry, TransformedEvent};
use crate::rewrite::RuleSet;
use crate::round::{classify_round, max_regular_round};
use chrono::{DateTime, SecondsFormat, Utc};

/// Per-run values that are not part of the roster or the rule tables.
#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    /// Stamped into DTSTAMP and the "Last Updated" line. Fixed per run so
    /// identical inputs give identical documents.
    pub generated_at: DateTime<Utc>,
    pub product_id: String,
    pub round_base_url: String,
    pub calendars_homepage: Option<String>,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            generated_at: Utc::now(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            round_base_url: DEFAULT_ROUND_BASE_URL.to_string(),
            calendars_homepage: None,
        }
    }
}

impl TranscodeOptions {
    pub fn from_settings(settings: &Settings, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            product_id: settings.product_id.clone(),
            round_base_url: settings.round_base_url.clone(),
            calendars_homepage: settings.calendars_homepage.clone(),
        }
    }
}

/// Result of one successful `transcode` call.
#[derive(Debug, Clone)]
pub struct Transcoded {
    pub document: String,
    pub events: Vec<TransformedEvent>,
    pub dropped: usize,
    pub max_regular_round: u32,
}

impl Transcoded {
    pub fn retained(&self) -> usize {
        self.events.len()
    }
}

/// Builds the DESCRIPTION block with fixture, ladder and round links.
pub fn build_description(
    entry: &RosterEntry,
    round: Option<u32>,
    options: &TranscodeOptions,
) -> String {
    let mut description = format!("Full Fixture: {}\n\n", entry.source_team_ref);

    if let Some(ladder) = &entry.ladder_ref {
        description.push_str(&format!("Ladder: {}\n\n", ladder));
    }

    if let Some(round) = round
        && let Some(competition_id) = entry.competition_id()
    {
        description.push_str(&format!(
            "Current Round: {}{}/round/{}\n",
            options.round_base_url, competition_id, round
        ));
    }

    if let Some(homepage) = &options.calendars_homepage {
        description.push_str(&format!("\n\nCalendars Homepage: {}\n", homepage));
    }

    description.push_str(&format!(
        "\n\nLast Updated: {}",
        options
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    description
}

fn describe(event: &RawEvent) -> &str {
    if event.title.is_empty() {
        "Unknown"
    } else {
        &event.title
    }
}

fn transform_event(
    event: &RawEvent,
    entry: &RosterEntry,
    rules: &RuleSet,
    max_round: u32,
    options: &TranscodeOptions,
) -> Option<TransformedEvent> {
    let (Some(uid), Some(raw_start)) = (&event.uid, &event.start) else {
        log::warn!(
            "Skipping event missing required fields: {}",
            describe(event)
        );
        return None;
    };

    if let Some(tzid) = &raw_start.tzid
        && tzid != SOURCE_TZID
    {
        log::debug!(
            "Event {} asserts TZID {}, treating it as {} wall-clock time",
            uid,
            tzid,
            SOURCE_TZID
        );
    }

    let start = match CivilDateTime::parse_literal(&raw_start.value) {
        Ok(start) => start,
        Err(e) => {
            log::warn!(
                "Skipping event with invalid start date: {} - {}",
                describe(event),
                e
            );
            return None;
        }
    };

    let title = rules.rewrite(&event.title);
    let round = classify_round(&event.title, max_round);
    let description = build_description(entry, round, options);

    let duration = entry
        .match_duration_minutes
        .or_else(|| rules.duration_for(&event.title))
        .unwrap_or_else(|| entry.duration_minutes());

    let end = match resolve_end(start, duration) {
        Ok(end) => end,
        Err(e) => {
            log::warn!(
                "Skipping event with invalid time range: {} - {}",
                title,
                e
            );
            return None;
        }
    };

    Some(TransformedEvent {
        uid: uid.clone(),
        title,
        description,
        start,
        end,
        location: event.location.clone(),
    })
}

/// Transforms one upstream calendar document for `entry`.
pub fn transcode(
    raw_ics: &str,
    entry: &RosterEntry,
    rules: &RuleSet,
    options: &TranscodeOptions,
) -> Result<Transcoded, TranscodeError> {
    log::info!("Processing calendar: {}", entry.name);

    let raw_events = adapter::parse_calendar(raw_ics)?;
    let max_round = max_regular_round(raw_events.iter().map(|e| e.title.as_str()));

    let mut events = Vec::with_capacity(raw_events.len());
    for raw in &raw_events {
        if let Some(event) = transform_event(raw, entry, rules, max_round, options) {
            events.push(event);
        }
    }

    let dropped = raw_events.len() - events.len();
    if dropped > 0 {
        log::warn!(
            "{}: dropped {} of {} events",
            entry.name,
            dropped,
            raw_events.len()
        );
    }
    log::info!(
        "{}: {} events (highest regular round {})",
        entry.name,
        events.len(),
        max_round
    );

    let document = adapter::to_ics(&events, &options.product_id, options.generated_at);
    Ok(Transcoded {
        document,
        events,
        dropped,
        max_regular_round: max_round,
    })
}
