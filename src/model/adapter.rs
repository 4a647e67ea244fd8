// File: src/model/adapter.rs
use crate::civil::{SOURCE_TZID, zoned_property};
use crate::error::TranscodeError;
use crate::model::event::{RawEvent, RawStart, TransformedEvent};
use chrono::{DateTime, Utc};
use icalendar::{Calendar, CalendarComponent, Component};

const MAX_LINE_OCTETS: usize = 75;

// Rules in force since 2008: AEDT from the first Sunday of October,
// AEST from the first Sunday of April.
const MELBOURNE_VTIMEZONE: &[&str] = &[
    "BEGIN:VTIMEZONE",
    "TZID:Australia/Melbourne",
    "BEGIN:STANDARD",
    "DTSTART:20080406T030000",
    "RRULE:FREQ=YEARLY;BYMONTH=4;BYDAY=1SU",
    "TZNAME:AEST",
    "TZOFFSETFROM:+1100",
    "TZOFFSETTO:+1000",
    "END:STANDARD",
    "BEGIN:DAYLIGHT",
    "DTSTART:20081005T020000",
    "RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=1SU",
    "TZNAME:AEDT",
    "TZOFFSETFROM:+1000",
    "TZOFFSETTO:+1100",
    "END:DAYLIGHT",
    "END:VTIMEZONE",
];

/// Parses an upstream calendar into its VEVENTs, in document order.
///
/// Events keep whatever they had: missing UIDs or starts are left as `None`
/// for the caller to drop. Only an input that is not a calendar at all fails.
pub fn parse_calendar(raw_ics: &str) -> Result<Vec<RawEvent>, TranscodeError> {
    if raw_ics.trim().is_empty() {
        return Err(TranscodeError::Empty);
    }
    if !raw_ics.contains("BEGIN:VCALENDAR") {
        return Err(TranscodeError::MissingEnvelope);
    }

    let calendar: Calendar = raw_ics
        .parse()
        .map_err(|e| TranscodeError::Parse(format!("{}", e)))?;

    let mut events = Vec::with_capacity(calendar.components.len());
    for component in &calendar.components {
        let CalendarComponent::Event(event) = component else {
            continue;
        };
        let props = event.properties();

        let uid = props
            .get("UID")
            .map(|p| p.value().to_string())
            .filter(|v| !v.trim().is_empty());

        // icalendar has already decoded TEXT escapes; decoding again would
        // turn an escaped backslash followed by `n` into a line break.
        let title = props
            .get("SUMMARY")
            .map(|p| p.value().to_string())
            .unwrap_or_default();

        let location = props
            .get("LOCATION")
            .map(|p| p.value().to_string())
            .filter(|v| !v.trim().is_empty());

        let start = props.get("DTSTART").map(|p| RawStart {
            value: p.value().to_string(),
            tzid: p.params().get("TZID").map(|t| t.value().to_string()),
        });

        events.push(RawEvent {
            uid,
            title,
            start,
            location,
        });
    }

    Ok(events)
}

/// Serializes transformed events into a complete calendar document.
pub fn to_ics(
    events: &[TransformedEvent],
    product_id: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::with_capacity(1024 + events.len() * 512);

    push_line(&mut output, "BEGIN:VCALENDAR");
    push_line(&mut output, "VERSION:2.0");
    push_line(&mut output, &format!("PRODID:{}", product_id));
    push_line(&mut output, "CALSCALE:GREGORIAN");
    push_line(&mut output, "METHOD:PUBLISH");
    for line in MELBOURNE_VTIMEZONE {
        push_line(&mut output, line);
    }

    let stamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();
    for event in events {
        push_line(&mut output, "BEGIN:VEVENT");
        // UID is written back byte-for-byte; publishing keys updates on it.
        push_line(&mut output, &format!("UID:{}", event.uid));
        push_line(&mut output, &format!("DTSTAMP:{}", stamp));
        push_line(
            &mut output,
            &zoned_property("DTSTART", &event.start, SOURCE_TZID),
        );
        push_line(&mut output, &zoned_property("DTEND", &event.end, SOURCE_TZID));
        push_line(
            &mut output,
            &format!("SUMMARY:{}", escape_text(&event.title)),
        );
        push_line(
            &mut output,
            &format!("DESCRIPTION:{}", escape_text(&event.description)),
        );
        if let Some(location) = &event.location {
            push_line(&mut output, &format!("LOCATION:{}", escape_text(location)));
        }
        push_line(&mut output, "END:VEVENT");
    }

    push_line(&mut output, "END:VCALENDAR");
    output
}

/// Appends one content line, folded at 75 octets, CRLF terminated.
fn push_line(buffer: &mut String, line: &str) {
    let mut used = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if used + len > MAX_LINE_OCTETS {
            buffer.push_str("\r\n ");
            used = 1;
        }
        buffer.push(ch);
        used += len;
    }
    buffer.push_str("\r\n");
}

pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
