//! Calendar file generation for a single extracted event.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use icalendar::{Calendar, Component, EventLike};
use uuid::Uuid;

use crate::error::IcsError;
use crate::models::event::EventRecord;

pub const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Events carry no length signal, so every event is one hour long.
pub const DEFAULT_EVENT_LENGTH_MINUTES: i64 = 60;

const FALLBACK_FILE_STEM: &str = "event";

/// Computes the local start and end of the event.
///
/// With no start time the event starts at midnight on the start date.
pub fn event_window(record: &EventRecord) -> Result<(NaiveDateTime, NaiveDateTime), IcsError> {
    let (_, date) = required_fields(record)?;
    let date = parse_date(date)?;
    let time = match record.start_time.as_deref() {
        Some(raw) => parse_time(raw)?,
        None => NaiveTime::MIN,
    };
    let start = date.and_time(time);
    let end = start
        .checked_add_signed(Duration::minutes(DEFAULT_EVENT_LENGTH_MINUTES))
        .ok_or_else(|| IcsError::DateParse {
            field: "startDate",
            value: date.to_string(),
        })?;
    Ok((start, end))
}

/// Generate .ics content holding one VEVENT for the record.
pub fn generate_ics(record: &EventRecord, calendar_name: &str) -> Result<String, IcsError> {
    let (title, _) = required_fields(record)?;
    let (start, end) = event_window(record)?;

    let mut cal = Calendar::new();
    cal.name(calendar_name);

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&Uuid::new_v4().to_string());
    ics_event.add_property("DTSTAMP", Utc::now().format("%Y%m%dT%H%M%SZ").to_string());
    // Floating times: wall clock with no Z and no TZID
    ics_event.add_property("DTSTART", start.format("%Y%m%dT%H%M%S").to_string());
    ics_event.add_property("DTEND", end.format("%Y%m%dT%H%M%S").to_string());
    ics_event.summary(title);

    if let Some(ref loc) = record.location {
        ics_event.location(loc);
    }
    if let Some(ref desc) = record.description {
        ics_event.description(desc);
    }

    cal.push(ics_event.done());
    Ok(cal.done().to_string())
}

/// File name offered when the calendar file is downloaded or saved.
pub fn download_filename(record: &EventRecord) -> String {
    let stem: String = record
        .title
        .as_deref()
        .unwrap_or(FALLBACK_FILE_STEM)
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}.ics")
    } else {
        format!("{stem}.ics")
    }
}

fn required_fields(record: &EventRecord) -> Result<(&str, &str), IcsError> {
    let title = record.title.as_deref().filter(|t| !t.trim().is_empty());
    let date = record.start_date.as_deref().filter(|d| !d.trim().is_empty());
    match (title, date) {
        (Some(title), Some(date)) => Ok((title, date)),
        _ => Err(IcsError::IncompleteRecord),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, IcsError> {
    let invalid = || IcsError::DateParse {
        field: "startDate",
        value: raw.to_string(),
    };
    let parts = numeric_parts(raw.trim(), '-').ok_or_else(invalid)?;
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };
    let year = i32::try_from(*year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, *month, *day).ok_or_else(invalid)
}

fn parse_time(raw: &str) -> Result<NaiveTime, IcsError> {
    let invalid = || IcsError::DateParse {
        field: "startTime",
        value: raw.to_string(),
    };
    let parts = numeric_parts(raw.trim(), ':').ok_or_else(invalid)?;
    let [hour, minute, ..] = parts.as_slice() else {
        return Err(invalid());
    };
    NaiveTime::from_hms_opt(*hour, *minute, 0).ok_or_else(invalid)
}

fn numeric_parts(raw: &str, separator: char) -> Option<Vec<u32>> {
    raw.split(separator)
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            part.parse::<u32>().ok()
        })
        .collect()
}
