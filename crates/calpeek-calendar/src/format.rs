//! Plain-text rendering of calendars and events.

use calpeek_core::Locale;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::labels::Labels;
use crate::types::{Calendar, Event, EventTime, Person};

const RULE_WIDTH: usize = 60;

/// Render every field of an event. Missing fields get a placeholder.
pub fn format_event(event: &Event, locale: Locale) -> String {
    let labels = Labels::for_locale(locale);
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = vec![
        String::new(),
        rule.clone(),
        labels.heading.to_string(),
        rule.clone(),
    ];

    push_section(
        &mut out,
        labels,
        labels.title,
        vec![text_or(event.summary.as_deref(), labels.no_title)],
    );
    push_section(
        &mut out,
        labels,
        labels.description,
        vec![text_or(event.description.as_deref(), labels.no_description)],
    );
    push_section(
        &mut out,
        labels,
        labels.location,
        vec![text_or(event.location.as_deref(), labels.none)],
    );
    push_section(
        &mut out,
        labels,
        labels.start,
        vec![format_timestamp(
            event.start.as_ref().and_then(EventTime::raw),
            locale,
        )],
    );
    push_section(
        &mut out,
        labels,
        labels.end,
        vec![format_timestamp(
            event.end.as_ref().and_then(EventTime::raw),
            locale,
        )],
    );
    push_section(
        &mut out,
        labels,
        labels.created,
        vec![format_timestamp(event.created.as_deref(), locale)],
    );
    push_section(
        &mut out,
        labels,
        labels.updated,
        vec![format_timestamp(event.updated.as_deref(), locale)],
    );
    push_section(
        &mut out,
        labels,
        labels.creator,
        person_lines(event.creator.as_ref(), labels),
    );
    push_section(
        &mut out,
        labels,
        labels.organizer,
        person_lines(event.organizer.as_ref(), labels),
    );

    let attendees_heading = format!(
        "{} ({}{})",
        labels.attendees,
        event.attendees.len(),
        labels.people_suffix
    );
    push_section(&mut out, labels, &attendees_heading, attendee_lines(event, labels));

    let status = event
        .event_status()
        .map(|s| labels.event_status(&s).to_string())
        .unwrap_or_else(|| labels.unknown.to_string());
    push_section(&mut out, labels, labels.status, vec![status]);
    push_section(
        &mut out,
        labels,
        labels.event_id,
        vec![text_or(Some(event.id.as_str()), labels.unknown)],
    );
    push_section(
        &mut out,
        labels,
        labels.link,
        vec![text_or(event.html_link.as_deref(), labels.none)],
    );

    let recurrence = if event.recurrence.is_empty() {
        vec![labels.none.to_string()]
    } else {
        event.recurrence.clone()
    };
    push_section(&mut out, labels, labels.recurrence, recurrence);
    if let Some(series) = event.recurring_event_id.as_deref().filter(|s| !s.is_empty()) {
        push_section(&mut out, labels, labels.series, vec![series.to_string()]);
    }

    out.push(String::new());
    out.push(rule);
    out.join("\n")
}

fn push_section(out: &mut Vec<String>, labels: &Labels, name: &str, lines: Vec<String>) {
    out.push(String::new());
    out.push(format!(
        "{}{}{}",
        labels.section_open, name, labels.section_close
    ));
    out.extend(lines.into_iter().map(|line| format!("  {}", line)));
}

fn attendee_lines(event: &Event, labels: &Labels) -> Vec<String> {
    if event.attendees.is_empty() {
        return vec![labels.none.to_string()];
    }

    event
        .attendees
        .iter()
        .map(|attendee| {
            let name = attendee
                .display_name
                .as_deref()
                .or(attendee.email.as_deref())
                .unwrap_or(labels.unknown);
            let response = attendee.response();
            let mut line = format!("- {} ({})", name, labels.response(&response));
            if attendee.optional {
                line.push_str(&format!(" [{}]", labels.optional));
            }
            line
        })
        .collect()
}

/// One line of the search result list: `n. title (start)`.
pub fn format_event_line(number: usize, event: &Event, locale: Locale) -> String {
    let labels = Labels::for_locale(locale);
    format!(
        "{}. {} ({})",
        number,
        text_or(event.summary.as_deref(), labels.no_title),
        event
            .start
            .as_ref()
            .and_then(EventTime::raw)
            .unwrap_or(labels.unknown)
    )
}

/// One line of the calendar list: `n. name (ID: id)`.
pub fn format_calendar_line(number: usize, calendar: &Calendar) -> String {
    format!("{}. {} (ID: {})", number, calendar.display_name, calendar.id)
}

/// Render an API timestamp in its own offset.
///
/// Date-only values render without a time. Anything unparseable is returned
/// unchanged.
pub fn format_timestamp(raw: Option<&str>, locale: Locale) -> String {
    let labels = Labels::for_locale(locale);
    let raw = match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => raw,
        None => return labels.unknown.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(labels.datetime_format).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(labels.datetime_format).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(labels.date_format).to_string();
    }

    tracing::debug!("Unparseable timestamp {:?}, printing as is", raw);
    raw.to_string()
}

fn text_or(value: Option<&str>, placeholder: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// Name (display name, else email), plus the email when both exist.
fn person_lines(person: Option<&Person>, labels: &Labels) -> Vec<String> {
    let Some(person) = person else {
        return vec![labels.unknown.to_string()];
    };

    let name = person
        .display_name
        .as_deref()
        .or(person.email.as_deref())
        .unwrap_or(labels.unknown);
    let mut lines = vec![name.to_string()];

    if let (Some(_), Some(email)) = (&person.display_name, &person.email) {
        lines.push(format!("{}: {}", labels.email, email));
    }
    lines
}
