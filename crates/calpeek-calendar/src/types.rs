//! Calendar API types and data structures.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Calendar metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    pub id: String,
    pub display_name: String,
}

/// Calendar event exactly as the API returned it.
///
/// Every field except `id` may be missing. Timestamps stay as the raw strings
/// so that unparseable values can still be shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub creator: Option<Person>,
    pub organizer: Option<Person>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    pub status: Option<String>,
    pub html_link: Option<String>,
    #[serde(default)]
    pub recurrence: Vec<String>,
    /// Set on single occurrences of an expanded recurring series
    pub recurring_event_id: Option<String>,
}

/// Event start or end: a date-time, or a date for all-day events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

impl EventTime {
    /// The date-time if present, else the date.
    pub fn raw(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

/// Event creator or organizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Event attendee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub response_status: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl Attendee {
    /// Missing status counts as not yet answered.
    pub fn response(&self) -> ResponseStatus {
        self.response_status
            .as_deref()
            .map(ResponseStatus::from_code)
            .unwrap_or(ResponseStatus::NeedsAction)
    }
}

/// Attendee response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
    Other(String),
}

impl ResponseStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "tentative" => Self::Tentative,
            "needsAction" => Self::NeedsAction,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Event status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
    Other(String),
}

impl EventStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "confirmed" => Self::Confirmed,
            "tentative" => Self::Tentative,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Event {
    pub fn event_status(&self) -> Option<EventStatus> {
        self.status.as_deref().map(EventStatus::from_code)
    }
}

/// Parameters for an event search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text filter; `None` lists everything in the window
    pub text: Option<String>,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    /// Maximum number of events to return
    pub limit: u32,
}

/// Search window relative to now, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub days_back: u32,
    pub days_forward: u32,
}

impl SearchWindow {
    /// `None` when either end falls outside the representable date range.
    pub fn range(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = now.checked_sub_signed(Duration::days(i64::from(self.days_back)))?;
        let end = now.checked_add_signed(Duration::days(i64::from(self.days_forward)))?;
        Some((start, end))
    }

    pub fn query(
        &self,
        now: DateTime<Utc>,
        text: Option<String>,
        limit: u32,
    ) -> Option<SearchQuery> {
        let (time_min, time_max) = self.range(now)?;
        Some(SearchQuery {
            text,
            time_min,
            time_max,
            limit,
        })
    }
}

// API Response Types

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<Event>,
    pub next_page_token: Option<String>,
}

/// API response for calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<ApiCalendar>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: String,
    pub summary: Option<String>,
    pub summary_override: Option<String>,
}

impl From<ApiCalendar> for Calendar {
    fn from(api: ApiCalendar) -> Self {
        let display_name = api
            .summary_override
            .or(api.summary)
            .unwrap_or_else(|| api.id.clone());

        Self {
            id: api.id,
            display_name,
        }
    }
}
