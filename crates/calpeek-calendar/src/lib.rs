//! Google Calendar access for calpeek.
//!
//! Read-only API client plus plain-text rendering of events.

pub mod api;
pub mod client;
pub mod error;
pub mod format;
pub mod labels;
pub mod types;

pub use api::CalendarApi;
pub use client::CalendarClient;
pub use error::CalendarError;
pub use format::{format_calendar_line, format_event, format_event_line, format_timestamp};
pub use labels::Labels;
pub use types::{
    Attendee, Calendar, Event, EventStatus, EventTime, Person, ResponseStatus, SearchQuery,
    SearchWindow,
};
