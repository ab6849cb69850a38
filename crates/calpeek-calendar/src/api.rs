//! The read-only calendar operations the browser needs.

use crate::client::CalendarClient;
use crate::error::CalendarError;
use crate::types::{Calendar, Event, SearchQuery};

#[allow(async_fn_in_trait)]
pub trait CalendarApi {
    async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError>;

    async fn search_events(
        &self,
        calendar_id: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Event>, CalendarError>;

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<Event, CalendarError>;
}

impl CalendarApi for CalendarClient {
    async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError> {
        CalendarClient::list_calendars(self).await
    }

    async fn search_events(
        &self,
        calendar_id: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Event>, CalendarError> {
        CalendarClient::search_events(self, calendar_id, query).await
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<Event, CalendarError> {
        CalendarClient::get_event(self, calendar_id, event_id).await
    }
}
