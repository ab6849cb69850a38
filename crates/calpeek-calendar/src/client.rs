//! Google Calendar API client.

use chrono::SecondsFormat;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::CalendarError;
use crate::types::*;

/// Largest page the events endpoint will return.
const MAX_PAGE_SIZE: u32 = 2500;

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List every calendar on the user's calendar list.
    #[instrument(skip(self), level = "info")]
    pub async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(&self.access_token);
            if let Some(pt) = &page_token {
                request = request.query(&[("pageToken", pt)]);
            }

            let resp: CalendarListResponse = self.handle_response(request.send().await?).await?;
            calendars.extend(resp.items.into_iter().map(Calendar::from));

            match resp.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!("Fetched {} calendars", calendars.len());
        Ok(calendars)
    }

    /// Search events in a time range, recurring series expanded, ordered by
    /// start time. Pages until `query.limit` events are collected.
    #[instrument(skip(self), level = "info")]
    pub async fn search_events(
        &self,
        calendar_id: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Event>, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        );
        let limit = query.limit as usize;
        let mut events: Vec<Event> = Vec::new();
        let mut page_token: Option<String> = None;

        while events.len() < limit {
            let remaining = (limit - events.len()) as u32;
            let mut params = vec![
                (
                    "timeMin",
                    query.time_min.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                (
                    "timeMax",
                    query.time_max.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("maxResults", remaining.min(MAX_PAGE_SIZE).to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(text) = query.text.as_deref().filter(|t| !t.is_empty()) {
                params.push(("q", text.to_string()));
            }
            if let Some(pt) = &page_token {
                params.push(("pageToken", pt.clone()));
            }

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&params)
                .send()
                .await?;

            let resp: EventListResponse = self.handle_response(response).await?;
            events.extend(resp.items);

            match resp.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        events.truncate(limit);
        tracing::debug!("Found {} events", events.len());
        Ok(events)
    }

    /// Get a single event.
    #[instrument(skip(self), level = "info")]
    pub async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<Event, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id),
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| CalendarError::Decode(e.to_string()));
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let message = api_error_message(&response.text().await.unwrap_or_default());
        tracing::warn!("Calendar API returned {}: {}", status, message);

        Err(match status.as_u16() {
            401 => CalendarError::Unauthorized(message),
            403 => CalendarError::Forbidden(message),
            404 => CalendarError::NotFound(message),
            429 => CalendarError::RateLimited(retry_after),
            code => CalendarError::Api {
                status: code,
                message,
            },
        })
    }
}

/// Pull `error.message` out of a Google error body, else use the body as is.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
