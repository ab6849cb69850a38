//! Interactive calendar browsing, one prompt at a time.

use std::io::Write;

use anyhow::Result;
use calpeek_calendar::{
    format_calendar_line, format_event, format_event_line, Calendar, CalendarApi, Event,
    SearchWindow,
};
use calpeek_core::{Config, Locale};
use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::prompts::Prompts;

/// Session knobs taken from the config.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub locale: Locale,
    pub default_window: SearchWindow,
    pub max_results: u32,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            locale: config.display.locale,
            default_window: SearchWindow {
                days_back: config.search.days_back,
                days_forward: config.search.days_forward,
            },
            max_results: config.calendar.max_results,
        }
    }
}

enum State {
    SelectCalendar,
    EnterQuery {
        calendar: Calendar,
    },
    EnterWindow {
        calendar: Calendar,
        query: Option<String>,
    },
    ShowResults {
        calendar: Calendar,
        query: Option<String>,
        window: SearchWindow,
    },
    SelectEvent {
        calendar: Calendar,
        events: Vec<Event>,
    },
    ShowDetail {
        calendar: Calendar,
        event_id: String,
    },
    Exit,
}

pub struct Session<'a, A, R, W> {
    api: &'a A,
    input: R,
    output: W,
    settings: SessionSettings,
    prompts: &'static Prompts,
}

impl<'a, A, R, W> Session<'a, A, R, W>
where
    A: CalendarApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(api: &'a A, input: R, output: W, settings: SessionSettings) -> Self {
        Self {
            api,
            input,
            output,
            settings,
            prompts: Prompts::for_locale(settings.locale),
        }
    }

    /// Drive the session until it exits.
    ///
    /// API failures are reported on the console and end or shorten the
    /// session. Only console I/O errors are returned.
    pub async fn run(mut self) -> Result<()> {
        let mut state = State::SelectCalendar;
        loop {
            state = match state {
                State::SelectCalendar => self.select_calendar().await?,
                State::EnterQuery { calendar } => self.enter_query(calendar).await?,
                State::EnterWindow { calendar, query } => {
                    self.enter_window(calendar, query).await?
                }
                State::ShowResults {
                    calendar,
                    query,
                    window,
                } => self.show_results(calendar, query, window).await?,
                State::SelectEvent { calendar, events } => {
                    self.select_event(calendar, events).await?
                }
                State::ShowDetail { calendar, event_id } => {
                    self.show_detail(&calendar, &event_id).await?
                }
                State::Exit => return Ok(()),
            };
        }
    }

    async fn select_calendar(&mut self) -> Result<State> {
        let calendars = match self.api.list_calendars().await {
            Ok(calendars) => calendars,
            Err(e) => {
                tracing::error!("Failed to list calendars: {}", e);
                writeln!(self.output, "{}{}", self.prompts.error_prefix, e.user_message())?;
                return Ok(State::Exit);
            }
        };

        writeln!(self.output, "\n{}", self.prompts.calendars_heading)?;
        for (i, calendar) in calendars.iter().enumerate() {
            writeln!(self.output, "{}", format_calendar_line(i + 1, calendar))?;
        }

        if calendars.is_empty() {
            writeln!(self.output, "{}", self.prompts.no_calendars)?;
            return Ok(State::Exit);
        }

        let Some(line) = self.read_line(&format!("\n{}", self.prompts.choose_calendar)).await?
        else {
            return Ok(State::Exit);
        };

        let index = calendar_index(&line, calendars.len());
        let calendar = calendars.into_iter().nth(index);
        let Some(calendar) = calendar else {
            return Ok(State::Exit);
        };

        writeln!(
            self.output,
            "{}{}",
            self.prompts.selected_calendar, calendar.display_name
        )?;
        Ok(State::EnterQuery { calendar })
    }

    async fn enter_query(&mut self, calendar: Calendar) -> Result<State> {
        let Some(line) = self.read_line(&format!("\n{}", self.prompts.enter_query)).await? else {
            return Ok(State::Exit);
        };

        let query = Some(line).filter(|q| !q.is_empty());
        Ok(State::EnterWindow { calendar, query })
    }

    async fn enter_window(&mut self, calendar: Calendar, query: Option<String>) -> Result<State> {
        let defaults = self.settings.default_window;

        let Some(back) = self.read_line(&self.prompts.days_back(defaults.days_back)).await? else {
            return Ok(State::Exit);
        };
        let Some(forward) = self
            .read_line(&self.prompts.days_forward(defaults.days_forward))
            .await?
        else {
            return Ok(State::Exit);
        };

        let mut window = SearchWindow {
            days_back: day_count(&back, defaults.days_back),
            days_forward: day_count(&forward, defaults.days_forward),
        };
        if window.range(Utc::now()).is_none() {
            tracing::warn!("Search window {:?} is out of range, using defaults", window);
            window = defaults;
        }
        Ok(State::ShowResults {
            calendar,
            query,
            window,
        })
    }

    async fn show_results(
        &mut self,
        calendar: Calendar,
        query: Option<String>,
        window: SearchWindow,
    ) -> Result<State> {
        writeln!(self.output, "\n{}", self.prompts.results_heading)?;
        writeln!(
            self.output,
            "{}",
            self.prompts.search_range(window.days_back, window.days_forward)
        )?;
        if let Some(query) = &query {
            writeln!(self.output, "{}", self.prompts.keyword(query))?;
        }
        writeln!(self.output)?;

        let events = match window.query(Utc::now(), query, self.settings.max_results) {
            Some(search) => match self.api.search_events(&calendar.id, &search).await {
                Ok(events) => events,
                Err(e) => {
                    tracing::error!("Event search failed: {}", e);
                    writeln!(self.output, "{}{}", self.prompts.error_prefix, e.user_message())?;
                    Vec::new()
                }
            },
            None => {
                tracing::error!("Search window {:?} is out of range", window);
                Vec::new()
            }
        };

        if events.is_empty() {
            writeln!(self.output, "{}", self.prompts.no_events)?;
            return Ok(State::Exit);
        }

        for (i, event) in events.iter().enumerate() {
            writeln!(
                self.output,
                "{}",
                format_event_line(i + 1, event, self.settings.locale)
            )?;
        }
        Ok(State::SelectEvent { calendar, events })
    }

    async fn select_event(&mut self, calendar: Calendar, events: Vec<Event>) -> Result<State> {
        let Some(line) = self.read_line(&format!("\n{}", self.prompts.choose_event)).await? else {
            return Ok(State::Exit);
        };

        let choice: i64 = match line.parse() {
            Ok(choice) => choice,
            Err(_) => {
                writeln!(self.output, "{}", self.prompts.invalid_input)?;
                return Ok(State::Exit);
            }
        };

        if choice == 0 {
            return Ok(State::Exit);
        }

        let event = usize::try_from(choice)
            .ok()
            .and_then(|n| events.into_iter().nth(n - 1));
        match event {
            Some(event) => Ok(State::ShowDetail {
                calendar,
                event_id: event.id,
            }),
            None => {
                writeln!(self.output, "{}", self.prompts.invalid_selection)?;
                Ok(State::Exit)
            }
        }
    }

    async fn show_detail(&mut self, calendar: &Calendar, event_id: &str) -> Result<State> {
        match self.api.get_event(&calendar.id, event_id).await {
            Ok(event) => {
                writeln!(
                    self.output,
                    "{}",
                    format_event(&event, self.settings.locale)
                )?;
            }
            Err(e) => {
                tracing::error!("Failed to fetch event {}: {}", event_id, e);
                writeln!(self.output, "{}{}", self.prompts.error_prefix, e.user_message())?;
            }
        }
        Ok(State::Exit)
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// One-based choice to index. Empty, malformed or out of range picks the first.
fn calendar_index(input: &str, count: usize) -> usize {
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => n - 1,
        _ => 0,
    }
}

fn day_count(input: &str, default: u32) -> u32 {
    input.parse().unwrap_or(default)
}
