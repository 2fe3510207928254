use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Format of the `begin` and `end` fields in the data file
pub const BEGIN_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("Failed to read events file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse events file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid begin '{begin}', expected YYYY-MM-DD HH:MM: {source}")]
    InvalidBegin {
        begin: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One entry of `events.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub place: String,
    /// Local start time as `YYYY-MM-DD HH:MM`
    pub begin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default = "no_link")]
    pub image_url: String,
    #[serde(default = "no_link")]
    pub url: String,
    /// Space separated tags of the feeds that listed this event
    #[serde(default)]
    pub source: String,
}

fn no_link() -> String {
    "#".to_string()
}

impl Event {
    pub fn begin_time(&self) -> Result<NaiveDateTime, EventsError> {
        NaiveDateTime::parse_from_str(&self.begin, BEGIN_FORMAT).map_err(|source| {
            EventsError::InvalidBegin {
                begin: self.begin.clone(),
                source,
            }
        })
    }

    /// Human readable start, e.g. "Heute 20:00" or "20:00, 5. Mar"
    ///
    /// Falls back to the raw `begin` string when it does not parse.
    pub fn when_label(&self, today: NaiveDate, today_label: &str) -> String {
        match self.begin_time() {
            Ok(begin) if begin.date() == today => {
                format!("{} {}", today_label, begin.format("%H:%M"))
            }
            Ok(begin) => begin.format("%H:%M, %-d. %b").to_string(),
            Err(e) => {
                warn!("{e}");
                self.begin.clone()
            }
        }
    }
}

/// Which part of an event the query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// When, source tags, name and place, as shown in the details cell
    #[default]
    Details,
    Name,
    Place,
}

impl SearchField {
    pub fn extract(&self, event: &Event, today: NaiveDate, today_label: &str) -> String {
        match self {
            SearchField::Details => {
                let mut text = event.when_label(today, today_label);
                if !event.source.trim().is_empty() {
                    text.push(' ');
                    text.push_str(event.source.trim());
                }
                format!("{}\n{}\n{}", text, event.name, event.place)
            }
            SearchField::Name => event.name.clone(),
            SearchField::Place => event.place.clone(),
        }
    }
}

/// Parse the contents of an events file, ordered by start time
pub fn parse_events(raw: &str) -> Result<Vec<Event>, serde_json::Error> {
    let mut events: Vec<Event> = serde_json::from_str(raw)?;
    events.sort_by(|a, b| a.begin.cmp(&b.begin));
    Ok(events)
}

pub fn load_events(path: &Path) -> Result<Vec<Event>, EventsError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| EventsError::Read {
        path: path_display.clone(),
        source,
    })?;

    let events = parse_events(&raw).map_err(|source| EventsError::Parse {
        path: path_display.clone(),
        source,
    })?;
    debug!(path = %path_display, count = events.len(), "events loaded");
    Ok(events)
}
