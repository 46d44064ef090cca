//! Draft and generated event records.
//!
//! A draft holds the fields shared by every session of a series. Generated
//! events copy them verbatim and add their own sequence number, date and
//! time bounds.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields shared by every generated session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_id: Option<String>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub links: EventLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>) -> Self {
        EventDraft {
            title: title.into(),
            ..EventDraft::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub is_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// External links shown on the event page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
}

/// One concrete session of a series, ready for batch insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEvent {
    pub series_id: Uuid,
    /// 1-based position in emission order.
    pub sequence_number: u32,
    pub is_series_instance: bool,
    pub title: String,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_id: Option<String>,
    pub pricing: Pricing,
    pub links: EventLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Date range and session count written back to the parent series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesAggregate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_sessions: usize,
}

impl SeriesAggregate {
    /// Derived from the generated events; `None` when there are none.
    pub fn from_events(events: &[GeneratedEvent]) -> Option<Self> {
        let start_date = events.iter().map(|e| e.date).min()?;
        let end_date = events.iter().map(|e| e.date).max()?;

        Some(SeriesAggregate {
            start_date,
            end_date,
            total_sessions: events.len(),
        })
    }
}

/// The output of one submission: events plus the parent series aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBatch {
    pub series_id: Uuid,
    pub events: Vec<GeneratedEvent>,
    pub aggregate: SeriesAggregate,
}
