//! Submission planning: validate, expand and materialize in one call.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GenerationLimits;
use crate::error::{SeriesError, SeriesResult};
use crate::event::{EventDraft, SeriesBatch};
use crate::expand::{expand_camp_dates, expand_recurrence};
use crate::materialize::{ManualSession, SessionTimes, TitleTemplate, materialize, materialize_manual};
use crate::pattern::{CampPattern, RecurrencePattern};
use crate::serde_helpers::time_of_day;

/// The discriminated pattern a submitter chose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesPattern {
    Camp(CampPattern),
    Recurring {
        first_date: NaiveDate,
        rule: RecurrencePattern,
    },
    Manual {
        sessions: Vec<ManualSession>,
    },
    Single {
        date: NaiveDate,
        #[serde(with = "time_of_day")]
        start_time: NaiveTime,
        #[serde(with = "time_of_day")]
        end_time: NaiveTime,
    },
}

impl SeriesPattern {
    /// Camps number by day, multi-session series by session, the rest keep
    /// the draft title.
    pub fn default_title_template(&self) -> TitleTemplate {
        match self {
            SeriesPattern::Camp(_) => TitleTemplate::Day,
            SeriesPattern::Manual { sessions } if sessions.len() > 1 => TitleTemplate::Session,
            _ => TitleTemplate::Plain,
        }
    }

    /// Concrete dates, without materializing events.
    ///
    /// Camps are validated first so a reversed range or an empty weekday
    /// selection reports `InvalidRange` rather than an empty list.
    pub fn expand_dates(&self, limits: &GenerationLimits) -> SeriesResult<Vec<NaiveDate>> {
        match self {
            SeriesPattern::Camp(camp) => {
                camp.validate()?;
                Ok(expand_camp_dates(
                    camp.start_date,
                    camp.end_date,
                    camp.days_of_week,
                    limits,
                ))
            }
            SeriesPattern::Recurring { first_date, rule } => {
                Ok(expand_recurrence(rule, *first_date, limits))
            }
            SeriesPattern::Manual { sessions } => {
                let dates: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.date).collect();
                Ok(dates.into_iter().collect())
            }
            SeriesPattern::Single { date, .. } => Ok(vec![*date]),
        }
    }

    pub fn describe(&self, limits: &GenerationLimits) -> String {
        match self {
            SeriesPattern::Camp(camp) => format!("Camp: {}", camp.describe()),
            SeriesPattern::Recurring { first_date, rule } => format!(
                "{}, starting {} at {} for {} min",
                rule.describe(limits),
                first_date.format("%Y-%m-%d"),
                rule.time_of_day.format("%H:%M"),
                rule.duration_minutes
            ),
            SeriesPattern::Manual { sessions } => {
                format!("{} hand-entered sessions", sessions.len())
            }
            SeriesPattern::Single {
                date,
                start_time,
                end_time,
            } => format!(
                "Single event on {}, {}-{}",
                date.format("%Y-%m-%d"),
                start_time.format("%H:%M"),
                end_time.format("%H:%M")
            ),
        }
    }
}

/// A draft plus the pattern it repeats on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub draft: EventDraft,
    pub pattern: SeriesPattern,
    /// Overrides the pattern's default title template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_template: Option<TitleTemplate>,
}

impl Submission {
    pub fn from_toml(content: &str) -> SeriesResult<Self> {
        toml::from_str(content).map_err(|e| SeriesError::Serialization(e.to_string()))
    }

    pub fn from_json(content: &str) -> SeriesResult<Self> {
        serde_json::from_str(content).map_err(|e| SeriesError::Serialization(e.to_string()))
    }

    /// Read a submission file: TOML for `.toml`, JSON otherwise.
    pub fn load(path: &Path) -> SeriesResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn title_template(&self) -> TitleTemplate {
        self.title_template
            .clone()
            .unwrap_or_else(|| self.pattern.default_title_template())
    }
}

/// Expand and materialize a submission into a batch for `series_id`.
///
/// Returns `InvalidRange` for malformed camps and `NoOccurrencesGenerated`
/// when the pattern matches no dates at all.
pub fn plan(
    submission: &Submission,
    series_id: Uuid,
    limits: &GenerationLimits,
) -> SeriesResult<SeriesBatch> {
    let template = submission.title_template();
    let draft = &submission.draft;

    let batch = match &submission.pattern {
        SeriesPattern::Manual { sessions } => {
            materialize_manual(draft, series_id, sessions, &template)
        }
        SeriesPattern::Camp(camp) => {
            let dates = submission.pattern.expand_dates(limits)?;
            let times = SessionTimes::Window {
                start: camp.core_start_time,
                end: camp.core_end_time,
            };
            materialize(draft, series_id, &dates, times, &template)
        }
        SeriesPattern::Recurring { rule, .. } => {
            let dates = submission.pattern.expand_dates(limits)?;
            let times = SessionTimes::Duration {
                start: rule.time_of_day,
                minutes: rule.duration_minutes,
            };
            materialize(draft, series_id, &dates, times, &template)
        }
        SeriesPattern::Single {
            start_time,
            end_time,
            ..
        } => {
            let dates = submission.pattern.expand_dates(limits)?;
            let times = SessionTimes::Window {
                start: *start_time,
                end: *end_time,
            };
            materialize(draft, series_id, &dates, times, &template)
        }
    };

    if let Err(SeriesError::NoOccurrencesGenerated) = &batch {
        tracing::info!(title = %draft.title, "Submission produced no sessions");
    }

    batch
}
