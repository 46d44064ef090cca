//! Pattern descriptions captured from a submission.
//!
//! A pattern is immutable once submitted. It is expanded exactly once, by
//! [`crate::expand`], into concrete calendar dates.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::GenerationLimits;
use crate::error::{SeriesError, SeriesResult};
use crate::serde_helpers::time_of_day;
use crate::weekday::WeekdaySet;

/// How often a recurring event repeats.
///
/// Unknown names deserialize into `Unsupported` instead of failing, so a
/// malformed submission degrades to an empty expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Unsupported(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Frequency::Unsupported(_))
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Unsupported(s),
        }
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a recurrence stops producing occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndCondition {
    /// Open-ended. Expansion substitutes the default horizon.
    #[default]
    Never,
    AfterCount { count: u32 },
    /// Inclusive: an occurrence on `date` itself is kept.
    OnDate { date: NaiveDate },
}

fn default_interval() -> u32 {
    1
}

fn default_duration_minutes() -> u32 {
    60
}

/// A recurrence rule: frequency + interval + end condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Only used by weekly and biweekly rules.
    #[serde(default)]
    pub days_of_week: WeekdaySet,
    /// Only used by monthly rules. Falls back to the first date's day.
    #[serde(default)]
    pub day_of_month: Option<u32>,
    #[serde(with = "time_of_day")]
    pub time_of_day: NaiveTime,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub end_condition: EndCondition,
}

impl RecurrencePattern {
    /// A rule repeating every period at midnight for an hour, never ending.
    pub fn new(frequency: Frequency) -> Self {
        RecurrencePattern {
            frequency,
            interval: 1,
            days_of_week: WeekdaySet::EMPTY,
            day_of_month: None,
            time_of_day: NaiveTime::MIN,
            duration_minutes: default_duration_minutes(),
            end_condition: EndCondition::Never,
        }
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn on_days(mut self, days: WeekdaySet) -> Self {
        self.days_of_week = days;
        self
    }

    pub fn on_day_of_month(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn at(mut self, time: NaiveTime, duration_minutes: u32) -> Self {
        self.time_of_day = time;
        self.duration_minutes = duration_minutes;
        self
    }

    pub fn ending(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = end_condition;
        self
    }

    /// Step multiplier, never below 1.
    pub fn effective_interval(&self) -> u32 {
        self.interval.max(1)
    }

    /// Human-readable summary, e.g. `Every 2 weeks on Mon, Wed, until 2026-03-01`.
    ///
    /// Open-ended rules mention the horizon they are cut at.
    pub fn describe(&self, limits: &GenerationLimits) -> String {
        let n = self.effective_interval();

        let mut summary = match &self.frequency {
            Frequency::Daily => plural_every(n, "day"),
            Frequency::Weekly => plural_every(n, "week"),
            Frequency::Biweekly => plural_every(n * 2, "week"),
            Frequency::Monthly => plural_every(n, "month"),
            Frequency::Unsupported(name) => return format!("Unsupported frequency '{name}'"),
        };

        match self.frequency {
            Frequency::Weekly | Frequency::Biweekly if !self.days_of_week.is_empty() => {
                summary.push_str(&format!(" on {}", self.days_of_week));
            }
            Frequency::Monthly => match self.day_of_month {
                Some(day) => summary.push_str(&format!(" on day {}", day.clamp(1, 31))),
                None => summary.push_str(" on the same day"),
            },
            _ => {}
        }

        match self.end_condition {
            EndCondition::Never => summary.push_str(&format!(
                ", for the next {} weeks",
                limits.default_horizon_weeks
            )),
            EndCondition::AfterCount { count } if count > limits.max_occurrences => {
                summary.push_str(&format!(
                    ", {} times (capped at {})",
                    count, limits.max_occurrences
                ));
            }
            EndCondition::AfterCount { count } => {
                summary.push_str(&format!(", {count} times"));
            }
            EndCondition::OnDate { date } => {
                summary.push_str(&format!(", until {}", date.format("%Y-%m-%d")));
            }
        }

        summary
    }
}

fn plural_every(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("Every {unit}")
    } else {
        format!("Every {n} {unit}s")
    }
}

/// A camp: an inclusive date range filtered by weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampPattern {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_week: WeekdaySet,
    #[serde(with = "time_of_day")]
    pub core_start_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub core_end_time: NaiveTime,
}

impl CampPattern {
    /// Reject reversed ranges and empty weekday selections.
    pub fn validate(&self) -> SeriesResult<()> {
        if self.end_date < self.start_date {
            return Err(SeriesError::InvalidRange(format!(
                "camp ends ({}) before it starts ({})",
                self.end_date, self.start_date
            )));
        }
        if self.days_of_week.is_empty() {
            return Err(SeriesError::InvalidRange(
                "no days of the week selected".to_string(),
            ));
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        format!(
            "{} from {} to {}, {}-{}",
            self.days_of_week,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.core_start_time.format("%H:%M"),
            self.core_end_time.format("%H:%M"),
        )
    }
}
