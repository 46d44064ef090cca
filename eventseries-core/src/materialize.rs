//! Event-batch materialization.
//!
//! Maps expanded dates onto full event records: sequence numbers, titles
//! and start/end date-times, plus the aggregate for the parent series.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MINUTES_PER_DAY;
use crate::error::{SeriesError, SeriesResult};
use crate::event::{EventDraft, GeneratedEvent, SeriesAggregate, SeriesBatch};
use crate::serde_helpers::time_of_day;

/// How each session gets its time bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTimes {
    /// Recurring patterns: a start time plus a duration.
    Duration { start: NaiveTime, minutes: u32 },
    /// Camps and hand-entered sessions: independent start and end times.
    /// An end before the start is read as ending the next day.
    Window { start: NaiveTime, end: NaiveTime },
}

impl SessionTimes {
    fn bounds(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        match *self {
            SessionTimes::Duration { start, minutes } => {
                (date.and_time(start), session_end(date, start, minutes))
            }
            SessionTimes::Window { start, end } => {
                let end_date = if end < start {
                    date.succ_opt().unwrap_or(date)
                } else {
                    date
                };
                (date.and_time(start), end_date.and_time(end))
            }
        }
    }
}

/// End of a session starting at `start` on `date` and lasting `minutes`.
///
/// Minute-of-day arithmetic modulo 1440; each wrap past midnight moves the
/// end one calendar day later.
pub fn session_end(date: NaiveDate, start: NaiveTime, minutes: u32) -> NaiveDateTime {
    let per_day = u64::from(MINUTES_PER_DAY);
    let start_minute = u64::from(start.hour() * 60 + start.minute());
    let total = start_minute + u64::from(minutes);

    let day_offset = total / per_day;
    let end_minute = (total % per_day) as u32;

    let end_time =
        NaiveTime::from_hms_opt(end_minute / 60, end_minute % 60, 0).unwrap_or(NaiveTime::MIN);
    let end_date = date.checked_add_days(Days::new(day_offset)).unwrap_or(date);

    end_date.and_time(end_time)
}

/// Title given to each session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "template", rename_all = "snake_case")]
pub enum TitleTemplate {
    /// The draft title, unchanged.
    #[default]
    Plain,
    /// `{title} - Day {n}`
    Day,
    /// `{title} - Session {n}`
    Session,
    /// Any template; `{title}` and `{n}` are substituted.
    Custom(String),
}

impl TitleTemplate {
    pub fn render(&self, title: &str, n: u32) -> String {
        match self {
            TitleTemplate::Plain => title.to_string(),
            TitleTemplate::Day => format!("{title} - Day {n}"),
            TitleTemplate::Session => format!("{title} - Session {n}"),
            TitleTemplate::Custom(template) => template
                .replace("{title}", title)
                .replace("{n}", &n.to_string()),
        }
    }
}

/// A hand-entered session of a multi-session event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSession {
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end_time: NaiveTime,
}

/// Build one event per date, numbered from 1 in the given order.
///
/// Fails with `NoOccurrencesGenerated` when `dates` is empty.
pub fn materialize(
    draft: &EventDraft,
    series_id: Uuid,
    dates: &[NaiveDate],
    times: SessionTimes,
    template: &TitleTemplate,
) -> SeriesResult<SeriesBatch> {
    let slots: Vec<(NaiveDate, NaiveDateTime, NaiveDateTime)> = dates
        .iter()
        .map(|&date| {
            let (start, end) = times.bounds(date);
            (date, start, end)
        })
        .collect();

    build_batch(draft, series_id, slots, template)
}

/// Like [`materialize`], for hand-entered sessions.
///
/// Sessions are ordered by date and start time. Only the earliest session
/// of any given date is kept.
pub fn materialize_manual(
    draft: &EventDraft,
    series_id: Uuid,
    sessions: &[ManualSession],
    template: &TitleTemplate,
) -> SeriesResult<SeriesBatch> {
    let mut sessions = sessions.to_vec();
    sessions.sort_by_key(|s| (s.date, s.start_time));

    let before = sessions.len();
    sessions.dedup_by_key(|s| s.date);
    if sessions.len() < before {
        tracing::debug!(
            dropped = before - sessions.len(),
            "Dropped manual sessions sharing a date"
        );
    }

    let slots = sessions
        .iter()
        .map(|s| {
            let (start, end) = SessionTimes::Window {
                start: s.start_time,
                end: s.end_time,
            }
            .bounds(s.date);
            (s.date, start, end)
        })
        .collect();

    build_batch(draft, series_id, slots, template)
}

fn build_batch(
    draft: &EventDraft,
    series_id: Uuid,
    slots: Vec<(NaiveDate, NaiveDateTime, NaiveDateTime)>,
    template: &TitleTemplate,
) -> SeriesResult<SeriesBatch> {
    if slots.is_empty() {
        return Err(SeriesError::NoOccurrencesGenerated);
    }

    let events: Vec<GeneratedEvent> = slots
        .into_iter()
        .zip(1u32..)
        .map(|((date, start, end), sequence_number)| GeneratedEvent {
            series_id,
            sequence_number,
            is_series_instance: true,
            title: template.render(&draft.title, sequence_number),
            date,
            start,
            end,
            description: draft.description.clone(),
            location_id: draft.location_id.clone(),
            organizer_id: draft.organizer_id.clone(),
            pricing: draft.pricing.clone(),
            links: draft.links.clone(),
            image_url: draft.image_url.clone(),
            tags: draft.tags.clone(),
        })
        .collect();

    let aggregate =
        SeriesAggregate::from_events(&events).ok_or(SeriesError::NoOccurrencesGenerated)?;

    tracing::debug!(
        %series_id,
        sessions = aggregate.total_sessions,
        start = %aggregate.start_date,
        end = %aggregate.end_date,
        "Materialized series"
    );

    Ok(SeriesBatch {
        series_id,
        events,
        aggregate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Pricing;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_draft() -> EventDraft {
        EventDraft {
            title: "Robotics Camp".to_string(),
            location_id: Some("loc-42".to_string()),
            organizer_id: Some("org-7".to_string()),
            pricing: Pricing {
                is_free: false,
                price_min: Some(150.0),
                price_max: Some(150.0),
                currency: Some("USD".to_string()),
            },
            ..EventDraft::default()
        }
    }

    #[test]
    fn camp_sessions_are_numbered_by_day() {
        let dates = [date(2026, 6, 1), date(2026, 6, 2), date(2026, 6, 3)];
        let batch = materialize(
            &make_draft(),
            Uuid::nil(),
            &dates,
            SessionTimes::Window {
                start: time(9, 0),
                end: time(15, 30),
            },
            &TitleTemplate::Day,
        )
        .unwrap();

        let titles: Vec<&str> = batch.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Robotics Camp - Day 1",
                "Robotics Camp - Day 2",
                "Robotics Camp - Day 3"
            ]
        );
        assert_eq!(batch.events[2].sequence_number, 3);
        assert_eq!(batch.events[0].start, date(2026, 6, 1).and_time(time(9, 0)));
        assert_eq!(batch.events[0].end, date(2026, 6, 1).and_time(time(15, 30)));
    }

    #[test]
    fn shared_fields_are_copied() {
        let draft = make_draft();
        let id = Uuid::new_v4();
        let batch = materialize(
            &draft,
            id,
            &[date(2026, 6, 1), date(2026, 6, 8)],
            SessionTimes::Duration {
                start: time(18, 0),
                minutes: 90,
            },
            &TitleTemplate::Plain,
        )
        .unwrap();

        for event in &batch.events {
            assert_eq!(event.series_id, id);
            assert!(event.is_series_instance);
            assert_eq!(event.title, "Robotics Camp");
            assert_eq!(event.location_id, draft.location_id);
            assert_eq!(event.organizer_id, draft.organizer_id);
            assert_eq!(event.pricing, draft.pricing);
        }
        assert_eq!(batch.series_id, id);
    }

    #[test]
    fn aggregate_matches_first_last_and_count() {
        let dates = [date(2026, 1, 5), date(2026, 1, 12), date(2026, 2, 2)];
        let batch = materialize(
            &make_draft(),
            Uuid::nil(),
            &dates,
            SessionTimes::Duration {
                start: time(10, 0),
                minutes: 60,
            },
            &TitleTemplate::Plain,
        )
        .unwrap();

        assert_eq!(
            batch.aggregate,
            SeriesAggregate {
                start_date: date(2026, 1, 5),
                end_date: date(2026, 2, 2),
                total_sessions: 3,
            }
        );
    }

    #[test]
    fn empty_dates_is_no_occurrences() {
        let result = materialize(
            &make_draft(),
            Uuid::nil(),
            &[],
            SessionTimes::Duration {
                start: time(10, 0),
                minutes: 60,
            },
            &TitleTemplate::Plain,
        );
        assert!(matches!(result, Err(SeriesError::NoOccurrencesGenerated)));
    }

    #[test]
    fn duration_wraps_past_midnight() {
        let end = session_end(date(2026, 3, 20), time(23, 30), 90);
        assert_eq!(end, date(2026, 3, 21).and_time(time(1, 0)));
    }

    #[test]
    fn duration_ending_exactly_at_midnight() {
        let end = session_end(date(2026, 3, 20), time(22, 0), 120);
        assert_eq!(end, date(2026, 3, 21).and_time(time(0, 0)));
    }

    #[test]
    fn duration_within_day() {
        let end = session_end(date(2026, 3, 20), time(15, 0), 45);
        assert_eq!(end, date(2026, 3, 20).and_time(time(15, 45)));
    }

    #[test]
    fn window_ending_before_start_rolls_over() {
        let times = SessionTimes::Window {
            start: time(20, 0),
            end: time(2, 0),
        };
        let (start, end) = times.bounds(date(2026, 7, 4));
        assert_eq!(start, date(2026, 7, 4).and_time(time(20, 0)));
        assert_eq!(end, date(2026, 7, 5).and_time(time(2, 0)));
    }

    #[test]
    fn custom_title_template() {
        let template = TitleTemplate::Custom("Week {n}: {title}".to_string());
        assert_eq!(template.render("Pottery", 4), "Week 4: Pottery");
        assert_eq!(TitleTemplate::Session.render("Pottery", 2), "Pottery - Session 2");
    }

    #[test]
    fn manual_sessions_sorted_and_deduplicated() {
        let sessions = vec![
            ManualSession {
                date: date(2026, 5, 10),
                start_time: time(14, 0),
                end_time: time(16, 0),
            },
            ManualSession {
                date: date(2026, 5, 3),
                start_time: time(14, 0),
                end_time: time(16, 0),
            },
            ManualSession {
                date: date(2026, 5, 10),
                start_time: time(9, 0),
                end_time: time(11, 0),
            },
        ];

        let batch = materialize_manual(
            &make_draft(),
            Uuid::nil(),
            &sessions,
            &TitleTemplate::Session,
        )
        .unwrap();

        assert_eq!(batch.events.len(), 2);
        assert_eq!(batch.events[0].date, date(2026, 5, 3));
        assert_eq!(batch.events[1].start, date(2026, 5, 10).and_time(time(9, 0)));
        assert_eq!(batch.events[1].title, "Robotics Camp - Session 2");
        assert_eq!(batch.aggregate.total_sessions, 2);
    }

    #[test]
    fn title_template_serde_shape() {
        let json = serde_json::to_string(&TitleTemplate::Custom("{title} #{n}".into())).unwrap();
        assert_eq!(json, r#"{"kind":"custom","template":"{title} #{n}"}"#);
        let parsed: TitleTemplate = serde_json::from_str(r#"{"kind":"day"}"#).unwrap();
        assert_eq!(parsed, TitleTemplate::Day);
    }

    proptest! {
        #[test]
        fn prop_aggregate_consistent(offsets in proptest::collection::btree_set(0u64..400, 1..60)) {
            let base = date(2026, 1, 1);
            let dates: Vec<NaiveDate> = offsets.iter().map(|o| base + Days::new(*o)).collect();
            let batch = materialize(
                &make_draft(),
                Uuid::nil(),
                &dates,
                SessionTimes::Duration { start: time(19, 0), minutes: 300 },
                &TitleTemplate::Session,
            ).unwrap();

            prop_assert_eq!(batch.aggregate.start_date, dates[0]);
            prop_assert_eq!(batch.aggregate.end_date, *dates.last().unwrap());
            prop_assert_eq!(batch.aggregate.total_sessions, dates.len());
            for (i, event) in batch.events.iter().enumerate() {
                prop_assert_eq!(event.sequence_number as usize, i + 1);
                prop_assert!(event.end > event.start);
            }
        }
    }
}
