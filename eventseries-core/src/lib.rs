//! Series generation for community event listings.
//!
//! This crate turns a submitted pattern into concrete calendar sessions:
//! - `expand` walks camp ranges and recurrence rules into dates
//! - `materialize` maps dates onto event records plus the series aggregate
//! - `plan` runs both for a whole submission
//!
//! Everything here is pure computation. Persisting the batch is the caller's job.

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod expand;
pub mod ics;
pub mod materialize;
pub mod pattern;
pub mod plan;
pub mod serde_helpers;
pub mod weekday;

pub use config::GenerationLimits;
pub use error::{SeriesError, SeriesResult};
pub use event::{EventDraft, EventLinks, GeneratedEvent, Pricing, SeriesAggregate, SeriesBatch};
pub use expand::{expand_camp_dates, expand_recurrence};
pub use materialize::{
    ManualSession, SessionTimes, TitleTemplate, materialize, materialize_manual, session_end,
};
pub use pattern::{CampPattern, EndCondition, Frequency, RecurrencePattern};
pub use plan::{SeriesPattern, Submission, plan};
pub use weekday::WeekdaySet;
