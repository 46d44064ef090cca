//! iCalendar export of generated series.

mod generate;

pub use generate::generate_calendar;
