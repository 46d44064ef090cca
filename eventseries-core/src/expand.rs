//! Date-pattern expansion.
//!
//! Turns a camp range or a recurrence rule into an ascending, duplicate-free
//! list of calendar dates. Expansion never fails: malformed but well-typed
//! input degrades to an empty or truncated list, bounded by
//! [`GenerationLimits`].

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::config::GenerationLimits;
use crate::pattern::{EndCondition, Frequency, RecurrencePattern};
use crate::weekday::WeekdaySet;

/// Every date in `[start, end]` whose weekday is selected.
///
/// Scans at most `limits.camp_max_scan_days` calendar days from `start`; the
/// rest of a longer range is silently dropped. A reversed range or an empty
/// weekday selection yields no dates.
pub fn expand_camp_dates(
    start: NaiveDate,
    end: NaiveDate,
    days: WeekdaySet,
    limits: &GenerationLimits,
) -> Vec<NaiveDate> {
    if end < start || days.is_empty() {
        return Vec::new();
    }

    let scan_days = limits.camp_max_scan_days as usize;
    let range_days = (end - start).num_days() + 1;
    if range_days > scan_days as i64 {
        tracing::warn!(
            %start,
            %end,
            range_days,
            scan_days,
            "Camp range longer than scan limit, truncating"
        );
    }

    let dates: Vec<NaiveDate> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .take(scan_days)
        .filter(|d| days.contains_date(*d))
        .collect();

    tracing::debug!(%start, %end, %days, count = dates.len(), "Expanded camp dates");

    dates
}

/// Stop conditions shared by every frequency.
struct Bounds {
    max_count: usize,
    last_date: Option<NaiveDate>,
}

impl Bounds {
    fn new(end_condition: EndCondition, first_date: NaiveDate, limits: &GenerationLimits) -> Self {
        let cap = limits.max_occurrences as usize;

        match end_condition {
            EndCondition::Never => {
                let horizon = Days::new(u64::from(limits.default_horizon_weeks) * 7);
                tracing::warn!(
                    weeks = limits.default_horizon_weeks,
                    "Open-ended recurrence, using default horizon"
                );
                Bounds {
                    max_count: cap,
                    last_date: Some(
                        first_date
                            .checked_add_days(horizon)
                            .unwrap_or(NaiveDate::MAX),
                    ),
                }
            }
            EndCondition::AfterCount { count } => Bounds {
                max_count: (count as usize).min(cap),
                last_date: None,
            },
            EndCondition::OnDate { date } => Bounds {
                max_count: cap,
                last_date: Some(date),
            },
        }
    }

    fn allows(&self, date: NaiveDate) -> bool {
        self.last_date.is_none_or(|last| date <= last)
    }

    fn is_full(&self, produced: usize) -> bool {
        produced >= self.max_count
    }
}

/// Occurrence dates of a recurrence rule, starting at `first_date`.
///
/// Never yields more than `limits.max_occurrences` dates. Unsupported
/// frequencies are logged and yield nothing.
pub fn expand_recurrence(
    pattern: &RecurrencePattern,
    first_date: NaiveDate,
    limits: &GenerationLimits,
) -> Vec<NaiveDate> {
    let bounds = Bounds::new(pattern.end_condition, first_date, limits);
    let interval = pattern.effective_interval();

    let dates = match &pattern.frequency {
        Frequency::Daily => expand_daily(first_date, interval, &bounds),
        Frequency::Weekly => expand_weekly(pattern, first_date, interval, &bounds, limits),
        Frequency::Biweekly => {
            expand_weekly(pattern, first_date, interval.saturating_mul(2), &bounds, limits)
        }
        Frequency::Monthly => expand_monthly(pattern, first_date, interval, &bounds),
        Frequency::Unsupported(name) => {
            tracing::warn!(frequency = %name, "Unsupported recurrence frequency, nothing generated");
            Vec::new()
        }
    };

    tracing::debug!(
        frequency = %pattern.frequency,
        interval,
        %first_date,
        count = dates.len(),
        "Expanded recurrence"
    );

    dates
}

fn expand_daily(first_date: NaiveDate, interval: u32, bounds: &Bounds) -> Vec<NaiveDate> {
    let step = Days::new(u64::from(interval));
    let mut dates = Vec::new();
    let mut current = Some(first_date);

    while let Some(date) = current {
        if bounds.is_full(dates.len()) || !bounds.allows(date) {
            break;
        }
        dates.push(date);
        current = date.checked_add_days(step);
    }

    dates
}

/// Weeks are anchored on the Sunday on or before `first_date`; every
/// `week_step`-th week emits one date per selected weekday.
fn expand_weekly(
    pattern: &RecurrencePattern,
    first_date: NaiveDate,
    week_step: u32,
    bounds: &Bounds,
    limits: &GenerationLimits,
) -> Vec<NaiveDate> {
    let days = if pattern.days_of_week.is_empty() {
        WeekdaySet::single(first_date.weekday())
    } else {
        pattern.days_of_week
    };

    let offset = Days::new(u64::from(first_date.weekday().num_days_from_sunday()));
    let Some(week_start) = first_date.checked_sub_days(offset) else {
        return Vec::new();
    };

    let max_weeks = bounds
        .max_count
        .saturating_mul(limits.weekly_iteration_factor as usize);
    let stride = u64::from(week_step) * 7;
    let mut dates = Vec::new();

    'weeks: for week in 0..max_weeks {
        let Some(anchor) = week_start.checked_add_days(Days::new(week as u64 * stride)) else {
            break;
        };

        for day in days.iter() {
            let Some(candidate) =
                anchor.checked_add_days(Days::new(u64::from(day.num_days_from_sunday())))
            else {
                break 'weeks;
            };
            if candidate < first_date {
                continue;
            }
            if bounds.is_full(dates.len()) || !bounds.allows(candidate) {
                break 'weeks;
            }
            dates.push(candidate);
        }
    }

    dates
}

/// Target day falls back to the last day of shorter months; it never rolls
/// into the following month.
fn expand_monthly(
    pattern: &RecurrencePattern,
    first_date: NaiveDate,
    interval: u32,
    bounds: &Bounds,
) -> Vec<NaiveDate> {
    let target_day = pattern.day_of_month.unwrap_or(first_date.day()).clamp(1, 31);
    let Some(first_month) = first_date.with_day(1) else {
        return Vec::new();
    };

    let mut dates = Vec::new();

    // The first month may be skipped when its target day precedes first_date.
    for step in 0..=bounds.max_count {
        if bounds.is_full(dates.len()) {
            break;
        }
        let Some(months) = (step as u32).checked_mul(interval) else {
            break;
        };
        let Some(month_start) = first_month.checked_add_months(Months::new(months)) else {
            break;
        };

        let candidate = clamp_to_month(month_start, target_day);
        if candidate < first_date {
            continue;
        }
        if !bounds.allows(candidate) {
            break;
        }
        dates.push(candidate);
    }

    dates
}

/// `day` within the month starting at `month_start`, clamped to its last day.
fn clamp_to_month(month_start: NaiveDate, day: u32) -> NaiveDate {
    let last_day = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |d| d.day());

    month_start
        .with_day(day.min(last_day))
        .unwrap_or(month_start)
}
