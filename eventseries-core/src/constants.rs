//! Generation safety caps.
//!
//! These encode policy against runaway generation. They are the defaults for
//! [`GenerationLimits`](crate::config::GenerationLimits) and can be overridden
//! through configuration.

/// Calendar days a camp expansion scans before it stops, however long the range.
pub const CAMP_MAX_SCAN_DAYS: u32 = 60;

/// Occurrences a recurrence expansion may produce, whatever its end condition.
pub const MAX_OCCURRENCES: u32 = 52;

/// Horizon substituted for recurrences that never end.
pub const DEFAULT_HORIZON_WEEKS: u32 = 12;

/// Weekly expansion visits at most this many weeks per allowed occurrence.
pub const WEEKLY_ITERATION_FACTOR: u32 = 4;

/// Minutes in a day, for time-of-day wrap-around.
pub const MINUTES_PER_DAY: u32 = 1440;
