//! Weekday selections, indexed 0=Sunday through 6=Saturday.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};

const SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A set of weekdays stored as a bit mask (bit 0 = Sunday).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    /// Monday through Friday.
    pub const WEEKDAYS: WeekdaySet = WeekdaySet(0b0011_1110);

    /// Build from Sunday-based indices. Duplicates are ignored.
    pub fn from_indices(indices: &[u8]) -> SeriesResult<Self> {
        let mut mask = 0u8;
        for &index in indices {
            if index > 6 {
                return Err(SeriesError::InvalidWeekday(index));
            }
            mask |= 1 << index;
        }
        Ok(WeekdaySet(mask))
    }

    pub fn single(day: Weekday) -> Self {
        WeekdaySet(1 << day.num_days_from_sunday())
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Selected indices in ascending order, Sunday first.
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..7).filter(move |&i| self.0 & (1 << i) != 0)
    }

    /// Selected weekdays in ascending order, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.indices().map(weekday_from_index)
    }
}

/// Map a Sunday-based index (0..=6) to a chrono weekday.
fn weekday_from_index(index: u8) -> Weekday {
    match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = SeriesError;

    fn try_from(indices: Vec<u8>) -> SeriesResult<Self> {
        WeekdaySet::from_indices(&indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices().collect()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.indices().map(|i| SHORT_NAMES[i as usize]).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices_rejects_out_of_range() {
        assert!(matches!(
            WeekdaySet::from_indices(&[1, 7]),
            Err(SeriesError::InvalidWeekday(7))
        ));
    }

    #[test]
    fn iterates_sunday_first() {
        let set = WeekdaySet::from_indices(&[5, 0, 3, 3]).unwrap();
        let days: Vec<Weekday> = set.iter().collect();
        assert_eq!(days, vec![Weekday::Sun, Weekday::Wed, Weekday::Fri]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn weekdays_constant_is_mon_to_fri() {
        let expected = WeekdaySet::from_indices(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(WeekdaySet::WEEKDAYS, expected);
        assert!(!WeekdaySet::WEEKDAYS.contains(Weekday::Sat));
        assert!(!WeekdaySet::WEEKDAYS.contains(Weekday::Sun));
    }

    #[test]
    fn serializes_as_index_array() {
        let set = WeekdaySet::from_indices(&[3, 1]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,3]");

        let parsed: WeekdaySet = serde_json::from_str("[6,0]").unwrap();
        assert_eq!(parsed.to_string(), "Sun, Sat");

        assert!(serde_json::from_str::<WeekdaySet>("[9]").is_err());
    }
}
