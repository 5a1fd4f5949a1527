// src/model/time.rs

use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: u32 = 24;

/// A point on the simulated clock. One round of the evaluation service
/// corresponds to one hour. Ordering is day-major, which the field order
/// of the derive gives us for free.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    pub day: u32,
    pub hour: u32,
}

impl SimTime {
    pub fn new(day: u32, hour: u32) -> Self {
        Self { day, hour }
    }

    /// Advance by a number of hours, carrying overflow into the day.
    pub fn plus_hours(&self, hours: u32) -> SimTime {
        let total = self.hour + hours;
        SimTime {
            day: self.day + total / HOURS_PER_DAY,
            hour: total % HOURS_PER_DAY,
        }
    }

    /// Weekday index used by the weekly schedule (0..7).
    pub fn weekday(&self) -> usize {
        (self.day % 7) as usize
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{:02}H{:02}", self.day, self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_day_major() {
        assert!(SimTime::new(2, 0) > SimTime::new(1, 23));
        assert!(SimTime::new(1, 5) < SimTime::new(1, 6));
        assert_eq!(SimTime::new(3, 7), SimTime::new(3, 7));
    }

    #[test]
    fn plus_hours_carries_into_next_day() {
        assert_eq!(SimTime::new(4, 22).plus_hours(5), SimTime::new(5, 3));
        assert_eq!(SimTime::new(0, 0).plus_hours(48), SimTime::new(2, 0));
        // Long processing times can carry more than one day.
        assert_eq!(SimTime::new(1, 20).plus_hours(52), SimTime::new(4, 0));
    }

    #[test]
    fn weekday_wraps_every_seven_days() {
        assert_eq!(SimTime::new(0, 10).weekday(), 0);
        assert_eq!(SimTime::new(6, 0).weekday(), 6);
        assert_eq!(SimTime::new(7, 0).weekday(), 0);
        assert_eq!(SimTime::new(16, 0).weekday(), 2);
    }
}
