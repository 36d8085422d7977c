//! The simulated calendar.
//!
//! One monotonic counter of elapsed simulated seconds plus a pause flag;
//! the displayed date and the clock readout are both derived from that
//! counter alone. There is deliberately no second accumulator to drift
//! against.

use crate::defines::term;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: u64 = 86_400;
const DAYS_PER_MONTH: u64 = 30;
const MONTHS_PER_YEAR: u64 = 12;
const DAYS_PER_YEAR: u64 = DAYS_PER_MONTH * MONTHS_PER_YEAR;

/// A date in the simulated calendar (30-day months, 360-day years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u8, // 1-12
    pub day: u8,   // 1-30
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}.{}", self.day, self.month, self.year)
    }
}

/// Monotonic simulated time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimClock {
    pub start_year: i32,
    /// Elapsed simulated seconds since Jan 1 of `start_year`.
    pub elapsed: u64,
    pub paused: bool,
}

impl SimClock {
    pub fn new(start_year: i32) -> Self {
        Self {
            start_year,
            elapsed: 0,
            paused: false,
        }
    }

    /// One wall-clock second: one simulated day. No-op while paused.
    pub fn tick(&mut self) {
        if !self.paused {
            self.elapsed += SECONDS_PER_DAY;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn elapsed_days(&self) -> u64 {
        self.elapsed / SECONDS_PER_DAY
    }

    pub fn year(&self) -> i32 {
        self.start_year + (self.elapsed_days() / DAYS_PER_YEAR) as i32
    }

    /// Years fully elapsed since game start.
    pub fn years_elapsed(&self) -> i32 {
        (self.elapsed_days() / DAYS_PER_YEAR) as i32
    }

    pub fn date(&self) -> Date {
        let days = self.elapsed_days();
        let day_of_year = days % DAYS_PER_YEAR;
        Date {
            year: self.year(),
            month: (day_of_year / DAYS_PER_MONTH) as u8 + 1,
            day: (day_of_year % DAYS_PER_MONTH) as u8 + 1,
        }
    }

    /// Clock readout within the current simulated day.
    pub fn time_of_day(&self) -> (u8, u8, u8) {
        let seconds = self.elapsed % SECONDS_PER_DAY;
        (
            (seconds / 3600) as u8,
            ((seconds % 3600) / 60) as u8,
            (seconds % 60) as u8,
        )
    }

    /// Jump to Jan 1 of the next simulated year.
    pub fn advance_to_end_of_year(&mut self) {
        let next_year_start = (self.elapsed_days() / DAYS_PER_YEAR + 1) * DAYS_PER_YEAR;
        self.elapsed = next_year_start * SECONDS_PER_DAY;
    }

    /// Jump to Jan 1 of the next legislature period (4-year blocks from the
    /// start year).
    pub fn advance_to_end_of_legislature(&mut self) {
        let leg_days = DAYS_PER_YEAR * term::LEGISLATURE_YEARS as u64;
        let next_leg_start = (self.elapsed_days() / leg_days + 1) * leg_days;
        self.elapsed = next_leg_start * SECONDS_PER_DAY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_starts_at_jan_first() {
        let clock = SimClock::new(2025);
        assert_eq!(clock.date(), Date::new(2025, 1, 1));
        assert_eq!(clock.time_of_day(), (0, 0, 0));
    }

    #[test]
    fn test_tick_advances_one_day() {
        let mut clock = SimClock::new(2025);
        clock.tick();
        assert_eq!(clock.date(), Date::new(2025, 1, 2));
    }

    #[test]
    fn test_paused_clock_does_not_advance() {
        let mut clock = SimClock::new(2025);
        clock.pause();
        clock.tick();
        clock.tick();
        assert_eq!(clock.elapsed, 0);
        clock.resume();
        clock.tick();
        assert_eq!(clock.elapsed_days(), 1);
    }

    #[test]
    fn test_month_and_year_rollover() {
        let mut clock = SimClock::new(2025);
        for _ in 0..30 {
            clock.tick();
        }
        assert_eq!(clock.date(), Date::new(2025, 2, 1));

        for _ in 0..330 {
            clock.tick();
        }
        assert_eq!(clock.date(), Date::new(2026, 1, 1));
        assert_eq!(clock.year(), 2026);
    }

    #[test]
    fn test_advance_to_end_of_year() {
        let mut clock = SimClock::new(2025);
        for _ in 0..100 {
            clock.tick();
        }
        clock.advance_to_end_of_year();
        assert_eq!(clock.date(), Date::new(2026, 1, 1));

        // Advancing from a year boundary moves a whole year.
        clock.advance_to_end_of_year();
        assert_eq!(clock.date(), Date::new(2027, 1, 1));
    }

    #[test]
    fn test_advance_to_end_of_legislature() {
        let mut clock = SimClock::new(2025);
        clock.advance_to_end_of_legislature();
        assert_eq!(clock.year(), 2029);

        clock.tick();
        clock.advance_to_end_of_legislature();
        assert_eq!(clock.year(), 2033);
    }

    #[test]
    fn test_date_display() {
        let clock = SimClock::new(2025);
        assert_eq!(clock.date().to_string(), "01.01.2025");
    }
}
