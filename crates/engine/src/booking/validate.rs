use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use thiserror::Error;

// Seconds from midnight
const OPENING: u32 = 9 * 3600;
const CLOSING: u32 = 17 * 3600;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("The museum is closed on Sundays. Please choose a different day.")]
    ClosedOnSunday,
    #[error("The museum is open only from 9 AM to 5 PM. Please choose a time within this range.")]
    OutsideOpeningHours,
}

/// Checks a visit against the opening days and hours. Both ends of the
/// opening hours are bookable.
pub fn validate_visit(date: NaiveDate, time: NaiveTime) -> Result<(), Rejection> {
    if date.weekday() == Weekday::Sun {
        return Err(Rejection::ClosedOnSunday);
    }

    if !(OPENING..=CLOSING).contains(&time.num_seconds_from_midnight()) {
        return Err(Rejection::OutsideOpeningHours);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn sundays_are_closed() {
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        assert_eq!(validate_visit(sunday, at(11, 0)), Err(Rejection::ClosedOnSunday));
    }

    #[test]
    fn opening_hours_are_inclusive() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert_eq!(validate_visit(saturday, at(9, 0)), Ok(()));
        assert_eq!(validate_visit(saturday, at(17, 0)), Ok(()));
        assert_eq!(
            validate_visit(saturday, at(8, 59)),
            Err(Rejection::OutsideOpeningHours)
        );
        assert_eq!(
            validate_visit(saturday, at(17, 1)),
            Err(Rejection::OutsideOpeningHours)
        );
    }

    #[test]
    fn sunday_wins_over_hours() {
        let sunday = NaiveDate::from_ymd_opt(2026, 5, 3).unwrap();
        assert_eq!(validate_visit(sunday, at(20, 0)), Err(Rejection::ClosedOnSunday));
    }
}
