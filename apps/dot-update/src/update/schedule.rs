use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Working days used when the model gives no next-update date.
pub const DEFAULT_UPDATE_WORKING_DAYS: u32 = 5;

/// Returns the date `days` working days (Mon–Fri) after `start`.
/// `start` itself is never counted.
pub fn add_working_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut current = start;
    let mut added = 0;
    while added < days {
        current = current + Days::new(1);
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            added += 1;
        }
    }
    current
}
