//! Booking date helpers: parsing date-input values and the selectable window.

use chrono::{Datelike, Local, Months, NaiveDate, Weekday};

/// Date inputs submit `YYYY-MM-DD`.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// How far ahead a booking may be requested.
pub const BOOKING_HORIZON_MONTHS: u32 = 3;

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMAT).to_string()
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Inclusive range of dates offered by the date picker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BookingWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl BookingWindow {
    pub fn from_today(today: NaiveDate) -> Self {
        let latest = today
            .checked_add_months(Months::new(BOOKING_HORIZON_MONTHS))
            .unwrap_or(NaiveDate::MAX);
        Self {
            earliest: today,
            latest,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.earliest..=self.latest).contains(&date)
    }

    /// `min`/`max` attribute values for a date input.
    pub fn input_bounds(&self) -> (String, String) {
        (format_date(self.earliest), format_date(self.latest))
    }
}
