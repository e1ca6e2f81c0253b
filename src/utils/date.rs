use chrono::{Datelike, NaiveDate, Weekday};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Accepts YYYY-MM-DD or DD-MM-YYYY.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%m-%Y"))
        .ok()
}

pub fn is_weekend(d: NaiveDate) -> bool {
    matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every calendar day between the two dates, inclusive, in ascending order.
/// Inverted bounds are swapped.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Mon–Fri days of the inclusive range.
pub fn weekdays_between(a: NaiveDate, b: NaiveDate) -> Vec<NaiveDate> {
    days_between(a, b)
        .into_iter()
        .filter(|d| !is_weekend(*d))
        .collect()
}
