use chrono::{Duration, NaiveDate};

/// Today's calendar day in the local timezone (never UTC-shifted).
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The `n` days ending at `today`, newest first.
pub fn last_n_dates(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..i64::from(n)).map(|i| today - Duration::days(i)).collect()
}

/// The `n` days ending at `today`, oldest first.
pub fn trailing_window(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let mut days = last_n_dates(today, n);
    days.reverse();
    days
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse `s`, or fall back to today when absent.
pub fn parse_or_today(s: Option<&str>) -> Result<NaiveDate, String> {
    match s {
        None => Ok(today()),
        Some(v) => parse_date(v).ok_or_else(|| v.to_string()),
    }
}
