use chrono::{DateTime, Datelike, Days, Months, Utc};

const PERIODS: [(&str, i64); 6] = [
    ("year", 60 * 60 * 24 * 365),
    ("month", 60 * 60 * 24 * 30),
    ("day", 60 * 60 * 24),
    ("hour", 60 * 60),
    ("minute", 60),
    ("second", 1),
];

/// Shown instead of an empty countdown.
pub const LAST_DAY: &str = "Last Day";

/// Last day of `now`'s month, at `now`'s time of day.
pub fn last_day_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(now)
}

/// Spells `seconds` out as "2 days, 3 hours, 1 minute".
///
/// A period is only used once the remainder strictly exceeds it, so exactly
/// sixty seconds renders as nothing at all. Zero or less is the empty string.
pub fn friendly_time_delta(seconds: i64) -> String {
    let mut left = seconds;
    let mut parts = Vec::new();

    for (name, length) in PERIODS {
        if left > length {
            let value = left / length;
            left %= length;
            let plural = if value > 1 { "s" } else { "" };
            parts.push(format!("{} {}{}", value, name, plural));
        }
    }
    parts.join(", ")
}

/// Countdown to the end of the month, or `"Last Day"`.
pub fn time_remaining(now: DateTime<Utc>) -> String {
    let delta = last_day_of_month(now) - now;
    let text = friendly_time_delta(delta.num_seconds());
    if text.is_empty() {
        LAST_DAY.to_string()
    } else {
        text
    }
}
