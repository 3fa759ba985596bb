//! Duration and timestamp rendering for disable timeouts

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const NEVER: &str = "never";
pub const DEFAULT: &str = "default";

/// Local date/time pattern used for rendered timestamps
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a number of seconds as `1h 2m 5s`.
///
/// Unset or zero with `use_default` renders `default`; unset or below one
/// second renders `never`. Zero-valued units are omitted and the seconds
/// component is rounded up.
pub fn seconds_to_duration(seconds: Option<f64>, use_default: bool) -> String {
    if use_default && seconds.map_or(true, |s| s == 0.0) {
        return DEFAULT.to_string();
    }

    let secs = match seconds {
        Some(s) if s >= 1.0 => s,
        _ => return NEVER.to_string(),
    };

    let hours = (secs / 3600.0).floor() as u64;
    let mdiv = secs % 3600.0;
    let minutes = (mdiv / 60.0).floor() as u64;
    let seconds = (mdiv % 60.0).ceil() as u64;

    let parts: Vec<String> = [(hours, 'h'), (minutes, 'm'), (seconds, 's')]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    parts.join(" ")
}

/// Render epoch milliseconds as a local date/time, or `never` below 1.
pub fn timestamp_to_date_format(millis: Option<i64>) -> String {
    let millis = match millis {
        Some(ms) if ms >= 1 => ms,
        _ => return NEVER.to_string(),
    };

    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => format!("invalid timestamp {}", millis),
    }
}

/// Parse a string produced by [`timestamp_to_date_format`] back to its date.
pub fn parse_local_date(rendered: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(rendered, DATE_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

/// Render the time remaining until an epoch-millisecond instant.
pub fn timestamp_to_current_as_duration(millis: Option<i64>) -> String {
    timestamp_to_current_as_duration_at(millis, Utc::now().timestamp_millis())
}

/// Same as [`timestamp_to_current_as_duration`] with an explicit clock.
///
/// Instants at or before `now_millis` render `never`.
pub fn timestamp_to_current_as_duration_at(millis: Option<i64>, now_millis: i64) -> String {
    let millis = match millis {
        Some(ms) if ms >= 1 => ms,
        _ => return NEVER.to_string(),
    };

    let delta = millis.saturating_sub(now_millis) as f64 / 1000.0;
    seconds_to_duration(Some(delta), false)
}
