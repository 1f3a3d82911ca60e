//! Time utilities: timezone-aware deadline parsing and display.
//!
//! Deadlines arrive as local wall-clock strings ("YYYY-MM-DD HH:MM"); the
//! engine stores UTC only.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SchedulerError};

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a deadline like "2025-06-01 10:00" in an IANA tz like
/// "America/Chicago", returning UTC.
pub fn parse_deadline(local: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let ndt = NaiveDateTime::parse_from_str(local.trim(), DEADLINE_FORMAT).map_err(|e| {
        SchedulerError::Validation(format!("invalid deadline '{local}' (want YYYY-MM-DD HH:MM): {e}"))
    })?;

    let local_dt = tz.from_local_datetime(&ndt).single().ok_or_else(|| {
        SchedulerError::Validation(format!("ambiguous or invalid local time (DST?): {local} {tz}"))
    })?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Format a UTC instant back into the local "YYYY-MM-DD HH:MM" form.
pub fn format_deadline(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format(DEADLINE_FORMAT).to_string()
}

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| SchedulerError::Validation(format!("invalid timezone: {tz}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_deadline() {
        // June is CEST (UTC+2)
        let utc = parse_deadline("2025-06-01 10:00", chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_parse_utc_round_trips() {
        let utc = parse_deadline("2025-06-01 10:00", chrono_tz::UTC).unwrap();
        assert_eq!(format_deadline(utc, chrono_tz::UTC), "2025-06-01 10:00");
    }

    #[test]
    fn test_garbage_is_validation_error() {
        let err = parse_deadline("next tuesday", chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
    }

    #[test]
    fn test_bad_timezone() {
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
        assert_eq!(parse_timezone("UTC").unwrap(), chrono_tz::UTC);
    }
}
