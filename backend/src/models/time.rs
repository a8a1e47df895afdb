use chrono::{DateTime, Timelike, Utc};
use serde::*;

/// Julian Day of the Unix epoch (1970-01-01 00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00:00 UTC).
pub const J2000_JD: f64 = 2_451_545.0;

/// Offset between a Julian Day and a Modified Julian Date.
pub const MJD_OFFSET: f64 = 2_400_000.5;

/// Julian Day Number with a fractional day part, always on the UT scale.
/// JD 0 = -4713-11-24 12:00:00 UTC (proleptic Gregorian)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDay(qtty::Days);

impl JulianDay {
    /// Create a new JD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw JD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.value() - J2000_JD) / 36_525.0
    }

    /// Equivalent Modified Julian Date.
    pub fn to_modified(&self) -> f64 {
        self.value() - MJD_OFFSET
    }

    /// Build the JD for a UTC instant.
    ///
    /// The whole-day part counts civil days since the Unix epoch and the
    /// fraction is `(hour + minute / 60) / 24`; seconds do not contribute,
    /// since birth times are only ever captured to the minute.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let days = dt.date_naive().signed_duration_since(unix_epoch_date()).num_days() as f64;
        let hours = dt.hour() as f64 + dt.minute() as f64 / 60.0;
        Self::new(UNIX_EPOCH_JD + days + hours / 24.0)
    }

    /// Convert back to a UTC instant, rounded to the nearest second.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        let secs = ((self.value() - UNIX_EPOCH_JD) * 86_400.0).round() as i64;
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl From<f64> for JulianDay {
    fn from(v: f64) -> Self {
        JulianDay::new(v)
    }
}

fn unix_epoch_date() -> chrono::NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}
