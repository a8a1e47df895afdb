//! Fate profile computation.
//!
//! Turns one [`BirthRecord`] into a [`FateProfile`] (solar longitude, life
//! path number, Chinese zodiac and four pillars chart) and two records into a
//! [`CompatibilityResult`].
//!
//! # Pipeline
//!
//! ```text
//! date + time ──► localize in zone ──► UTC ──► Julian Day ──► ephemeris(Sun)
//!     │                                                            │
//!     └──► digit sum % 9 + 1 ──► life path        solar position ◄─┘
//! ```
//!
//! The solar position is a pure function of (date, time, zone); the life path
//! number and the zodiac of the date alone. The four pillars chart reads the
//! wall clock date and time without the zone. The only external call is the
//! ephemeris lookup.

pub mod bazi;
pub mod compatibility;
pub mod elements;
pub mod numerology;
pub mod zodiac;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use log::debug;
use qtty::Degrees;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{normalize_longitude, CelestialBody, EphemerisError, EphemerisProvider};
use crate::models::{BirthRecord, Gender, JulianDay, TimeZoneId};

pub use bazi::BaziChart;
pub use compatibility::{compatibility_score, CompatibilityBreakdown, CompatibilityScore};
pub use elements::{Element, ElementBalance, ElementRelation, Polarity};
pub use numerology::{life_path_number, LifePathNumber};
pub use zodiac::{chinese_zodiac, Animal, ChineseZodiac};

/// Why a wall clock time could not be mapped to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalTimeIssue {
    /// The clock time occurs twice (clocks turned back).
    Ambiguous,
    /// The clock time never occurs (clocks turned forward).
    Nonexistent,
}

impl fmt::Display for LocalTimeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalTimeIssue::Ambiguous => f.write_str("ambiguous"),
            LocalTimeIssue::Nonexistent => f.write_str("nonexistent"),
        }
    }
}

/// Errors raised while computing a profile or a compatibility score.
#[derive(Debug, thiserror::Error)]
pub enum FateError {
    #[error("Local time {local} is {issue} in {zone}")]
    AmbiguousOrInvalidLocalTime {
        local: NaiveDateTime,
        zone: TimeZoneId,
        issue: LocalTimeIssue,
    },

    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(#[from] EphemerisError),

    #[error("Compatibility needs two different genders, both records are {gender}")]
    PreconditionFailed { gender: Gender },
}

/// How to treat wall clock times that fall in a DST fold or gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalTimePolicy {
    /// Fail with [`FateError::AmbiguousOrInvalidLocalTime`].
    #[default]
    Reject,
    /// Fold: take the earlier instant. Gap: apply the offset in force just
    /// before the transition.
    Earliest,
}

impl FromStr for LocalTimePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" | "strict" => Ok(Self::Reject),
            "earliest" | "earlier" => Ok(Self::Earliest),
            _ => Err(format!("Unknown local time policy: {}", s)),
        }
    }
}

/// Map a birth's wall clock time to a UTC instant.
pub fn localize(
    local: NaiveDateTime,
    zone: TimeZoneId,
    policy: LocalTimePolicy,
) -> Result<DateTime<Utc>, FateError> {
    let tz = zone.tz();
    let rejected = |issue| FateError::AmbiguousOrInvalidLocalTime { local, zone, issue };

    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => match policy {
            LocalTimePolicy::Reject => Err(rejected(LocalTimeIssue::Ambiguous)),
            LocalTimePolicy::Earliest => Ok(earliest.with_timezone(&Utc)),
        },
        LocalResult::None => match policy {
            LocalTimePolicy::Reject => Err(rejected(LocalTimeIssue::Nonexistent)),
            LocalTimePolicy::Earliest => {
                before_gap(&tz, local).ok_or_else(|| rejected(LocalTimeIssue::Nonexistent))
            }
        },
    }
}

/// Read a skipped wall clock time with the offset in force before the gap.
///
/// `None` only when the arithmetic leaves chrono's date range.
fn before_gap<Z: TimeZone>(tz: &Z, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    // Gaps last at most a few hours; a day earlier is safely before it.
    let day_before = local.checked_sub_signed(Duration::days(1))?;
    let offset = tz.offset_from_utc_datetime(&day_before).fix();
    let utc = local.checked_sub_signed(Duration::seconds(offset.local_minus_utc() as i64))?;
    Some(Utc.from_utc_datetime(&utc))
}

/// Derived profile of one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FateProfile {
    /// Apparent ecliptic longitude of the Sun, in `[0, 360)`.
    pub solar_position: Degrees,
    pub life_path_number: LifePathNumber,
    pub chinese_zodiac: ChineseZodiac,
    pub bazi: BaziChart,
    pub julian_day: JulianDay,
}

impl FateProfile {
    /// Solar position formatted with two decimals.
    pub fn solar_position_display(&self) -> String {
        format!("{:.2}", self.solar_position.value())
    }
}

/// Compatibility of two people, with the profiles it was derived from.
///
/// `score` compares solar positions only; `breakdown` scores the traditional
/// systems separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: u8,
    pub raw_score: f64,
    pub breakdown: CompatibilityBreakdown,
    pub first: FateProfile,
    pub second: FateProfile,
}

/// Computes fate profiles against a shared ephemeris.
#[derive(Clone)]
pub struct FateCalculator {
    ephemeris: Arc<dyn EphemerisProvider>,
    policy: LocalTimePolicy,
}

impl FateCalculator {
    pub fn new(ephemeris: Arc<dyn EphemerisProvider>, policy: LocalTimePolicy) -> Self {
        Self { ephemeris, policy }
    }

    pub fn policy(&self) -> LocalTimePolicy {
        self.policy
    }

    pub fn ephemeris_name(&self) -> &'static str {
        self.ephemeris.name()
    }

    /// Compute the profile of one person.
    ///
    /// # Errors
    /// - [`FateError::AmbiguousOrInvalidLocalTime`] under the `reject` policy
    /// - [`FateError::EphemerisUnavailable`] when the provider fails
    pub fn compute_fate_profile(&self, birth: &BirthRecord) -> Result<FateProfile, FateError> {
        let instant = localize(birth.civil_datetime(), birth.timezone_id, self.policy)?;
        let julian_day = JulianDay::from_datetime(instant);
        let solar_position =
            normalize_longitude(self.ephemeris.position(julian_day, CelestialBody::Sun)?);
        let life_path = life_path_number(birth.date_of_birth);

        debug!(
            "fate profile: zone={} utc={} jd={:.5} sun={:.4} life_path={}",
            birth.timezone_id,
            instant,
            julian_day.value(),
            solar_position.value(),
            life_path
        );

        Ok(FateProfile {
            solar_position,
            life_path_number: life_path,
            chinese_zodiac: chinese_zodiac(birth.date_of_birth),
            bazi: BaziChart::new(birth.date_of_birth, birth.time_of_birth),
            julian_day,
        })
    }

    /// Compute the compatibility of two people.
    ///
    /// The genders must differ; this is checked before any computation.
    pub fn compute_compatibility(
        &self,
        a: &BirthRecord,
        b: &BirthRecord,
    ) -> Result<CompatibilityResult, FateError> {
        if a.gender == b.gender {
            return Err(FateError::PreconditionFailed { gender: a.gender });
        }

        let first = self.compute_fate_profile(a)?;
        let second = self.compute_fate_profile(b)?;
        let CompatibilityScore { score, raw_score } =
            compatibility_score(first.solar_position, second.solar_position);
        let breakdown = CompatibilityBreakdown::new(
            (&first.chinese_zodiac, &second.chinese_zodiac),
            (&first.bazi, &second.bazi),
        );

        Ok(CompatibilityResult {
            score,
            raw_score,
            breakdown,
            first,
            second,
        })
    }
}
