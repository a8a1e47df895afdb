//! Birth data submitted through the single and couple forms.
//!
//! A [`BirthRecord`] is the only input of the fate computation. It is built
//! from one form submission, never mutated, and dropped once the result has
//! been rendered and persisted.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Gender label offered by the forms.
///
/// Only used to check the compatibility precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("Unknown gender label: {}", other)),
        }
    }
}

/// The eight time zones offered by the country selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneId {
    AsiaTokyo,
    AsiaSingapore,
    AsiaSeoul,
    AsiaTaipei,
    AustraliaSydney,
    EuropeLondon,
    AmericaNewYork,
    AsiaShanghai,
}

impl TimeZoneId {
    /// Selector order, as shown to users.
    pub const ALL: [TimeZoneId; 8] = [
        TimeZoneId::AsiaTokyo,
        TimeZoneId::AsiaSingapore,
        TimeZoneId::AsiaSeoul,
        TimeZoneId::AsiaTaipei,
        TimeZoneId::AustraliaSydney,
        TimeZoneId::EuropeLondon,
        TimeZoneId::AmericaNewYork,
        TimeZoneId::AsiaShanghai,
    ];

    /// IANA identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeZoneId::AsiaTokyo => "Asia/Tokyo",
            TimeZoneId::AsiaSingapore => "Asia/Singapore",
            TimeZoneId::AsiaSeoul => "Asia/Seoul",
            TimeZoneId::AsiaTaipei => "Asia/Taipei",
            TimeZoneId::AustraliaSydney => "Australia/Sydney",
            TimeZoneId::EuropeLondon => "Europe/London",
            TimeZoneId::AmericaNewYork => "America/New_York",
            TimeZoneId::AsiaShanghai => "Asia/Shanghai",
        }
    }

    /// tz database entry backing this zone.
    pub fn tz(&self) -> Tz {
        match self {
            TimeZoneId::AsiaTokyo => chrono_tz::Asia::Tokyo,
            TimeZoneId::AsiaSingapore => chrono_tz::Asia::Singapore,
            TimeZoneId::AsiaSeoul => chrono_tz::Asia::Seoul,
            TimeZoneId::AsiaTaipei => chrono_tz::Asia::Taipei,
            TimeZoneId::AustraliaSydney => chrono_tz::Australia::Sydney,
            TimeZoneId::EuropeLondon => chrono_tz::Europe::London,
            TimeZoneId::AmericaNewYork => chrono_tz::America::New_York,
            TimeZoneId::AsiaShanghai => chrono_tz::Asia::Shanghai,
        }
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeZoneId::ALL
            .iter()
            .copied()
            .find(|zone| zone.as_str() == s.trim())
            .ok_or_else(|| format!("Unsupported time zone: {}", s))
    }
}

impl TryFrom<String> for TimeZoneId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZoneId> for String {
    fn from(zone: TimeZoneId) -> Self {
        zone.as_str().to_string()
    }
}

/// Serde adapter for clock times written as `HH:MM`.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One person's birth data.
///
/// Serializes to the persistence shape
/// `{name, dob: "YYYY-MM-DD", time: "HH:MM", gender, country}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub name: String,
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "time", with = "hh_mm")]
    pub time_of_birth: NaiveTime,
    pub gender: Gender,
    #[serde(rename = "country")]
    pub timezone_id: TimeZoneId,
}

impl BirthRecord {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        time_of_birth: NaiveTime,
        gender: Gender,
        timezone_id: TimeZoneId,
    ) -> Self {
        Self {
            name: name.into(),
            date_of_birth,
            time_of_birth,
            gender,
            timezone_id,
        }
    }

    /// Zone-naive wall clock timestamp of the birth.
    pub fn civil_datetime(&self) -> NaiveDateTime {
        self.date_of_birth.and_time(self.time_of_birth)
    }
}
