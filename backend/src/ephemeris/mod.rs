//! Ephemeris providers.
//!
//! An [`EphemerisProvider`] answers one question: where along the ecliptic is
//! a body at a given UT Julian Day. Two implementations are available:
//!
//! - [`AnalyticEphemeris`]: closed-form series, needs no data and never fails
//! - [`TabulatedEphemeris`]: interpolates a precomputed table read from disk
//!
//! Calls are synchronous and deterministic for identical input.

pub mod analytic;
pub mod table;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use qtty::Degrees;
use serde::{Deserialize, Serialize};

use crate::models::JulianDay;

pub use analytic::AnalyticEphemeris;
pub use table::TabulatedEphemeris;

/// Result type for ephemeris lookups
pub type EphemerisResult<T> = Result<T, EphemerisError>;

/// Bodies an ephemeris can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialBody {
    Sun,
    Moon,
}

impl CelestialBody {
    pub fn as_str(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "sun",
            CelestialBody::Moon => "moon",
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by ephemeris providers.
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    /// Backing data is missing or unreadable.
    #[error("Ephemeris data unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// Backing data was read but could not be understood.
    #[error("Malformed ephemeris data in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// The requested instant lies outside the data coverage.
    #[error("Julian day {jd} is outside the ephemeris coverage [{start}, {end}]")]
    OutOfRange { jd: f64, start: f64, end: f64 },

    /// The provider has no data for this body.
    #[error("No ephemeris data for body '{0}'")]
    UnsupportedBody(CelestialBody),
}

/// Source of ecliptic positions.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; the HTTP layer shares one provider
/// across all requests.
pub trait EphemerisProvider: Send + Sync {
    /// Apparent geocentric ecliptic longitude of `body`, in `[0, 360)`.
    fn position(&self, jd: JulianDay, body: CelestialBody) -> EphemerisResult<Degrees>;

    /// Short name used in logs and health output.
    fn name(&self) -> &'static str;
}

/// Wrap an angle into `[0, 360)`.
///
/// Floating point wrapping of a value a hair below zero lands on exactly
/// 360.0, which is folded back to 0.
pub fn normalize_longitude(angle: Degrees) -> Degrees {
    let wrapped = angle.wrap_pos();
    if wrapped.value() >= 360.0 {
        Degrees::new(0.0)
    } else {
        wrapped
    }
}

/// Which provider implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemerisSource {
    Analytic,
    Table,
}

impl FromStr for EphemerisSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analytic" | "builtin" => Ok(Self::Analytic),
            "table" | "file" => Ok(Self::Table),
            _ => Err(format!("Unknown ephemeris source: {}", s)),
        }
    }
}

/// Build the provider described by `source`.
///
/// `data_path` is only consulted for [`EphemerisSource::Table`]. The file is
/// not opened here; a missing file surfaces on the first lookup.
pub fn create_provider(
    source: EphemerisSource,
    data_path: Option<PathBuf>,
) -> Result<Arc<dyn EphemerisProvider>, String> {
    match source {
        EphemerisSource::Analytic => Ok(Arc::new(AnalyticEphemeris::new())),
        EphemerisSource::Table => {
            let path = data_path
                .ok_or_else(|| "Table ephemeris requires 'ephemeris.data_path'".to_string())?;
            Ok(Arc::new(TabulatedEphemeris::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_str() {
        assert_eq!("analytic".parse::<EphemerisSource>().unwrap(), EphemerisSource::Analytic);
        assert_eq!("TABLE".parse::<EphemerisSource>().unwrap(), EphemerisSource::Table);
        assert!("swiss".parse::<EphemerisSource>().is_err());
    }

    #[test]
    fn test_normalize_longitude_half_open() {
        assert_eq!(normalize_longitude(Degrees::new(-1e-16)).value(), 0.0);
        assert_eq!(normalize_longitude(Degrees::new(360.0)).value(), 0.0);
        assert!((normalize_longitude(Degrees::new(-10.0)).value() - 350.0).abs() < 1e-9);
        assert!((normalize_longitude(Degrees::new(725.5)).value() - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_table_source_requires_path() {
        assert!(create_provider(EphemerisSource::Table, None).is_err());
        let provider = create_provider(EphemerisSource::Table, Some("ephe/table.json".into())).unwrap();
        assert_eq!(provider.name(), "table");
    }

    #[test]
    fn test_analytic_source_ignores_path() {
        let provider = create_provider(EphemerisSource::Analytic, None).unwrap();
        assert_eq!(provider.name(), "analytic");
    }
}
