//! File-backed ephemeris.
//!
//! Reads a JSON document of evenly spaced longitudes per body:
//!
//! ```json
//! {
//!   "tables": [
//!     { "body": "sun", "start_jd": 2415020.5, "step_days": 1.0, "longitudes": [280.1, 281.1] }
//!   ]
//! }
//! ```
//!
//! The file is read on the first lookup and cached once it parses. A failed
//! load is not cached, so fixing the file on disk takes effect on the next call.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use qtty::Degrees;
use serde::{Deserialize, Serialize};

use super::{
    normalize_longitude, CelestialBody, EphemerisError, EphemerisProvider, EphemerisResult,
};
use crate::models::JulianDay;

/// One body's samples on a regular grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyTable {
    pub body: CelestialBody,
    pub start_jd: f64,
    pub step_days: f64,
    pub longitudes: Vec<f64>,
}

impl BodyTable {
    fn end_jd(&self) -> f64 {
        self.start_jd + self.step_days * (self.longitudes.len() - 1) as f64
    }

    fn validate(&self) -> Result<(), String> {
        if self.longitudes.len() < 2 {
            return Err(format!("table for {} needs at least two samples", self.body));
        }
        if !(self.step_days.is_finite() && self.step_days > 0.0) {
            return Err(format!("table for {} has a non-positive step", self.body));
        }
        if !self.start_jd.is_finite() || self.longitudes.iter().any(|v| !v.is_finite()) {
            return Err(format!("table for {} contains non-finite values", self.body));
        }
        Ok(())
    }

    /// Linear interpolation along the shorter arc between neighbouring samples.
    fn interpolate(&self, jd: f64) -> EphemerisResult<Degrees> {
        let end = self.end_jd();
        if jd < self.start_jd || jd > end {
            return Err(EphemerisError::OutOfRange {
                jd,
                start: self.start_jd,
                end,
            });
        }

        let position = (jd - self.start_jd) / self.step_days;
        let index = (position.floor() as usize).min(self.longitudes.len() - 2);
        let fraction = position - index as f64;

        let from = Degrees::new(self.longitudes[index]);
        let to = Degrees::new(self.longitudes[index + 1]);
        let arc = to.signed_separation(from);

        Ok(normalize_longitude(from + arc * fraction))
    }
}

/// Top-level document stored in the data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EphemerisTables {
    pub tables: Vec<BodyTable>,
}

impl EphemerisTables {
    /// Read and validate a table file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EphemerisResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EphemerisError::Unavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let tables: EphemerisTables =
            serde_json::from_str(&content).map_err(|e| EphemerisError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        for table in &tables.tables {
            table.validate().map_err(|reason| EphemerisError::Malformed {
                path: path.to_path_buf(),
                reason,
            })?;
        }

        Ok(tables)
    }

    fn table_for(&self, body: CelestialBody) -> Option<&BodyTable> {
        self.tables.iter().find(|t| t.body == body)
    }
}

/// Ephemeris backed by a table file on disk.
pub struct TabulatedEphemeris {
    path: PathBuf,
    cache: RwLock<Option<Arc<EphemerisTables>>>,
}

impl TabulatedEphemeris {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the table now instead of on the first lookup.
    pub fn preload(&self) -> EphemerisResult<()> {
        self.tables().map(|_| ())
    }

    fn tables(&self) -> EphemerisResult<Arc<EphemerisTables>> {
        if let Some(tables) = self.cache.read().as_ref() {
            return Ok(Arc::clone(tables));
        }

        let mut cache = self.cache.write();
        if let Some(tables) = cache.as_ref() {
            return Ok(Arc::clone(tables));
        }

        let loaded = Arc::new(EphemerisTables::from_file(&self.path)?);
        debug!(
            "Loaded {} ephemeris table(s) from {}",
            loaded.tables.len(),
            self.path.display()
        );
        *cache = Some(Arc::clone(&loaded));
        Ok(loaded)
    }
}

impl EphemerisProvider for TabulatedEphemeris {
    fn position(&self, jd: JulianDay, body: CelestialBody) -> EphemerisResult<Degrees> {
        let tables = self.tables()?;
        let table = tables
            .table_for(body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        table.interpolate(jd.value())
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
