//! Closed-form ephemeris.
//!
//! The Sun uses the low-precision solar theory (geometric mean longitude plus
//! the equation of centre, corrected for nutation and aberration), good to
//! about 0.01 degree over several centuries around J2000. The Moon uses the
//! six largest periodic terms of the lunar longitude series, good to a few
//! tenths of a degree.
//!
//! Time arguments are treated as UT; the difference to dynamical time
//! (about a minute) moves the Sun by well under 0.001 degree.

use qtty::Degrees;

use super::{normalize_longitude, CelestialBody, EphemerisProvider, EphemerisResult};
use crate::models::JulianDay;

/// Ephemeris computed from series expansions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Apparent ecliptic longitude of the Sun.
    pub fn sun_longitude(jd: JulianDay) -> Degrees {
        let t = jd.centuries_since_j2000();

        let mean_longitude = Degrees::new(280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t);
        let mean_anomaly = Degrees::new(357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t);

        let centre = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * mean_anomaly.sin()
            + (0.019_993 - 0.000_101 * t) * (mean_anomaly * 2.0).sin()
            + 0.000_289 * (mean_anomaly * 3.0).sin();

        // Longitude of the Moon's ascending node drives the nutation term.
        let node = Degrees::new(125.04 - 1_934.136 * t);
        let apparent = mean_longitude.value() + centre - 0.005_69 - 0.004_78 * node.sin();

        normalize_longitude(Degrees::new(apparent))
    }

    /// Geocentric ecliptic longitude of the Moon.
    pub fn moon_longitude(jd: JulianDay) -> Degrees {
        let t = jd.centuries_since_j2000();

        let mean_longitude = 218.316_447_7 + 481_267.881_234_21 * t;
        let elongation = Degrees::new(297.850_192_1 + 445_267.111_403_4 * t);
        let sun_anomaly = Degrees::new(357.529_109_2 + 35_999.050_290_9 * t);
        let moon_anomaly = Degrees::new(134.963_396_4 + 477_198.867_505_5 * t);
        let latitude_arg = Degrees::new(93.272_095_0 + 483_202.017_523_3 * t);

        let longitude = mean_longitude
            + 6.288_774 * moon_anomaly.sin()
            + 1.274_027 * (elongation * 2.0 - moon_anomaly).sin()
            + 0.658_314 * (elongation * 2.0).sin()
            + 0.213_618 * (moon_anomaly * 2.0).sin()
            - 0.185_116 * sun_anomaly.sin()
            - 0.114_332 * (latitude_arg * 2.0).sin();

        normalize_longitude(Degrees::new(longitude))
    }
}

impl EphemerisProvider for AnalyticEphemeris {
    fn position(&self, jd: JulianDay, body: CelestialBody) -> EphemerisResult<Degrees> {
        let longitude = match body {
            CelestialBody::Sun => Self::sun_longitude(jd),
            CelestialBody::Moon => Self::moon_longitude(jd),
        };
        Ok(longitude)
    }

    fn name(&self) -> &'static str {
        "analytic"
    }
}
