//! Compatibility scoring.
//!
//! The headline score compares solar positions only. The per-system
//! breakdown reads the zodiac animals and the two four pillars charts and
//! never feeds back into the headline score.

use qtty::Degrees;
use serde::{Deserialize, Serialize};

use super::bazi::BaziChart;
use super::elements::{Element, ElementRelation};
use super::zodiac::ChineseZodiac;

/// Score derived from two solar positions.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Rounded score in `0..=100`.
    pub score: u8,
    /// Unrounded `100 - (|a - b| mod 100)`.
    pub raw_score: f64,
}

/// `100 - (|a - b| mod 100)`.
///
/// The absolute difference of two positions in `[0, 360)` can exceed 100, so
/// the modulo wraps before the subtraction. This is not a linear similarity
/// measure and must not be turned into one.
pub fn compatibility_score(a: Degrees, b: Degrees) -> CompatibilityScore {
    let raw_score = 100.0 - (a.value() - b.value()).abs() % 100.0;
    CompatibilityScore {
        score: raw_score.round().clamp(0.0, 100.0) as u8,
        raw_score,
    }
}

/// Scores of each traditional system, all in `0..=100`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    /// Affinity of the two zodiac animals.
    pub zodiac: u8,
    /// Relation of the two day master elements.
    pub elemental: u8,
    pub day_master_relation: ElementRelation,
    /// Element balance and clashes of the two charts.
    pub bazi: u8,
    /// Rounded mean of the three scores above.
    pub overall: u8,
}

const BAZI_BASE: i32 = 70;

impl CompatibilityBreakdown {
    pub fn new(
        zodiac: (&ChineseZodiac, &ChineseZodiac),
        bazi: (&BaziChart, &BaziChart),
    ) -> Self {
        let zodiac_score = zodiac.0.animal.affinity(zodiac.1.animal);

        let day_master_relation =
            ElementRelation::between(bazi.0.day_master_element(), bazi.1.day_master_element());
        let elemental = match day_master_relation {
            ElementRelation::Same | ElementRelation::Generating => 80,
            ElementRelation::Controlling => 70,
        };

        let bazi_score = bazi_score(bazi.0, bazi.1);
        let overall = ((zodiac_score as f64 + elemental as f64 + bazi_score as f64) / 3.0).round() as u8;

        Self {
            zodiac: zodiac_score,
            elemental,
            day_master_relation,
            bazi: bazi_score,
            overall,
        }
    }
}

/// Chart-to-chart score around a neutral 70.
///
/// - same dominant element: +10; dominant elements that feed each other: +15
/// - an element missing from both charts: -5
/// - both charts have clashes: -10 when they share one, +5 otherwise
pub fn bazi_score(a: &BaziChart, b: &BaziChart) -> u8 {
    let mut score = BAZI_BASE;

    let (dominant_a, dominant_b) = (a.element_balance.dominant(), b.element_balance.dominant());
    score += match ElementRelation::between(dominant_a, dominant_b) {
        ElementRelation::Same => 10,
        ElementRelation::Generating => 15,
        ElementRelation::Controlling => 0,
    };

    let missing_b = b.element_balance.missing();
    let shared_missing: Vec<Element> = a
        .element_balance
        .missing()
        .into_iter()
        .filter(|e| missing_b.contains(e))
        .collect();
    if !shared_missing.is_empty() {
        score -= 5;
    }

    if !a.clashes.is_empty() && !b.clashes.is_empty() {
        let shared = a
            .clashes
            .iter()
            .any(|ca| b.clashes.iter().any(|cb| ca.same_pair(cb)));
        score += if shared { -10 } else { 5 };
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fate::zodiac::chinese_zodiac;
    use chrono::{NaiveDate, NaiveTime};

    fn chart(y: i32, m: u32, d: u32, h: u32) -> BaziChart {
        BaziChart::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
        )
    }

    fn score(a: f64, b: f64) -> u8 {
        compatibility_score(Degrees::new(a), Degrees::new(b)).score
    }

    #[test]
    fn test_identical_positions() {
        let wrapped = Degrees::new(370.0).wrap_pos();
        assert_eq!(compatibility_score(Degrees::new(10.0), wrapped).score, 100);
    }

    #[test]
    fn test_wrapping_difference() {
        // |5 - 358| = 353, 353 mod 100 = 53, 100 - 53 = 47
        assert_eq!(score(5.0, 358.0), 47);
    }

    #[test]
    fn test_difference_of_exactly_one_hundred() {
        assert_eq!(score(0.0, 100.0), 100);
        assert_eq!(score(50.0, 250.0), 100);
    }

    #[test]
    fn test_rounding() {
        let result = compatibility_score(Degrees::new(10.0), Degrees::new(20.4));
        assert!((result.raw_score - 89.6).abs() < 1e-9);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_near_zero() {
        assert_eq!(score(0.0, 99.9), 0);
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(score(123.4, 301.7), score(301.7, 123.4));
    }

    #[test]
    fn test_bazi_shared_clash_lowers_score() {
        // Both charts clash Wu-Zi; wood and fire dominants feed each other
        let a = chart(1990, 1, 1, 0);
        let b = chart(1990, 1, 5, 0);
        assert_eq!(bazi_score(&a, &b), 75);
        assert_eq!(bazi_score(&b, &a), 75);
    }

    #[test]
    fn test_bazi_distinct_clashes_raise_score() {
        // Wu-Zi against Xu-Chen
        let a = chart(1990, 1, 1, 0);
        let c = chart(1990, 1, 10, 8);
        assert_eq!(bazi_score(&a, &c), 90);
    }

    #[test]
    fn test_bazi_shared_missing_element() {
        // Both charts lack fire; earth against water dominants
        let hana = chart(1995, 3, 7, 14);
        let other = chart(1995, 7, 12, 14);
        assert_eq!(bazi_score(&hana, &other), 65);
        assert_eq!(bazi_score(&hana, &hana), 75);
    }

    #[test]
    fn test_breakdown_of_reference_pair() {
        let date_a = NaiveDate::from_ymd_opt(1992, 10, 13).unwrap();
        let date_b = NaiveDate::from_ymd_opt(1995, 3, 7).unwrap();
        let chart_a = BaziChart::new(date_a, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
        let chart_b = BaziChart::new(date_b, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        let (zodiac_a, zodiac_b) = (chinese_zodiac(date_a), chinese_zodiac(date_b));

        let breakdown = CompatibilityBreakdown::new((&zodiac_a, &zodiac_b), (&chart_a, &chart_b));
        // Monkey and Pig; fire day master against metal
        assert_eq!(breakdown.zodiac, 60);
        assert_eq!(breakdown.day_master_relation, ElementRelation::Controlling);
        assert_eq!(breakdown.elemental, 70);
        assert_eq!(breakdown.bazi, 70);
        assert_eq!(breakdown.overall, 67);

        let reversed = CompatibilityBreakdown::new((&zodiac_b, &zodiac_a), (&chart_b, &chart_a));
        assert_eq!(reversed, breakdown);
    }
}
