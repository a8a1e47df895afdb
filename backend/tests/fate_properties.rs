//! Property tests of the fate computation.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime};
use proptest::prelude::*;
use qtty::Degrees;

use destinypath::ephemeris::AnalyticEphemeris;
use destinypath::fate::{
    chinese_zodiac, compatibility_score, life_path_number, FateCalculator, FateError,
    LocalTimePolicy,
};
use destinypath::models::{BirthRecord, Gender, TimeZoneId};

fn calculator(policy: LocalTimePolicy) -> FateCalculator {
    FateCalculator::new(Arc::new(AnalyticEphemeris::new()), policy)
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn zone() -> impl Strategy<Value = TimeZoneId> {
    prop::sample::select(TimeZoneId::ALL.to_vec())
}

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female)]
}

fn record() -> impl Strategy<Value = BirthRecord> {
    (date(), time(), gender(), zone())
        .prop_map(|(d, t, g, z)| BirthRecord::new("prop", d, t, g, z))
}

proptest! {
    #[test]
    fn prop_life_path_in_range(d in date()) {
        let n = life_path_number(d).value();
        prop_assert!((1..=9).contains(&n));
    }

    #[test]
    fn prop_life_path_ignores_time_and_zone(
        d in date(),
        t1 in time(),
        t2 in time(),
        z1 in zone(),
        z2 in zone(),
    ) {
        let calc = calculator(LocalTimePolicy::Earliest);
        let a = calc.compute_fate_profile(&BirthRecord::new("a", d, t1, Gender::Male, z1)).unwrap();
        let b = calc.compute_fate_profile(&BirthRecord::new("b", d, t2, Gender::Female, z2)).unwrap();
        prop_assert_eq!(a.life_path_number, b.life_path_number);
    }

    #[test]
    fn prop_profile_is_deterministic(r in record()) {
        let calc = calculator(LocalTimePolicy::Earliest);
        let first = calc.compute_fate_profile(&r).unwrap();
        let second = calc.compute_fate_profile(&r).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_solar_position_in_range(r in record()) {
        let profile = calculator(LocalTimePolicy::Earliest).compute_fate_profile(&r).unwrap();
        let sun = profile.solar_position.value();
        prop_assert!((0.0..360.0).contains(&sun));
    }

    #[test]
    fn prop_score_bounded_and_symmetric(a in 0.0..360.0f64, b in 0.0..360.0f64) {
        let ab = compatibility_score(Degrees::new(a), Degrees::new(b));
        let ba = compatibility_score(Degrees::new(b), Degrees::new(a));
        prop_assert!(ab.score <= 100);
        prop_assert!(ab.raw_score > 0.0 && ab.raw_score <= 100.0);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn prop_compatibility_symmetric(a in record(), b in record()) {
        let mut b = b;
        b.gender = match a.gender {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        };
        let calc = calculator(LocalTimePolicy::Earliest);
        let ab = calc.compute_compatibility(&a, &b).unwrap();
        let ba = calc.compute_compatibility(&b, &a).unwrap();
        prop_assert_eq!(ab.score, ba.score);
        prop_assert!(ab.score <= 100);
        prop_assert_eq!(ab.breakdown, ba.breakdown);
        prop_assert!(ab.breakdown.overall <= 100 && ab.breakdown.bazi <= 100);
    }

    #[test]
    fn prop_bazi_counts_eight_elements(r in record()) {
        let profile = calculator(LocalTimePolicy::Earliest).compute_fate_profile(&r).unwrap();
        prop_assert_eq!(profile.bazi.element_balance.total(), 8);
        prop_assert_eq!(profile.bazi.ten_gods.len(), 7);
    }

    #[test]
    fn prop_zodiac_year_is_birth_year_or_previous(d in date()) {
        let z = chinese_zodiac(d);
        prop_assert!(z.zodiac_year == d.year() || z.zodiac_year == d.year() - 1);
        // Only January and February births can precede the new year
        if d.month() > 2 {
            prop_assert_eq!(z.zodiac_year, d.year());
        }
    }

    #[test]
    fn prop_same_gender_always_fails(a in record(), b in record()) {
        let mut b = b;
        b.gender = a.gender;
        let result = calculator(LocalTimePolicy::Earliest).compute_compatibility(&a, &b);
        let failed_precondition = matches!(result, Err(FateError::PreconditionFailed { .. }));
        prop_assert!(failed_precondition);
    }
}

#[test]
fn test_reference_values() {
    let d = NaiveDate::from_ymd_opt(1995, 3, 7).unwrap();
    assert_eq!(life_path_number(d).value(), 8);
    assert_eq!(
        compatibility_score(Degrees::new(10.0), Degrees::new(370.0).wrap_pos()).score,
        100
    );
    assert_eq!(
        compatibility_score(Degrees::new(5.0), Degrees::new(358.0)).score,
        47
    );
}
