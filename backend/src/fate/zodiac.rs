//! Chinese zodiac of a birth date.
//!
//! The zodiac year starts at Chinese New Year, not on January 1st, so births
//! in January or early February usually belong to the previous year's animal.
//! New Year dates are tabulated for 1900 to 2030; outside that range the year
//! is assumed to turn on February 5th.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::elements::{Element, Polarity};

const FIRST_TABULATED_YEAR: i32 = 1900;

/// `(month, day)` of Chinese New Year, one entry per year from 1900.
const NEW_YEAR_DATES: [(u32, u32); 131] = [
    (1, 31), (2, 19), (2, 8), (1, 29), (2, 16), (2, 4),
    (1, 25), (2, 13), (2, 2), (1, 22), (2, 10), (1, 30),
    (2, 18), (2, 6), (1, 26), (2, 14), (2, 3), (1, 23),
    (2, 11), (2, 1), (2, 20), (2, 8), (1, 28), (2, 16),
    (2, 5), (1, 24), (2, 13), (2, 2), (1, 23), (2, 10),
    (1, 30), (2, 17), (2, 6), (1, 26), (2, 14), (2, 4),
    (1, 24), (2, 11), (1, 31), (2, 19), (2, 8), (1, 27),
    (2, 15), (2, 5), (1, 25), (2, 13), (2, 2), (1, 22),
    (2, 10), (1, 29), (2, 17), (2, 6), (1, 27), (2, 14),
    (2, 3), (1, 24), (2, 12), (1, 31), (2, 18), (2, 8),
    (1, 28), (2, 15), (2, 5), (1, 25), (2, 13), (2, 2),
    (1, 21), (2, 9), (1, 30), (2, 17), (2, 6), (1, 27),
    (2, 15), (2, 3), (1, 23), (2, 11), (1, 31), (2, 18),
    (2, 7), (1, 28), (2, 16), (2, 5), (1, 25), (2, 13),
    (2, 2), (2, 20), (2, 9), (1, 29), (2, 17), (2, 6),
    (1, 27), (2, 15), (2, 4), (1, 23), (2, 10), (1, 31),
    (2, 19), (2, 7), (1, 28), (2, 16), (2, 5), (1, 24),
    (2, 12), (2, 1), (1, 22), (2, 9), (1, 29), (2, 18),
    (2, 7), (1, 26), (2, 14), (2, 3), (1, 23), (2, 10),
    (1, 31), (2, 19), (2, 8), (1, 28), (2, 16), (2, 5),
    (1, 25), (2, 12), (2, 1), (1, 22), (2, 10), (1, 29),
    (2, 17), (2, 6), (1, 26), (2, 13), (2, 3),
];

const FALLBACK_NEW_YEAR: (u32, u32) = (2, 5);

/// Pairwise affinity of the twelve animals, in cycle order.
const AFFINITY: [[u8; 12]; 12] = [
    [65, 90, 50, 70, 85, 60, 55, 60, 80, 65, 70, 75],
    [90, 65, 45, 70, 60, 85, 55, 60, 65, 80, 70, 75],
    [50, 45, 60, 65, 70, 55, 85, 60, 65, 70, 80, 75],
    [70, 70, 65, 65, 55, 60, 60, 85, 70, 75, 75, 80],
    [85, 60, 70, 55, 60, 55, 65, 70, 80, 75, 50, 65],
    [60, 85, 55, 60, 55, 60, 70, 65, 75, 80, 70, 65],
    [55, 55, 85, 60, 65, 70, 60, 75, 55, 60, 80, 65],
    [60, 60, 60, 85, 70, 65, 75, 60, 70, 55, 65, 80],
    [80, 65, 65, 70, 80, 75, 55, 70, 60, 65, 65, 60],
    [65, 80, 70, 75, 75, 80, 60, 55, 65, 60, 65, 70],
    [70, 70, 80, 75, 50, 70, 80, 65, 65, 65, 60, 70],
    [75, 75, 75, 80, 65, 65, 65, 80, 60, 70, 70, 65],
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animal {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl Animal {
    pub const CYCLE: [Animal; 12] = [
        Animal::Rat,
        Animal::Ox,
        Animal::Tiger,
        Animal::Rabbit,
        Animal::Dragon,
        Animal::Snake,
        Animal::Horse,
        Animal::Goat,
        Animal::Monkey,
        Animal::Rooster,
        Animal::Dog,
        Animal::Pig,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Animal::Rat => "Rat",
            Animal::Ox => "Ox",
            Animal::Tiger => "Tiger",
            Animal::Rabbit => "Rabbit",
            Animal::Dragon => "Dragon",
            Animal::Snake => "Snake",
            Animal::Horse => "Horse",
            Animal::Goat => "Goat",
            Animal::Monkey => "Monkey",
            Animal::Rooster => "Rooster",
            Animal::Dog => "Dog",
            Animal::Pig => "Pig",
        }
    }

    /// Affinity of two animals in `45..=90`. Symmetric.
    pub fn affinity(self, other: Animal) -> u8 {
        AFFINITY[self as usize][other as usize]
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Animal, element and polarity of one zodiac year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChineseZodiac {
    /// Gregorian year in which this zodiac year began.
    pub zodiac_year: i32,
    pub animal: Animal,
    pub element: Element,
    pub polarity: Polarity,
}

impl fmt::Display for ChineseZodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({:?})", self.element, self.animal, self.polarity)
    }
}

/// Chinese New Year of a Gregorian year.
pub fn new_year(year: i32) -> Option<NaiveDate> {
    let (month, day) = usize::try_from(year - FIRST_TABULATED_YEAR)
        .ok()
        .and_then(|i| NEW_YEAR_DATES.get(i).copied())
        .unwrap_or(FALLBACK_NEW_YEAR);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Zodiac of the year a birth date belongs to.
pub fn chinese_zodiac(date: NaiveDate) -> ChineseZodiac {
    let year = date.year();
    let before_new_year = new_year(year).is_some_and(|start| date < start);
    let zodiac_year = if before_new_year { year - 1 } else { year };

    // 4 CE opened a sexagenary cycle with a Wood Rat.
    let cycle = (zodiac_year - 4).rem_euclid(60) as usize;
    ChineseZodiac {
        zodiac_year,
        animal: Animal::CYCLE[cycle % 12],
        element: Element::ALL[(cycle / 2) % 5],
        polarity: if cycle % 2 == 0 { Polarity::Yang } else { Polarity::Yin },
    }
}
