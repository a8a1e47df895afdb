//! Life path number.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Numerology digit in `1..=9`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifePathNumber(u8);

impl LifePathNumber {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for LifePathNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Life path number of a birth date.
///
/// Sums every decimal digit of day, month and year and maps the total with
/// `sum % 9 + 1`. This is a single modulo step, not the repeated digit
/// reduction of traditional numerology, and the two disagree for many dates
/// (a sum of 27 gives 1 here, 9 traditionally).
pub fn life_path_number(date: NaiveDate) -> LifePathNumber {
    let sum = digit_sum(date.day()) + digit_sum(date.month()) + digit_sum(date.year().unsigned_abs());
    LifePathNumber((sum % 9 + 1) as u8)
}
