#![allow(dead_code)]

#[cfg(feature = "http-server")]
mod sink_server;
#[cfg(feature = "http-server")]
pub use sink_server::*;

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use destinypath::models::{BirthRecord, Gender, TimeZoneId};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process
/// environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn birth(
    name: &str,
    (y, m, d): (i32, u32, u32),
    (hh, mm): (u32, u32),
    gender: Gender,
    zone: TimeZoneId,
) -> BirthRecord {
    BirthRecord::new(
        name,
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(hh, mm, 0).unwrap(),
        gender,
        zone,
    )
}

pub fn hana() -> BirthRecord {
    birth("Hana", (1995, 3, 7), (14, 30), Gender::Female, TimeZoneId::AsiaTokyo)
}

pub fn minjun() -> BirthRecord {
    birth("Minjun", (1992, 10, 13), (8, 5), Gender::Male, TimeZoneId::AsiaSeoul)
}
