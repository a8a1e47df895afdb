//! # DestinyPath Backend
//!
//! Fate profile computation for the DestinyPath service.
//!
//! Given a person's birth date, time and time zone, the backend computes the
//! apparent ecliptic longitude of the Sun at the moment of birth (the "solar
//! position") and a numerological life path number, along with the Chinese
//! zodiac and the four pillars chart of the birth. Two profiles combine into a
//! compatibility score with a per-system breakdown. Results are persisted on a
//! best-effort basis.
//!
//! ## Architecture
//!
//! - [`models`]: Birth records, supported zones and locales, Julian Days
//! - [`ephemeris`]: Solar and lunar longitude providers (analytic, tabulated)
//! - [`fate`]: Profile, zodiac, four pillars and compatibility computation
//! - [`submission`]: Persistence sinks for form submissions
//! - [`chat`]: Stateless text-generation assistant
//! - [`i18n`]: Validated message catalogs
//! - [`payment`]: Premium checkout links
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use destinypath::ephemeris::AnalyticEphemeris;
//! use destinypath::fate::{FateCalculator, LocalTimePolicy};
//!
//! let calculator = FateCalculator::new(Arc::new(AnalyticEphemeris::new()), LocalTimePolicy::Reject);
//! let profile = calculator.compute_fate_profile(&birth)?;
//! println!("{} / {}", profile.solar_position_display(), profile.life_path_number);
//! ```

pub mod chat;
pub mod config;
pub mod ephemeris;
pub mod fate;
pub mod i18n;
pub mod models;
pub mod payment;
pub mod submission;

#[cfg(feature = "http-server")]
pub mod http;
