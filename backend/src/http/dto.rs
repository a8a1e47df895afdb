//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies reuse the form shape of [`BirthRecord`]
//! (`{name, dob, time, gender, country}`) plus an optional `lang`.

use serde::{Deserialize, Serialize};

use crate::fate::{BaziChart, ChineseZodiac, CompatibilityBreakdown, FateProfile};
use crate::models::{BirthRecord, Currency, Locale};
use crate::payment::{PaymentKind, PaymentLink};

/// Body of `POST /v1/fate/single`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleRequest {
    #[serde(flatten)]
    pub person: BirthRecord,
    #[serde(default)]
    pub lang: Option<Locale>,
}

/// Body of `POST /v1/fate/couple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoupleRequest {
    pub user1: BirthRecord,
    pub user2: BirthRecord,
    #[serde(default)]
    pub lang: Option<Locale>,
}

/// Body of `POST /v1/feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
    #[serde(default)]
    pub lang: Option<Locale>,
}

/// Body of `POST /v1/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub input: String,
    #[serde(default)]
    pub lang: Option<Locale>,
}

/// Query of `GET /v1/payment-link`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLinkQuery {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Active submission sink
    pub sink: String,
    /// Active ephemeris provider
    pub ephemeris: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneListResponse {
    pub timezones: Vec<String>,
}

/// Whole catalog of one locale, keyed by dotted path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub locale: Locale,
    pub messages: std::collections::BTreeMap<String, String>,
}

/// Outcome of the best-effort persistence step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persistence {
    pub saved: bool,
    /// Localized notice shown under the result.
    pub notice: String,
}

/// One computed profile as rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    pub solar_position: f64,
    /// `solar_position` with two decimals.
    pub solar_position_display: String,
    pub life_path_number: u8,
    pub chinese_zodiac: ChineseZodiac,
    pub bazi: BaziChart,
    pub julian_day: f64,
}

impl From<&FateProfile> for ProfileDto {
    fn from(profile: &FateProfile) -> Self {
        Self {
            solar_position: profile.solar_position.value(),
            solar_position_display: profile.solar_position_display(),
            life_path_number: profile.life_path_number.value(),
            chinese_zodiac: profile.chinese_zodiac,
            bazi: profile.bazi.clone(),
            julian_day: profile.julian_day.value(),
        }
    }
}

/// Response of `POST /v1/fate/single`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResponse {
    pub name: String,
    pub profile: ProfileDto,
    /// Only for `ja` and `ko`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_note: Option<String>,
    pub persistence: Persistence,
    pub premium: PaymentLinkResponse,
}

/// Response of `POST /v1/fate/couple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoupleResponse {
    pub compatibility: u8,
    pub raw_compatibility: f64,
    /// Zodiac, day master and four pillars scores.
    pub breakdown: CompatibilityBreakdown,
    pub user1: ProfileDto,
    pub user2: ProfileDto,
    pub persistence: Persistence,
    pub premium: PaymentLinkResponse,
}

/// Response of `POST /v1/feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub saved: bool,
    pub notice: String,
}

/// Response of `POST /v1/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Localized label for the reply.
    pub label: String,
    pub reply: String,
}

/// Resolved checkout link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub currency: Currency,
    /// Minor units of `currency`.
    pub amount: u64,
    pub url: String,
    /// Localized call to action.
    pub label: String,
}

impl PaymentLinkResponse {
    pub fn new(link: PaymentLink, label: impl Into<String>) -> Self {
        Self {
            kind: link.kind,
            currency: link.currency,
            amount: link.amount,
            url: link.url,
            label: label.into(),
        }
    }
}
