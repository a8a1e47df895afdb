//! HTTP handlers for the REST API.
//!
//! Computation errors fail the request. Persistence errors never do: the
//! result is returned with `persistence.saved = false` and a generic notice.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    ChatRequest, ChatResponse, CoupleRequest, CoupleResponse, FeedbackRequest, FeedbackResponse,
    HealthResponse, MessagesResponse, PaymentLinkQuery, PaymentLinkResponse, Persistence,
    ProfileDto, SingleRequest, SingleResponse, TimezoneListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::chat::ChatError;
use crate::fate::FateError;
use crate::i18n::MessageKey;
use crate::models::{Locale, TimeZoneId};
use crate::payment::PaymentKind;
use crate::submission::{CoupleRecord, FeedbackRecord, SubmissionRecord};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Helpers
// =============================================================================

fn fate_error(state: &AppState, locale: Locale, err: FateError) -> AppError {
    let key = match &err {
        FateError::AmbiguousOrInvalidLocalTime { .. } => MessageKey::ErrorLocalTime,
        FateError::PreconditionFailed { .. } => MessageKey::CoupleSameGender,
        FateError::EphemerisUnavailable(_) => MessageKey::ErrorEphemeris,
    };
    tracing::info!(error = %err, "Fate computation rejected");
    AppError::from_fate(err, state.catalog.get(locale, key))
}

fn join_error(err: tokio::task::JoinError) -> AppError {
    AppError::Internal(format!("Task join error: {}", err))
}

/// Submit one record; failures become a notice, never an error.
async fn persist(
    state: &AppState,
    locale: Locale,
    record: SubmissionRecord,
    saved_key: MessageKey,
    failed_key: MessageKey,
) -> Persistence {
    match state.sink.submit(&record).await {
        Ok(ack) => {
            tracing::debug!(kind = %record.kind(), status = ack.status, "Submission stored");
            Persistence {
                saved: true,
                notice: state.catalog.get(locale, saved_key).to_string(),
            }
        }
        Err(e) => {
            tracing::warn!(kind = %record.kind(), error = %e, "Submission failed");
            Persistence {
                saved: false,
                notice: state.catalog.get(locale, failed_key).to_string(),
            }
        }
    }
}

fn regional_note(state: &AppState, locale: Locale) -> Option<String> {
    let key = match locale {
        Locale::Ja => MessageKey::RegionalJa,
        Locale::Ko => MessageKey::RegionalKo,
        Locale::En | Locale::Zh => return None,
    };
    Some(state.catalog.get(locale, key).to_string())
}

fn premium_link(state: &AppState, kind: PaymentKind, locale: Locale) -> PaymentLinkResponse {
    let label = match kind {
        PaymentKind::Subscription => MessageKey::PremiumSubscription,
        PaymentKind::Single => MessageKey::SinglePremiumPrompt,
        PaymentKind::Couple => MessageKey::CouplePremiumPrompt,
    };
    PaymentLinkResponse::new(
        state.payments.link(kind, locale),
        state.catalog.get(locale, label),
    )
}

// =============================================================================
// Health and reference data
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sink: state.sink.name().to_string(),
        ephemeris: state.calculator.ephemeris_name().to_string(),
    })
}

/// GET /v1/timezones
///
/// Zones in selector order.
pub async fn list_timezones() -> Json<TimezoneListResponse> {
    Json(TimezoneListResponse {
        timezones: TimeZoneId::ALL.iter().map(|z| z.as_str().to_string()).collect(),
    })
}

/// GET /v1/messages/{locale}
pub async fn get_messages(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> HandlerResult<MessagesResponse> {
    let locale: Locale = locale.parse().map_err(AppError::NotFound)?;
    let messages = state
        .catalog
        .entries(locale)
        .into_iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect();
    Ok(Json(MessagesResponse { locale, messages }))
}

// =============================================================================
// Fate computation
// =============================================================================

/// POST /v1/fate/single
pub async fn compute_single(
    State(state): State<AppState>,
    Json(request): Json<SingleRequest>,
) -> HandlerResult<SingleResponse> {
    let locale = state.locale(request.lang);
    let person = request.person;

    // Ephemeris lookups may hit the filesystem.
    let calculator = state.calculator.clone();
    let input = person.clone();
    let profile = tokio::task::spawn_blocking(move || calculator.compute_fate_profile(&input))
        .await
        .map_err(join_error)?
        .map_err(|e| fate_error(&state, locale, e))?;

    let name = person.name.clone();
    let persistence = persist(
        &state,
        locale,
        SubmissionRecord::from(person),
        MessageKey::DataSaved,
        MessageKey::DataSaveError,
    )
    .await;

    Ok(Json(SingleResponse {
        name,
        profile: ProfileDto::from(&profile),
        regional_note: regional_note(&state, locale),
        persistence,
        premium: premium_link(&state, PaymentKind::Single, locale),
    }))
}

/// POST /v1/fate/couple
pub async fn compute_couple(
    State(state): State<AppState>,
    Json(request): Json<CoupleRequest>,
) -> HandlerResult<CoupleResponse> {
    let locale = state.locale(request.lang);
    let CoupleRequest { user1, user2, .. } = request;

    let calculator = state.calculator.clone();
    let (a, b) = (user1.clone(), user2.clone());
    let result = tokio::task::spawn_blocking(move || calculator.compute_compatibility(&a, &b))
        .await
        .map_err(join_error)?
        .map_err(|e| fate_error(&state, locale, e))?;

    let record = CoupleRecord {
        user1,
        user2,
        compatibility: result.score,
    };
    let persistence = persist(
        &state,
        locale,
        SubmissionRecord::from(record),
        MessageKey::DataSaved,
        MessageKey::DataSaveError,
    )
    .await;

    Ok(Json(CoupleResponse {
        compatibility: result.score,
        raw_compatibility: result.raw_score,
        breakdown: result.breakdown,
        user1: ProfileDto::from(&result.first),
        user2: ProfileDto::from(&result.second),
        persistence,
        premium: premium_link(&state, PaymentKind::Couple, locale),
    }))
}

// =============================================================================
// Feedback, chat, payment
// =============================================================================

/// POST /v1/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> HandlerResult<FeedbackResponse> {
    let locale = state.locale(request.lang);
    if request.feedback.trim().is_empty() {
        return Err(AppError::BadRequest("Feedback text is empty".to_string()));
    }

    let record = FeedbackRecord {
        feedback: request.feedback,
        lang: locale,
    };
    let Persistence { saved, notice } = persist(
        &state,
        locale,
        SubmissionRecord::from(record),
        MessageKey::FeedbackSuccess,
        MessageKey::FeedbackError,
    )
    .await;

    Ok(Json(FeedbackResponse { saved, notice }))
}

/// POST /v1/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> HandlerResult<ChatResponse> {
    let locale = state.locale(request.lang);
    if request.input.trim().is_empty() {
        return Err(AppError::BadRequest(ChatError::EmptyInput.to_string()));
    }
    let unavailable = state.catalog.get(locale, MessageKey::ChatbotUnavailable);

    let responder = state.responder.as_ref().ok_or_else(|| AppError::ChatUnavailable {
        message: unavailable.to_string(),
        details: None,
    })?;

    let reply = responder
        .respond(&request.input)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Chat request failed");
            AppError::from_chat(e, unavailable)
        })?;

    Ok(Json(ChatResponse {
        label: state.catalog.get(locale, MessageKey::ChatbotResponse).to_string(),
        reply,
    }))
}

/// GET /v1/payment-link?type={subscription|single|couple}&lang={locale}
pub async fn get_payment_link(
    State(state): State<AppState>,
    Query(query): Query<PaymentLinkQuery>,
) -> HandlerResult<PaymentLinkResponse> {
    let kind: PaymentKind = query.kind.parse()?;
    let locale = match query.lang {
        Some(lang) => lang.parse::<Locale>().map_err(AppError::BadRequest)?,
        None => state.default_locale,
    };
    Ok(Json(premium_link(&state, kind, locale)))
}
