//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::chat::{ConversationalResponder, HttpResponder};
use crate::config::AppConfig;
use crate::ephemeris::create_provider;
use crate::fate::FateCalculator;
use crate::i18n::Catalog;
use crate::models::Locale;
use crate::payment::PaymentLinks;
use crate::submission::{SubmissionSink, SubmissionSinkFactory};

/// Shared application state passed to all handlers.
///
/// Everything here is immutable after startup or internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub calculator: FateCalculator,
    pub sink: Arc<dyn SubmissionSink>,
    /// `None` disables `/v1/chat`.
    pub responder: Option<Arc<dyn ConversationalResponder>>,
    pub catalog: Arc<Catalog>,
    pub payments: PaymentLinks,
    /// Locale for requests that do not name one.
    pub default_locale: Locale,
}

impl AppState {
    /// State with chat disabled, default payment host and English default.
    pub fn new(calculator: FateCalculator, sink: Arc<dyn SubmissionSink>, catalog: Catalog) -> Self {
        Self {
            calculator,
            sink,
            responder: None,
            catalog: Arc::new(catalog),
            payments: PaymentLinks::default(),
            default_locale: Locale::default(),
        }
    }

    pub fn with_responder(mut self, responder: Arc<dyn ConversationalResponder>) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn with_payments(mut self, payments: PaymentLinks) -> Self {
        self.payments = payments;
        self
    }

    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Build every component from validated configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let ephemeris = create_provider(
            config.ephemeris_source()?,
            config.ephemeris.data_path.clone(),
        )
        .map_err(anyhow::Error::msg)?;
        let calculator = FateCalculator::new(ephemeris, config.local_time_policy()?);

        let sink = SubmissionSinkFactory::create(config.sink_kind()?, &config.submission)
            .context("Failed to create submission sink")?;

        let catalog = match &config.server.catalog_dir {
            Some(dir) => Catalog::from_dir(dir)
                .with_context(|| format!("Failed to load catalog from {}", dir.display()))?,
            None => Catalog::builtin().context("Built-in catalog is incomplete")?,
        };

        let mut state = Self::new(calculator, sink, catalog)
            .with_payments(PaymentLinks::new(config.payment.base_url.clone()))
            .with_default_locale(config.default_locale()?);

        if let Some(endpoint) = &config.chat.endpoint {
            let responder = HttpResponder::new(
                endpoint.clone(),
                config.chat.api_token.clone(),
                config.chat.max_length,
                Duration::from_secs(config.chat.timeout_secs),
            )
            .context("Failed to create chat responder")?;
            state = state.with_responder(Arc::new(responder));
        }

        Ok(state)
    }

    /// Requested locale, or the configured default.
    pub fn locale(&self, requested: Option<Locale>) -> Locale {
        requested.unwrap_or(self.default_locale)
    }
}
