//! The engine handle shared by every request.

use crate::i18n::locale::{resolve_locale, RequestSignals};
use crate::i18n::translator;
use crate::i18n::{ConfigError, I18nOptions, MetricsReport, TranslationMetrics, ValidatedConfig};
use arc_swap::ArcSwap;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Translation engine.
///
/// Cheap to clone; clones share configuration and metrics. Reads take a
/// lock-free snapshot of the active configuration. Reconfiguration builds a
/// complete new configuration and swaps it in at once, so a translation never
/// observes a mix of old and new settings.
#[derive(Clone)]
pub struct I18n {
    config: Arc<ArcSwap<ValidatedConfig>>,
    /// Serializes merge-then-swap across concurrent reconfigurations.
    update: Arc<Mutex<()>>,
    metrics: Arc<TranslationMetrics>,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("config", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl I18n {
    /// Validate `options` and build an engine.
    pub fn new(options: I18nOptions) -> Result<Self, ConfigError> {
        let config = ValidatedConfig::validate(options)?;
        debug!(
            "i18n: engine created with {} locales, default \"{}\"",
            config.messages().len(),
            config.default_locale()
        );

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            update: Arc::new(Mutex::new(())),
            metrics: Arc::new(TranslationMetrics::new()),
        })
    }

    /// Build an engine from options in the inbound JSON schema.
    pub fn from_value(raw: &Value) -> Result<Self, ConfigError> {
        Self::new(I18nOptions::from_value(raw)?)
    }

    /// The configuration active right now.
    pub fn snapshot(&self) -> Arc<ValidatedConfig> {
        self.config.load_full()
    }

    /// Current default locale.
    pub fn locale(&self) -> String {
        self.config.load().default_locale().to_string()
    }

    /// Translate `keyref` into `locale` (the default locale when `None`).
    ///
    /// Never fails: untranslatable or unknown keys come back unchanged.
    pub fn translate(&self, keyref: &str, locale: Option<&str>) -> String {
        translator::translate(&self.config.load(), &self.metrics, keyref, locale)
    }

    /// Like [`I18n::translate`] for a raw JSON value; non-strings pass through.
    pub fn translate_value(&self, keyref: &Value, locale: Option<&str>) -> Value {
        translator::translate_value(&self.config.load(), &self.metrics, keyref, locale)
    }

    /// Merge `overrides` over the active configuration and swap the result in.
    ///
    /// On error the active configuration is left exactly as it was.
    pub fn reconfigure(&self, overrides: I18nOptions) -> Result<(), ConfigError> {
        // A poisoned lock guards no data, so recover it.
        let _guard = self
            .update
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let next = self.config.load().merged(overrides)?;
        debug!(
            "i18n: reconfigured with {} locales, default \"{}\"",
            next.messages().len(),
            next.default_locale()
        );
        self.config.store(Arc::new(next));
        Ok(())
    }

    /// [`I18n::reconfigure`] with overrides in the inbound JSON schema.
    pub fn reconfigure_value(&self, raw: &Value) -> Result<(), ConfigError> {
        self.reconfigure(I18nOptions::from_value(raw)?)
    }

    /// Bind a request: pick its locale and pin the current configuration.
    pub fn bind(&self, signals: &RequestSignals) -> RequestI18n {
        let config = self.snapshot();
        let locale = resolve_locale(signals, &config);

        RequestI18n {
            locale,
            config,
            metrics: Arc::clone(&self.metrics),
        }
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }
}

/// Translation bound to one request.
///
/// Holds the locale chosen for the request and the configuration snapshot
/// taken when the request was bound.
#[derive(Debug, Clone)]
pub struct RequestI18n {
    locale: String,
    config: Arc<ValidatedConfig>,
    metrics: Arc<TranslationMetrics>,
}

impl RequestI18n {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate into the request's locale.
    pub fn t(&self, keyref: &str) -> String {
        self.t_in(keyref, &self.locale)
    }

    /// Translate into an explicit locale, ignoring the request's.
    pub fn t_in(&self, keyref: &str, locale: &str) -> String {
        translator::translate(&self.config, &self.metrics, keyref, Some(locale))
    }

    /// Translate a raw JSON value into the request's locale.
    pub fn t_value(&self, keyref: &Value) -> Value {
        translator::translate_value(&self.config, &self.metrics, keyref, Some(self.locale.as_str()))
    }
}
