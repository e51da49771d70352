//! Engine options and their validation.
//!
//! Options arrive either as raw JSON (the inbound configuration schema) or
//! through the builder methods on [`I18nOptions`]. Either way they only become
//! usable once [`ValidatedConfig::validate`] accepts them.

use crate::i18n::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Locale tag -> message tree.
pub type Catalog = Map<String, Value>;

/// Header read for the request locale unless configured otherwise.
pub const DEFAULT_LOCALE_HEADER: &str = "application-language";

/// Query parameter read for the request locale unless configured otherwise.
pub const DEFAULT_LOCALE_QUERY: &str = "locale";

/// Body field read for the request locale unless configured otherwise.
pub const DEFAULT_LOCALE_BODY: &str = "locale";

/// Names of the request fields that may carry a locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleSources {
    pub header: String,
    pub query: String,
    pub body: String,
}

impl Default for LocaleSources {
    fn default() -> Self {
        Self {
            header: DEFAULT_LOCALE_HEADER.to_string(),
            query: DEFAULT_LOCALE_QUERY.to_string(),
            body: DEFAULT_LOCALE_BODY.to_string(),
        }
    }
}

impl LocaleSources {
    fn merged(&self, overrides: LocaleSourceOptions) -> Self {
        Self {
            header: overrides.header.unwrap_or_else(|| self.header.clone()),
            query: overrides.query.unwrap_or_else(|| self.query.clone()),
            body: overrides.body.unwrap_or_else(|| self.body.clone()),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.header.is_empty() {
            return Err(ConfigError::EmptyLocaleSource("header"));
        }
        if self.query.is_empty() {
            return Err(ConfigError::EmptyLocaleSource("query"));
        }
        if self.body.is_empty() {
            return Err(ConfigError::EmptyLocaleSource("body"));
        }
        Ok(())
    }
}

/// Partial locale source names; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocaleSourceOptions {
    pub header: Option<String>,
    pub query: Option<String>,
    pub body: Option<String>,
}

/// Caller-supplied options, every field optional.
///
/// Used both for construction (where `messages` and `default_locale` are
/// required by validation) and for reconfiguration (where unset fields keep
/// the values of the active configuration).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct I18nOptions {
    pub messages: Option<Catalog>,
    pub default_locale: Option<String>,
    pub allow_fallback: Option<bool>,
    pub warn_on_fallback: Option<bool>,
    pub warn_on_missing: Option<bool>,
    pub locale_sources: LocaleSourceOptions,
}

impl I18nOptions {
    /// Options with the two required fields set.
    pub fn new(messages: Catalog, default_locale: impl Into<String>) -> Self {
        Self {
            messages: Some(messages),
            default_locale: Some(default_locale.into()),
            ..Self::default()
        }
    }

    /// Parse options from the inbound JSON schema.
    ///
    /// Only checks shape: a non-object input or a known field of the wrong
    /// type is rejected here. Semantic checks happen in
    /// [`ValidatedConfig::validate`]. Unknown fields are ignored and `null`
    /// counts as unset.
    pub fn from_value(raw: &Value) -> Result<Self, ConfigError> {
        let obj = raw.as_object().ok_or(ConfigError::NotAnObject)?;

        Ok(Self {
            messages: field(obj, "messages")?,
            default_locale: field(obj, "defaultLocale")?,
            allow_fallback: field(obj, "allowFallback")?,
            warn_on_fallback: field(obj, "warnOnFallback")?,
            warn_on_missing: field(obj, "warnOnMissing")?,
            locale_sources: field(obj, "localeSources")?.unwrap_or_default(),
        })
    }

    pub fn with_messages(mut self, messages: Catalog) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn with_allow_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = Some(allow);
        self
    }

    pub fn with_warn_on_fallback(mut self, warn: bool) -> Self {
        self.warn_on_fallback = Some(warn);
        self
    }

    pub fn with_warn_on_missing(mut self, warn: bool) -> Self {
        self.warn_on_missing = Some(warn);
        self
    }

    pub fn with_locale_header(mut self, name: impl Into<String>) -> Self {
        self.locale_sources.header = Some(name.into());
        self
    }

    pub fn with_locale_query(mut self, name: impl Into<String>) -> Self {
        self.locale_sources.query = Some(name.into());
        self
    }

    pub fn with_locale_body(mut self, name: impl Into<String>) -> Self {
        self.locale_sources.body = Some(name.into());
        self
    }
}

fn field<T: DeserializeOwned>(obj: &Catalog, name: &'static str) -> Result<Option<T>, ConfigError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|err| ConfigError::InvalidField {
                field: name,
                reason: err.to_string(),
            }),
    }
}

/// A configuration that passed validation.
///
/// Never mutated after construction. The catalog sits behind an `Arc` so a
/// reconfiguration that leaves `messages` alone shares it with the previous
/// snapshot instead of copying it.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    messages: Arc<Catalog>,
    default_locale: String,
    allow_fallback: bool,
    warn_on_fallback: bool,
    warn_on_missing: bool,
    locale_sources: LocaleSources,
}

impl ValidatedConfig {
    /// Validate options for a fresh engine, filling in documented defaults.
    pub fn validate(options: I18nOptions) -> Result<Self, ConfigError> {
        let messages = options.messages.ok_or(ConfigError::MissingMessages)?;
        let default_locale = options
            .default_locale
            .ok_or(ConfigError::MissingDefaultLocale)?;

        Self {
            messages: Arc::new(messages),
            default_locale,
            allow_fallback: options.allow_fallback.unwrap_or(true),
            warn_on_fallback: options.warn_on_fallback.unwrap_or(false),
            warn_on_missing: options.warn_on_missing.unwrap_or(false),
            locale_sources: LocaleSources::default().merged(options.locale_sources),
        }
        .checked()
    }

    /// Overlay `overrides` on this configuration and validate the result.
    ///
    /// `self` is left untouched whether or not the merge succeeds.
    pub fn merged(&self, overrides: I18nOptions) -> Result<Self, ConfigError> {
        Self {
            messages: overrides
                .messages
                .map(Arc::new)
                .unwrap_or_else(|| Arc::clone(&self.messages)),
            default_locale: overrides
                .default_locale
                .unwrap_or_else(|| self.default_locale.clone()),
            allow_fallback: overrides.allow_fallback.unwrap_or(self.allow_fallback),
            warn_on_fallback: overrides.warn_on_fallback.unwrap_or(self.warn_on_fallback),
            warn_on_missing: overrides.warn_on_missing.unwrap_or(self.warn_on_missing),
            locale_sources: self.locale_sources.merged(overrides.locale_sources),
        }
        .checked()
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.messages.is_empty() {
            return Err(ConfigError::EmptyMessages);
        }
        if self.default_locale.is_empty() {
            return Err(ConfigError::EmptyDefaultLocale);
        }
        match self.messages.get(&self.default_locale) {
            None => {
                return Err(ConfigError::UnknownDefaultLocale(self.default_locale.clone()))
            }
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(ConfigError::DefaultLocaleNotTree(self.default_locale.clone()))
            }
        }
        self.locale_sources.check()?;
        Ok(self)
    }

    pub fn messages(&self) -> &Catalog {
        &self.messages
    }

    /// Message tree for `locale`, if the catalog has one.
    pub fn tree(&self, locale: &str) -> Option<&Value> {
        self.messages.get(locale)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn allow_fallback(&self) -> bool {
        self.allow_fallback
    }

    pub fn warn_on_fallback(&self) -> bool {
        self.warn_on_fallback
    }

    pub fn warn_on_missing(&self) -> bool {
        self.warn_on_missing
    }

    pub fn locale_sources(&self) -> &LocaleSources {
        &self.locale_sources
    }
}
