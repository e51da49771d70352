//! Key translation against a single configuration snapshot.
//!
//! A key is looked up in the requested locale first. When it is missing
//! there (or names a group of messages instead of a message), and fallback is
//! allowed, it is looked up once more in the default locale. The second
//! lookup always targets the default locale, so there is never a third.

use crate::i18n::key_path::{resolve, Resolved};
use crate::i18n::{TranslationMetrics, ValidatedConfig};
use serde_json::Value;
use tracing::warn;

/// How a key was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation<'a> {
    /// Found in the requested locale.
    Found(&'a str),

    /// Found in the default locale after a miss in the requested one.
    Fallback(&'a str),

    /// Found nowhere; the key is shown as-is.
    Missing,

    /// Not a translatable key; returned unchanged.
    Passthrough,
}

impl<'a> Translation<'a> {
    /// The text to display for `keyref`.
    pub fn or_key(self, keyref: &'a str) -> &'a str {
        match self {
            Translation::Found(text) | Translation::Fallback(text) => text,
            Translation::Missing | Translation::Passthrough => keyref,
        }
    }
}

/// Whether `keyref` may be looked up at all.
///
/// Empty keys and keys containing whitespace are treated as literal text.
pub fn is_translatable_key(keyref: &str) -> bool {
    !keyref.is_empty() && !keyref.chars().any(char::is_whitespace)
}

/// Classify how `keyref` resolves in `locale` (the default locale when `None`).
///
/// Pure: no diagnostics, no counters.
pub fn lookup<'a>(
    config: &'a ValidatedConfig,
    keyref: &str,
    locale: Option<&str>,
) -> Translation<'a> {
    if !is_translatable_key(keyref) {
        return Translation::Passthrough;
    }

    let default_locale = config.default_locale();
    let locale = locale.unwrap_or(default_locale);

    if let Some(text) = lookup_in(config, keyref, locale) {
        return Translation::Found(text);
    }

    if locale != default_locale && config.allow_fallback() {
        if let Some(text) = lookup_in(config, keyref, default_locale) {
            return Translation::Fallback(text);
        }
    }

    Translation::Missing
}

fn lookup_in<'a>(config: &'a ValidatedConfig, keyref: &str, locale: &str) -> Option<&'a str> {
    config
        .tree(locale)
        .and_then(|tree| resolve(keyref, tree).text())
}

/// Translate `keyref`, recording the outcome and emitting the configured
/// diagnostics.
pub fn translate(
    config: &ValidatedConfig,
    metrics: &TranslationMetrics,
    keyref: &str,
    locale: Option<&str>,
) -> String {
    let translation = lookup(config, keyref, locale);
    let requested = locale.unwrap_or(config.default_locale());

    match translation {
        Translation::Found(_) => metrics.record_hit(),
        Translation::Fallback(_) => {
            metrics.record_fallback();
            if config.warn_on_fallback() {
                warn!(
                    "i18n: key \"{}.{}\" retrieved from default locale \"{}\" as fallback",
                    requested,
                    keyref,
                    config.default_locale()
                );
            }
        }
        Translation::Missing => {
            metrics.record_miss();
            if config.warn_on_missing() {
                warn!("i18n: no translation for key \"{}.{}\"", requested, keyref);
            }
        }
        Translation::Passthrough => metrics.record_passthrough(),
    }

    translation.or_key(keyref).to_string()
}

/// Translate a raw JSON value, e.g. a key read from a request body.
///
/// Strings are translated; every other value comes back unchanged.
pub fn translate_value(
    config: &ValidatedConfig,
    metrics: &TranslationMetrics,
    keyref: &Value,
    locale: Option<&str>,
) -> Value {
    match keyref {
        Value::String(key) => Value::String(translate(config, metrics, key, locale)),
        other => {
            metrics.record_passthrough();
            other.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::I18nOptions;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn messages() -> Value {
        json!({
            "pt-br": {
                "test": "Teste",
                "existentKey": "Chave existente",
                "fallbackPtBr": "Fallback pt-br ok!",
                "nested": {
                    "msg": "Primeiro nível",
                    "secondLevel": { "msg": "Segundo nível" }
                }
            },
            "en": {
                "test": "Test",
                "existentKey": "Existent key",
                "fallbackEn": "Fallback en ok!",
                "nested": {
                    "msg": "First level",
                    "secondLevel": { "msg": "Second level" }
                }
            }
        })
    }

    fn config_with(extra: Value) -> ValidatedConfig {
        let mut raw = json!({ "messages": messages(), "defaultLocale": "pt-br" });
        if let (Some(raw), Some(extra)) = (raw.as_object_mut(), extra.as_object()) {
            raw.extend(extra.clone());
        }
        ValidatedConfig::validate(I18nOptions::from_value(&raw).unwrap()).unwrap()
    }

    fn config() -> ValidatedConfig {
        config_with(json!({}))
    }

    // ==================== Key Validity Tests ====================

    #[test]
    fn test_translatable_keys() {
        assert!(is_translatable_key("test"));
        assert!(is_translatable_key("nested.secondLevel.msg"));
        assert!(!is_translatable_key(""));
        assert!(!is_translatable_key("two words"));
        assert!(!is_translatable_key(" test"));
        assert!(!is_translatable_key("tab\tkey"));
        assert!(!is_translatable_key("line\nbreak"));
    }

    // ==================== lookup Tests ====================

    #[test]
    fn test_lookup_in_requested_locale() {
        let config = config();
        assert_eq!(lookup(&config, "test", Some("en")), Translation::Found("Test"));
        assert_eq!(
            lookup(&config, "nested.secondLevel.msg", Some("en")),
            Translation::Found("Second level")
        );
    }

    #[test]
    fn test_lookup_defaults_to_default_locale() {
        let config = config();
        assert_eq!(lookup(&config, "test", None), Translation::Found("Teste"));
    }

    #[test]
    fn test_lookup_falls_back_to_default_locale() {
        let config = config();
        assert_eq!(
            lookup(&config, "fallbackPtBr", Some("en")),
            Translation::Fallback("Fallback pt-br ok!")
        );
    }

    #[test]
    fn test_lookup_unknown_locale_falls_back() {
        let config = config();
        assert_eq!(lookup(&config, "test", Some("fr")), Translation::Fallback("Teste"));
    }

    #[test]
    fn test_lookup_never_falls_back_away_from_default() {
        let config = config();
        assert_eq!(lookup(&config, "fallbackEn", Some("pt-br")), Translation::Missing);
        assert_eq!(lookup(&config, "fallbackEn", None), Translation::Missing);
    }

    #[test]
    fn test_lookup_without_fallback() {
        let config = config_with(json!({ "allowFallback": false }));
        assert_eq!(lookup(&config, "fallbackPtBr", Some("en")), Translation::Missing);
        assert_eq!(lookup(&config, "test", Some("en")), Translation::Found("Test"));
    }

    #[test]
    fn test_lookup_missing_everywhere() {
        let config = config();
        assert_eq!(lookup(&config, "nonExistent", Some("en")), Translation::Missing);
    }

    #[test]
    fn test_lookup_group_node_falls_through() {
        let config = config();
        assert_eq!(lookup(&config, "nested", Some("en")), Translation::Missing);
        assert_eq!(lookup(&config, "nested", None), Translation::Missing);
    }

    #[test]
    fn test_lookup_passthrough() {
        let config = config();
        assert_eq!(lookup(&config, "", Some("en")), Translation::Passthrough);
        assert_eq!(lookup(&config, "Already translated", None), Translation::Passthrough);
    }

    #[test]
    fn test_lookup_locale_is_a_single_key() {
        let config = ValidatedConfig::validate(
            I18nOptions::from_value(&json!({
                "messages": { "en": { "a": "A" }, "zh.hant": { "a": "甲" } },
                "defaultLocale": "en"
            }))
            .unwrap(),
        )
        .unwrap();

        assert_eq!(lookup(&config, "a", Some("zh.hant")), Translation::Found("甲"));
    }

    // ==================== translate Tests ====================

    #[test]
    fn test_translate_scenario() {
        let config = ValidatedConfig::validate(
            I18nOptions::from_value(&json!({
                "messages": {
                    "en": { "greet": "Hi" },
                    "pt": { "greet": "Oi", "nested": { "msg": "Msg" } }
                },
                "defaultLocale": "en"
            }))
            .unwrap(),
        )
        .unwrap();
        let metrics = TranslationMetrics::new();

        assert_eq!(translate(&config, &metrics, "greet", Some("pt")), "Oi");
        assert_eq!(translate(&config, &metrics, "nested.msg", Some("en")), "nested.msg");
        assert_eq!(translate(&config, &metrics, "nested", Some("pt")), "nested");
    }

    #[test]
    fn test_translate_records_outcomes() {
        let config = config();
        let metrics = TranslationMetrics::new();

        translate(&config, &metrics, "test", Some("en"));
        translate(&config, &metrics, "fallbackPtBr", Some("en"));
        translate(&config, &metrics, "missing", Some("en"));
        translate(&config, &metrics, "not a key", Some("en"));

        assert_eq!(metrics.hits(), 1);
        assert_eq!(metrics.fallbacks(), 1);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.passthroughs(), 1);
    }

    #[test]
    fn test_translate_warnings_do_not_change_results() {
        let quiet = config();
        let noisy = config_with(json!({ "warnOnFallback": true, "warnOnMissing": true }));
        let metrics = TranslationMetrics::new();

        for key in ["test", "fallbackPtBr", "missing", "nested", "two words"] {
            assert_eq!(
                translate(&quiet, &metrics, key, Some("en")),
                translate(&noisy, &metrics, key, Some("en"))
            );
        }
    }

    // ==================== Diagnostics Tests ====================

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `translate` for `keyref` in "en" under a capturing subscriber and
    /// return what was logged.
    fn logs_for(config: &ValidatedConfig, keyref: &str) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            translate(config, &TranslationMetrics::new(), keyref, Some("en"));
        });

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_warn_on_fallback_enabled() {
        let config = config_with(json!({ "warnOnFallback": true }));
        let logs = logs_for(&config, "fallbackPtBr");

        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("en.fallbackPtBr"), "logs: {}", logs);
        assert!(logs.contains("\"pt-br\" as fallback"), "logs: {}", logs);
    }

    #[test]
    fn test_warn_on_fallback_disabled() {
        let config = config_with(json!({ "warnOnFallback": false, "warnOnMissing": true }));
        assert_eq!(logs_for(&config, "fallbackPtBr"), "");
    }

    #[test]
    fn test_warn_on_missing_enabled() {
        let config = config_with(json!({ "warnOnMissing": true }));
        let logs = logs_for(&config, "nonExistent");

        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("no translation for key \"en.nonExistent\""), "logs: {}", logs);
    }

    #[test]
    fn test_warn_on_missing_disabled() {
        let config = config_with(json!({ "warnOnMissing": false, "warnOnFallback": true }));
        assert_eq!(logs_for(&config, "nonExistent"), "");
    }

    #[test]
    fn test_hits_and_passthroughs_are_silent() {
        let config = config_with(json!({ "warnOnFallback": true, "warnOnMissing": true }));
        assert_eq!(logs_for(&config, "test"), "");
        assert_eq!(logs_for(&config, "two words"), "");
    }

    // ==================== translate_value Tests ====================

    #[test]
    fn test_translate_value_strings() {
        let config = config();
        let metrics = TranslationMetrics::new();
        assert_eq!(
            translate_value(&config, &metrics, &json!("test"), Some("en")),
            json!("Test")
        );
    }

    #[test]
    fn test_translate_value_identity_for_non_strings() {
        let config = config();
        let metrics = TranslationMetrics::new();

        for value in [
            Value::Null,
            json!(42),
            json!(true),
            json!(["test"]),
            json!({ "key": "test" }),
        ] {
            assert_eq!(translate_value(&config, &metrics, &value, None), value);
        }
        assert_eq!(metrics.passthroughs(), 5);
    }
}
