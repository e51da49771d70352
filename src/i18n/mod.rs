//! Message catalog translation.
//!
//! Resolves a dotted key such as `nested.secondLevel.msg` against a nested
//! per-locale message catalog, falling back to the default locale when the
//! requested one lacks the key.
//!
//! # Architecture
//!
//! - `options`: Raw options, defaults and validation into an immutable `ValidatedConfig`
//! - `key_path`: Dotted-path walk through a message tree
//! - `translator`: Lookup and fallback policy against one configuration snapshot
//! - `locale`: Locale selection from request headers, body and query
//! - `engine`: Shared `I18n` handle with atomic reconfiguration
//! - `metrics`: Per-engine translation counters
//!
//! # Example
//!
//! ```rust
//! use rest_i18n::i18n::{I18n, RequestSignals};
//! use serde_json::json;
//!
//! let i18n = I18n::from_value(&json!({
//!     "messages": {
//!         "en": { "greet": "Hi" },
//!         "pt": { "greet": "Oi", "nested": { "msg": "Msg" } }
//!     },
//!     "defaultLocale": "en"
//! }))
//! .unwrap();
//!
//! assert_eq!(i18n.translate("greet", Some("pt")), "Oi");
//! assert_eq!(i18n.translate("nested", Some("pt")), "nested");
//!
//! let request = i18n.bind(&RequestSignals::new().with_query("locale", "pt"));
//! assert_eq!(request.t("greet"), "Oi");
//! ```

mod engine;
mod error;
mod key_path;
mod locale;
mod metrics;
mod options;
mod translator;

pub use engine::{I18n, RequestI18n};
pub use error::ConfigError;
pub use key_path::{resolve, Resolved};
pub use locale::{resolve_locale, RequestSignals};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use options::{
    Catalog, I18nOptions, LocaleSourceOptions, LocaleSources, ValidatedConfig,
    DEFAULT_LOCALE_BODY, DEFAULT_LOCALE_HEADER, DEFAULT_LOCALE_QUERY,
};
pub use translator::{is_translatable_key, lookup, Translation};
