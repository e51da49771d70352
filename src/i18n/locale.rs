//! Per-request locale selection.
//!
//! A request may name its locale in a header, a body field or a query
//! parameter. The first of those (in that order) holding a non-empty string
//! wins; otherwise the default locale is used.

use crate::i18n::key_path::resolve;
use crate::i18n::ValidatedConfig;
use serde_json::Value;
use std::collections::HashMap;

/// The parts of a request that may carry a locale.
///
/// Each source is independent and may be absent. Header names are matched
/// case-insensitively; query parameters and body fields are matched exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSignals {
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Option<Value>,
}

impl RequestSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Body field by (possibly dotted) name. Only string values count.
    pub fn body_field(&self, name: &str) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| resolve(name, body).text())
    }
}

/// Pick the locale for a request.
///
/// Precedence: header, body field, query parameter, default locale. The
/// chosen tag is not checked against the catalog; unknown locales are handled
/// by fallback at translation time.
pub fn resolve_locale(signals: &RequestSignals, config: &ValidatedConfig) -> String {
    let sources = config.locale_sources();

    [
        signals.header(&sources.header),
        signals.body_field(&sources.body),
        signals.query(&sources.query),
    ]
    .into_iter()
    .flatten()
    .find(|locale| !locale.is_empty())
    .unwrap_or(config.default_locale())
    .to_string()
}
