//! Configuration errors.
//!
//! Validation is the only fallible step in the crate. Lookups, fallback and
//! locale selection always produce a value, so a missing translation can never
//! fail a request.

use thiserror::Error;

/// Reasons a set of options was rejected.
///
/// Returned by construction and by reconfiguration. A rejected
/// reconfiguration leaves the previously active configuration in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The raw options were not a JSON object.
    #[error("i18n options must be an object")]
    NotAnObject,

    /// A known option had the wrong type.
    #[error("i18n option `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("i18n option `messages` is required")]
    MissingMessages,

    #[error("i18n option `messages` must contain at least one locale")]
    EmptyMessages,

    #[error("i18n option `defaultLocale` is required")]
    MissingDefaultLocale,

    #[error("i18n option `defaultLocale` must not be empty")]
    EmptyDefaultLocale,

    /// `defaultLocale` names a locale with no catalog entry.
    #[error("default locale '{0}' has no entry in `messages`")]
    UnknownDefaultLocale(String),

    /// The default locale's catalog entry is not a nested message object.
    #[error("messages for default locale '{0}' must be an object")]
    DefaultLocaleNotTree(String),

    /// A locale source was configured with an empty field name.
    #[error("locale source `{0}` must name a non-empty field")]
    EmptyLocaleSource(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_option() {
        assert!(ConfigError::MissingMessages.to_string().contains("messages"));
        assert!(ConfigError::EmptyDefaultLocale
            .to_string()
            .contains("defaultLocale"));
        assert!(ConfigError::UnknownDefaultLocale("fr".to_string())
            .to_string()
            .contains("'fr'"));
    }

    #[test]
    fn test_invalid_field_includes_reason() {
        let err = ConfigError::InvalidField {
            field: "allowFallback",
            reason: "expected a boolean".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "i18n option `allowFallback` is invalid: expected a boolean"
        );
    }
}
