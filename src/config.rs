use crate::i18n::I18nOptions;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Config {
    // Catalog
    pub messages_file: String,
    pub default_locale: String,

    // Fallback policy and diagnostics
    pub allow_fallback: bool,
    pub warn_on_fallback: bool,
    pub warn_on_missing: bool,

    // Request fields carrying the locale (None keeps the engine default)
    pub locale_header: Option<String>,
    pub locale_query: Option<String>,
    pub locale_body: Option<String>,

    // Web server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            messages_file: std::env::var("I18N_MESSAGES_FILE")
                .context("I18N_MESSAGES_FILE not set")?,
            default_locale: std::env::var("I18N_DEFAULT_LOCALE")
                .context("I18N_DEFAULT_LOCALE not set")?,

            allow_fallback: env_flag("I18N_ALLOW_FALLBACK", true)?,
            warn_on_fallback: env_flag("I18N_WARN_ON_FALLBACK", false)?,
            warn_on_missing: env_flag("I18N_WARN_ON_MISSING", false)?,

            locale_header: std::env::var("I18N_LOCALE_HEADER").ok(),
            locale_query: std::env::var("I18N_LOCALE_QUERY").ok(),
            locale_body: std::env::var("I18N_LOCALE_BODY").ok(),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }

    /// Engine options built from this config, reading the catalog file.
    pub fn i18n_options(&self) -> Result<I18nOptions> {
        let catalog = load_catalog(Path::new(&self.messages_file))?;
        let mut options = I18nOptions::default();

        options.messages = match catalog {
            Value::Object(messages) => Some(messages),
            _ => bail!("Catalog {} must be a JSON object", self.messages_file),
        };
        options.default_locale = Some(self.default_locale.clone());
        options.allow_fallback = Some(self.allow_fallback);
        options.warn_on_fallback = Some(self.warn_on_fallback);
        options.warn_on_missing = Some(self.warn_on_missing);
        options.locale_sources.header = self.locale_header.clone();
        options.locale_sources.query = self.locale_query.clone();
        options.locale_sources.body = self.locale_body.clone();

        Ok(options)
    }
}

/// Read a JSON catalog (locale tag -> message tree) from disk.
pub fn load_catalog(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read catalog at {}", path.display()))?;
    serde_json::from_str(&contents)
        .context(format!("Failed to parse catalog at {}", path.display()))
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => bail!("{} must be a boolean, got '{}'", name, other),
        },
    }
}
