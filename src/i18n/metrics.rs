//! Translation metrics and observability module.
//!
//! Counts how each translation request was answered: straight from the
//! requested locale, from the default locale as a fallback, not at all, or
//! passed through untouched because the key was not translatable.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-engine translation counters.
///
/// Every engine owns its own counters; clones of an engine handle share them.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Keys found in the requested locale
    hits: AtomicUsize,

    /// Keys answered from the default locale
    fallbacks: AtomicUsize,

    /// Keys found nowhere (the key itself was returned)
    misses: AtomicUsize,

    /// Values that were not translatable keys
    passthroughs: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_passthrough(&self) {
        self.passthroughs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn passthroughs(&self) -> usize {
        self.passthroughs.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    ///
    /// Rates are percentages of translatable lookups, so pass-throughs are
    /// excluded from the denominator.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let misses = self.misses();
        let lookups = hits + fallbacks + misses;

        let rate = |count: usize| {
            if lookups > 0 {
                (count as f64 / lookups as f64) * 100.0
            } else {
                0.0
            }
        };

        MetricsReport {
            hits,
            fallbacks,
            misses,
            passthroughs: self.passthroughs(),
            hit_rate: rate(hits),
            fallback_rate: rate(fallbacks),
            miss_rate: rate(misses),
        }
    }
}

/// Snapshot of the translation counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub fallbacks: usize,
    pub misses: usize,
    pub passthroughs: usize,

    /// Hits as a percentage (0-100) of translatable lookups
    pub hit_rate: f64,

    /// Fallbacks as a percentage (0-100) of translatable lookups
    pub fallback_rate: f64,

    /// Misses as a percentage (0-100) of translatable lookups
    pub miss_rate: f64,
}
