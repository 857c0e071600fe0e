//! Prometheus metrics for the replacer.
//!
//! - `replacer_triggers_total` - directives handled in enabled channels
//! - `replacer_replacements_total` - corrections announced
//! - `replacer_not_found_total` - searches that found nothing
//! - `replacer_errors_total{code}` - failures by [`crate::error::ReplacerError::error_code`]
//! - `replacer_timeouts_total` - match or substitution runs that hit the budget

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Registry holding every replacer metric.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

pub static TRIGGERS: OnceLock<IntCounter> = OnceLock::new();

pub static REPLACEMENTS: OnceLock<IntCounter> = OnceLock::new();

pub static NOT_FOUND: OnceLock<IntCounter> = OnceLock::new();

/// Failures by error code.
pub static ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Subset of errors that were timeouts.
pub static TIMEOUTS: OnceLock<IntCounter> = OnceLock::new();

/// Initialize the metrics registry. Recording before `init` is a no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(TRIGGERS, IntCounter::new("replacer_triggers_total", "Directives handled"));
    register!(REPLACEMENTS, IntCounter::new("replacer_replacements_total", "Corrections announced"));
    register!(NOT_FOUND, IntCounter::new("replacer_not_found_total", "Searches without a match"));
    register!(ERRORS, IntCounterVec::new(Opts::new("replacer_errors_total", "Directive failures by code"), &["code"]));
    register!(TIMEOUTS, IntCounter::new("replacer_timeouts_total", "Regex runs that exceeded their budget"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

#[inline]
pub fn record_trigger() {
    if let Some(c) = TRIGGERS.get() {
        c.inc();
    }
}

#[inline]
pub fn record_replacement() {
    if let Some(c) = REPLACEMENTS.get() {
        c.inc();
    }
}

#[inline]
pub fn record_not_found() {
    if let Some(c) = NOT_FOUND.get() {
        c.inc();
    }
}

/// Record a failed directive under its error code.
#[inline]
pub fn record_error(code: &str) {
    if let Some(c) = ERRORS.get() {
        c.with_label_values(&[code]).inc();
    }
    if code == "timeout"
        && let Some(c) = TIMEOUTS.get()
    {
        c.inc();
    }
}
