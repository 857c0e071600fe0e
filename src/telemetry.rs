//! Tracing setup.
//!
//! Logs go to stderr so stdout stays a clean stream of IRC lines.
//! `RUST_LOG` overrides the default `info` filter.

use tracing::{Span, info_span};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}

/// Span covering one directive.
pub fn directive_span(channel: &str, nick: &str) -> Span {
    info_span!("directive", channel = %channel, nick = %nick)
}
