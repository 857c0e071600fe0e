//! slirc-replacer - sed-style message correction for IRC channels.
//!
//! Users fix their (or someone else's) last message with a directive such
//! as `s/teh/the/` or `bob: s/cat/dog/g`. The [`replacer::Replacer`] finds
//! the newest matching message in channel history and announces the
//! corrected text. User patterns are untrusted, so every regex run is
//! bounded by both a backtrack limit and a wall-clock deadline.

pub mod config;
pub mod error;
pub mod history;
pub mod ignore;
pub mod metrics;
pub mod relay;
pub mod replacer;
pub mod telemetry;

pub use config::Config;
pub use error::ReplacerError;
pub use history::{HistoryLog, RingHistory};
pub use relay::Relay;
pub use replacer::{Directive, Replacer, Reply, SearchOutcome};
