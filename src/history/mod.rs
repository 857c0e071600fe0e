//! History log abstraction.
//!
//! The replacer reads history newest-first and tags entries; it never
//! appends or removes. Appending belongs to whatever receives messages.

use std::sync::Arc;

pub mod memory;
pub mod types;

pub use memory::RingHistory;
pub use types::{EntryKind, HistoryEntry, MessageId, NewMessage};

pub trait HistoryLog: Send + Sync {
    /// Record a received message and return its id.
    fn append(&self, message: NewMessage) -> MessageId;

    /// Current contents, oldest first. Entries are shared, so later tags
    /// remain visible through the snapshot.
    fn snapshot(&self) -> Vec<Arc<HistoryEntry>>;

    /// Tag an entry as a directive or replacer output. Idempotent; returns
    /// `false` if the entry has already been evicted.
    fn mark_replacer_output(&self, id: MessageId) -> bool;

    /// Number of messages currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
