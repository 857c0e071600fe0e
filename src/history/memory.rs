//! Bounded in-memory history.
//!
//! A single ring shared by every channel, like a client's scrollback
//! buffer: once `max_length` is reached the oldest message falls off.

use super::{HistoryEntry, HistoryLog, MessageId, NewMessage};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

struct Ring {
    entries: VecDeque<Arc<HistoryEntry>>,
    next_id: u64,
}

pub struct RingHistory {
    ring: RwLock<Ring>,
    max_length: usize,
}

impl RingHistory {
    /// Create a ring holding at most `max_length` messages (minimum 1).
    pub fn new(max_length: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            ring: RwLock::new(Ring {
                entries: VecDeque::with_capacity(max_length.min(4096)),
                next_id: 1,
            }),
            max_length,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl HistoryLog for RingHistory {
    fn append(&self, message: NewMessage) -> MessageId {
        let mut ring = self.ring.write();
        let id = MessageId(ring.next_id);
        ring.next_id += 1;

        if ring.entries.len() == self.max_length
            && let Some(evicted) = ring.entries.pop_front()
        {
            trace!(id = %evicted.id, channel = %evicted.channel, "History entry evicted");
        }
        ring.entries.push_back(Arc::new(HistoryEntry::new(id, message)));
        id
    }

    fn snapshot(&self) -> Vec<Arc<HistoryEntry>> {
        self.ring.read().entries.iter().cloned().collect()
    }

    fn mark_replacer_output(&self, id: MessageId) -> bool {
        let ring = self.ring.read();
        // Ids are assigned in push order, so the deque is sorted by id.
        match ring.entries.binary_search_by_key(&id, |entry| entry.id) {
            Ok(index) => {
                ring.entries[index].set_replacer_tag();
                true
            }
            Err(_) => false,
        }
    }

    fn len(&self) -> usize {
        self.ring.read().entries.len()
    }
}
