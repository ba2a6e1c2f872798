//! Bounded, thread-safe chat log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use termitalk_protocol::Message;

/// Default number of messages kept before the oldest is evicted.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// A chat log capped at a fixed number of entries.
///
/// Cloning is cheap and yields another handle to the same log, so the
/// controller's view can append while a render thread takes snapshots.
/// Every operation holds the lock for its whole duration: readers never see
/// a half-applied push, and the length never exceeds the capacity.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    entries: Mutex<VecDeque<Message>>,
}

impl MessageHistory {
    /// Creates an empty log holding at most `capacity` messages.
    ///
    /// A capacity of 0 is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Inner {
                capacity,
                entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            }),
        }
    }

    /// Appends a message, evicting the oldest one if the log is full.
    pub fn push(&self, message: Message) {
        let mut entries = self.entries();
        if entries.len() == self.inner.capacity {
            entries.pop_front();
        }
        entries.push_back(message);
    }

    /// A copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.entries().iter().cloned().collect()
    }

    /// The most recent `n` messages, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Message> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
