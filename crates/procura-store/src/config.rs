//! # Store Configuration
//!
//! Configuration for a store session.
//!
//! The store takes explicit paths rather than guessing platform
//! directories; the embedding application decides where session state
//! lives.

use std::path::{Path, PathBuf};

/// File name of the queue snapshot inside a session data directory.
///
/// The snapshot is an opaque serialized array of queue entries, persisted
/// under this fixed key across sessions.
pub const QUEUE_SNAPSHOT_FILE: &str = "po_queue.json";

/// Configuration for a [`ProcuraStore`](crate::ProcuraStore) session.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Where the queue snapshot is persisted across restarts.
    pub queue_snapshot_path: PathBuf,

    /// Buffered capacity of the change-notification channel.
    /// Slow subscribers that fall further behind miss (lag) messages and
    /// should do a full refresh when that happens.
    pub channel_capacity: usize,
}

impl StoreConfig {
    /// Creates a config with an explicit snapshot path.
    pub fn new(queue_snapshot_path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            queue_snapshot_path: queue_snapshot_path.into(),
            channel_capacity: 64,
        }
    }

    /// Creates a config pointing at the conventional snapshot file inside
    /// a session data directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        StoreConfig::new(data_dir.as_ref().join(QUEUE_SNAPSHOT_FILE))
    }

    /// Sets the change-notification channel capacity.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}
