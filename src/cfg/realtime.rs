#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the live driver handles epochs that arrived while
/// the previous one was still being processed.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BacklogPolicy {
    /// Drop pending epochs and only process the most recent one.
    #[default]
    SkipToLatest,
    /// Process every queued epoch in arrival order.
    Sequential,
}

const fn default_queue_capacity() -> usize {
    16
}

const fn default_poll_interval_ms() -> u64 {
    100
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RealtimeOpts {
    /// [BacklogPolicy]
    #[cfg_attr(feature = "serde", serde(default))]
    pub backlog: BacklogPolicy,
    /// Maximal number of epochs waiting to be processed.
    /// Epochs arriving on a full queue are dropped.
    #[cfg_attr(feature = "serde", serde(default = "default_queue_capacity"))]
    pub queue_capacity: usize,
    /// Shutdown flag polling period (ms) while the stream is idle.
    #[cfg_attr(feature = "serde", serde(default = "default_poll_interval_ms"))]
    pub poll_interval_ms: u64,
}

impl Default for RealtimeOpts {
    fn default() -> Self {
        Self {
            backlog: BacklogPolicy::default(),
            queue_capacity: default_queue_capacity(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
