//! Tunables the spec leaves implementation-defined within stated ranges.

use std::time::Duration;

/// Configuration for the Dispatcher's internal queues, the selector
/// engine's poll quantum, and related constants named in the spec as
/// "implementation-defined within the stated ranges".
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Capacity of the events queue. Spec suggests >= 1024; a full queue
    /// is a fatal invariant violation (§4.3).
    pub events_queue_capacity: usize,
    /// Capacity of the responses queue. Spec suggests >= 64.
    pub responses_queue_capacity: usize,
    /// Capacity of the commands-out queue. Spec suggests >= 64.
    pub commands_queue_capacity: usize,
    /// Capacity of a single `Listen` subscriber stream (§4.5, suggested
    /// 16). A full subscriber buffer drops further events for that
    /// subscriber only.
    pub listen_capacity: usize,
    /// The selector engine's poll quantum. Must stay within [1ms, 50ms]
    /// (§4.6).
    pub selector_quantum: Duration,
    /// Internal deadline for `WaitFrame`/`WaitNode` (§4.4), a
    /// last-resort guard independent of any caller-supplied deadline.
    pub wait_node_deadline: Duration,
    /// CDP domains enabled on Dispatcher startup (§4.3).
    pub initial_domains: Vec<&'static str>,
}

impl DriverConfig {
    /// Builder-style setter, clamping the quantum to the spec's allowed
    /// range.
    pub fn with_selector_quantum(mut self, quantum: Duration) -> Self {
        let min = Duration::from_millis(1);
        let max = Duration::from_millis(50);
        self.selector_quantum = quantum.clamp(min, max);
        self
    }

    pub fn with_listen_capacity(mut self, capacity: usize) -> Self {
        self.listen_capacity = capacity.max(1);
        self
    }

    pub fn with_events_queue_capacity(mut self, capacity: usize) -> Self {
        self.events_queue_capacity = capacity.max(1);
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            events_queue_capacity: 1024,
            responses_queue_capacity: 64,
            commands_queue_capacity: 64,
            listen_capacity: 16,
            selector_quantum: Duration::from_millis(5),
            wait_node_deadline: Duration::from_secs(10),
            initial_domains: vec!["Log", "Runtime", "Network", "Inspector", "Page", "DOM", "CSS"],
        }
    }
}
