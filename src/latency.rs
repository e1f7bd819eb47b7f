use std::time::{Duration, Instant};

use tracing::trace;

/// Named timestamp recorded relative to tracker construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyEvent {
    pub name: String,
    pub offset: Duration,
}

/// Records named events within one query's lifetime and reports the time to
/// the first user-visible result.
///
/// Purely observational: a missing mark degrades the reported metric to
/// `None` and never affects aggregation.
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    start: Instant,
    events: Vec<LatencyEvent>,
    user_visible: Option<Duration>,
}

impl LatencyTracker {
    /// Start tracking at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            events: Vec::new(),
            user_visible: None,
        }
    }

    /// Record a named event at the current offset from construction.
    pub fn add_event(&mut self, name: impl Into<String>) {
        let event = LatencyEvent {
            name: name.into(),
            offset: self.start.elapsed(),
        };
        trace!(name = %event.name, offset_ms = event.offset.as_millis() as u64, "latency event");
        self.events.push(event);
    }

    /// Latch the instant the first user-visible output was produced.
    ///
    /// Later calls are ignored; the metric reflects the first visible result.
    pub fn mark_user_visible(&mut self) {
        if self.user_visible.is_none() {
            self.user_visible = Some(self.start.elapsed());
        }
    }

    /// Elapsed time to the first user-visible output, if it was marked.
    #[must_use]
    pub fn user_visible_latency(&self) -> Option<Duration> {
        self.user_visible
    }

    /// All recorded events, in recording order.
    #[must_use]
    pub fn events(&self) -> &[LatencyEvent] {
        &self.events
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_in_order_with_monotonic_offsets() {
        let mut tracker = LatencyTracker::new();
        tracker.add_event("query_dispatched");
        tracker.add_event("shortcuts_shown");

        let events = tracker.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "query_dispatched");
        assert_eq!(events[1].name, "shortcuts_shown");
        assert!(events[0].offset <= events[1].offset);
    }

    #[test]
    fn first_visible_mark_wins() {
        let mut tracker = LatencyTracker::new();
        assert_eq!(tracker.user_visible_latency(), None);

        tracker.mark_user_visible();
        let first = tracker.user_visible_latency().unwrap();
        tracker.mark_user_visible();
        assert_eq!(tracker.user_visible_latency(), Some(first));
    }

    #[test]
    fn missing_mark_degrades_to_none() {
        let mut tracker = LatencyTracker::new();
        tracker.add_event("query_dispatched");
        assert_eq!(tracker.user_visible_latency(), None);
    }
}
