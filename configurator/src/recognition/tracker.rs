//! Stale recognition guard
//!
//! Every upload takes a ticket. Only the result carrying the latest ticket may
//! be applied; anything older resolved after a newer upload started.

/// Identifies one recognition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecognitionTicket(u64);

impl RecognitionTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RecognitionTracker {
    latest: u64,
    in_flight: bool,
}

impl RecognitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any request in flight
    pub fn issue(&mut self) -> RecognitionTicket {
        self.latest += 1;
        self.in_flight = true;
        RecognitionTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RecognitionTicket) -> bool {
        self.in_flight && ticket.0 == self.latest
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight
    }

    /// Close the request of `ticket`; `false` means the result is stale
    pub fn finish(&mut self, ticket: RecognitionTicket) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!(ticket = ticket.0, latest = self.latest, "Dropping stale recognition result");
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Forget the request in flight; its result will be dropped
    pub fn cancel(&mut self) {
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_applies() {
        let mut tracker = RecognitionTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(!tracker.is_current(first));
        assert!(!tracker.finish(first));
        assert!(tracker.is_pending());
        assert!(tracker.finish(second));
        assert!(!tracker.is_pending());
        // A ticket finishes once
        assert!(!tracker.finish(second));
    }

    #[test]
    fn test_cancel_drops_in_flight() {
        let mut tracker = RecognitionTracker::new();
        let ticket = tracker.issue();
        tracker.cancel();
        assert!(!tracker.finish(ticket));
        assert!(tracker.issue() > ticket);
    }
}
