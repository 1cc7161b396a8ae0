//! Availability Tracking
//!
//! Records which clip labels resolved to an existing source file and which
//! did not. Membership only: marking the same label twice is a no-op, and
//! insertion order never leaks into the report.

use std::collections::HashSet;

use crate::component::component_key;

/// Deduplicated sets of available and unavailable clip labels.
#[derive(Debug, Default)]
pub struct AvailabilityTracker {
    available: HashSet<String>,
    unavailable: HashSet<String>,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_available(&mut self, label: &str) {
        self.available.insert(label.to_string());
    }

    pub fn mark_unavailable(&mut self, label: &str) {
        self.unavailable.insert(label.to_string());
    }

    /// Available labels, sorted by performer-then-label key.
    pub fn sorted_available(&self) -> Vec<String> {
        sorted_by_component_key(&self.available)
    }

    /// Unavailable labels, sorted by performer-then-label key.
    pub fn sorted_unavailable(&self) -> Vec<String> {
        sorted_by_component_key(&self.unavailable)
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn unavailable_count(&self) -> usize {
        self.unavailable.len()
    }
}

fn sorted_by_component_key(labels: &HashSet<String>) -> Vec<String> {
    let mut sorted: Vec<String> = labels.iter().cloned().collect();
    sorted.sort_by_key(|label| component_key(label));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_marking_twice_yields_single_entry() {
        let mut tracker = AvailabilityTracker::new();
        tracker.mark_available("Apple [Beau]");
        tracker.mark_available("Apple [Beau]");

        assert_eq!(tracker.sorted_available(), vec!["Apple [Beau]"]);
        assert_eq!(tracker.available_count(), 1);
    }

    #[test]
    fn test_sorted_by_performer_then_label() {
        let mut tracker = AvailabilityTracker::new();
        tracker.mark_unavailable("Zebra [Ana]");
        tracker.mark_unavailable("Apple [Beau]");
        tracker.mark_unavailable("Mango [Ana]");

        // Ana's clips come before Beau's regardless of label order.
        assert_eq!(
            tracker.sorted_unavailable(),
            vec!["Mango [Ana]", "Zebra [Ana]", "Apple [Beau]"]
        );
    }

    #[test]
    fn test_available_and_unavailable_are_independent() {
        let mut tracker = AvailabilityTracker::new();
        tracker.mark_available("Apple [Beau]");
        tracker.mark_unavailable("Apple [Beau]");

        assert_eq!(tracker.available_count(), 1);
        assert_eq!(tracker.unavailable_count(), 1);
    }

    #[test]
    fn test_bracketless_label_sorts_by_itself() {
        let mut tracker = AvailabilityTracker::new();
        tracker.mark_available("apple, no brackets");
        tracker.mark_available("Zebra [Ana]");

        // Key for a bracketless label is the label itself ("" ++ label),
        // which here sorts after "AnaZebra [Ana]".
        assert_eq!(
            tracker.sorted_available(),
            vec!["Zebra [Ana]", "apple, no brackets"]
        );
    }
}
