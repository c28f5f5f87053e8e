//! Temporary emphasis on document elements.
//!
//! Each highlighted element carries a deadline. Re-highlighting replaces the
//! deadline, so an element is only ever reverted once per emphasis window.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// How long an element stays emphasized
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Default)]
pub struct Highlights {
    until: HashMap<String, Instant>,
}

impl Highlights {
    /// Emphasize `element_id` until `deadline`, replacing any earlier window
    pub fn emphasize(&mut self, element_id: &str, deadline: Instant) {
        self.until.insert(element_id.to_string(), deadline);
    }

    pub fn is_emphasized(&self, element_id: &str, now: Instant) -> bool {
        self.until
            .get(element_id)
            .is_some_and(|deadline| now < *deadline)
    }

    /// Drop every window that has elapsed, returning the reverted ids
    pub fn expire(&mut self, now: Instant) -> Vec<String> {
        let mut reverted: Vec<String> = self
            .until
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(id, _)| id.clone())
            .collect();
        reverted.sort();
        for id in &reverted {
            self.until.remove(id);
        }
        reverted
    }

    /// Earliest pending revert
    pub fn next_deadline(&self) -> Option<Instant> {
        self.until.values().min().copied()
    }

    /// Drop every window without reporting reverts
    pub fn clear(&mut self) {
        self.until.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.until.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_reverts_exactly_once() {
        let start = Instant::now();
        let mut highlights = Highlights::default();
        highlights.emphasize("edu-10th", start + HIGHLIGHT_DURATION);

        assert!(highlights.is_emphasized("edu-10th", start));
        assert!(highlights.expire(start + Duration::from_millis(3999)).is_empty());

        let end = start + HIGHLIGHT_DURATION;
        assert!(!highlights.is_emphasized("edu-10th", end));
        assert_eq!(highlights.expire(end), vec!["edu-10th".to_string()]);
        assert!(highlights.expire(end + Duration::from_secs(10)).is_empty());
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_retrigger_restarts_window() {
        let start = Instant::now();
        let mut highlights = Highlights::default();
        highlights.emphasize("proj-rn-1", start + HIGHLIGHT_DURATION);

        let again = start + Duration::from_millis(2000);
        highlights.emphasize("proj-rn-1", again + HIGHLIGHT_DURATION);

        // The first window's deadline no longer reverts anything
        assert!(highlights.expire(start + HIGHLIGHT_DURATION).is_empty());
        assert!(highlights.is_emphasized("proj-rn-1", start + HIGHLIGHT_DURATION));

        assert_eq!(highlights.expire(again + HIGHLIGHT_DURATION).len(), 1);
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_next_deadline_is_earliest() {
        let start = Instant::now();
        let mut highlights = Highlights::default();
        highlights.emphasize("a", start + Duration::from_millis(900));
        highlights.emphasize("b", start + Duration::from_millis(300));
        assert_eq!(highlights.next_deadline(), Some(start + Duration::from_millis(300)));
    }
}
