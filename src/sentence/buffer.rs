use crate::defaults;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Bounded, ordered sequence of recently recognized labels.
///
/// Oldest entries are evicted first once capacity is reached, and a label equal
/// to the most recent entry is dropped so a held sign is recorded once.
#[derive(Debug, Clone)]
pub struct SentenceBuffer {
    labels: VecDeque<String>,
    capacity: usize,
}

impl Default for SentenceBuffer {
    fn default() -> Self {
        Self::new(defaults::SENTENCE_CAPACITY)
    }
}

impl SentenceBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `label` unless it repeats the last entry. Returns whether it was stored.
    pub fn push(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.labels.back() == Some(&label) {
            return false;
        }
        if self.labels.len() == self.capacity {
            self.labels.pop_front();
        }
        self.labels.push_back(label);
        true
    }

    /// True when there is enough to interpret and the rate limit has passed.
    ///
    /// `last_analysis == None` counts as infinitely long ago.
    pub fn should_analyze(
        &self,
        now: Instant,
        last_analysis: Option<Instant>,
        min_interval: Duration,
    ) -> bool {
        if self.labels.len() < defaults::MIN_ANALYSIS_LABELS {
            return false;
        }
        match last_analysis {
            Some(last) => now.saturating_duration_since(last) >= min_interval,
            None => true,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&str> {
        self.labels.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(labels: &[&str]) -> SentenceBuffer {
        let mut buffer = SentenceBuffer::default();
        for label in labels {
            buffer.push(*label);
        }
        buffer
    }

    #[test]
    fn suppresses_adjacent_duplicates() {
        let buffer = buffer_with(&["Hello", "Hello"]);
        assert_eq!(buffer.labels(), vec!["Hello"]);
    }

    #[test]
    fn allows_non_adjacent_repeats() {
        let buffer = buffer_with(&["Hello", "You", "Hello"]);
        assert_eq!(buffer.labels(), vec!["Hello", "You", "Hello"]);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut buffer = SentenceBuffer::default();
        for i in 0..25 {
            buffer.push(i.to_string());
            assert!(buffer.len() <= 10);
        }
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.labels().first().map(String::as_str), Some("15"));
        assert_eq!(buffer.last(), Some("24"));
    }

    #[test]
    fn never_stores_adjacent_duplicates() {
        let mut buffer = SentenceBuffer::new(4);
        for label in ["A", "A", "B", "B", "B", "A", "C", "C", "A", "A"] {
            buffer.push(label);
        }
        let labels = buffer.labels();
        assert!(labels.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(labels, vec!["B", "A", "C", "A"]);
    }

    #[test]
    fn should_analyze_needs_two_labels() {
        let now = Instant::now();
        let interval = Duration::from_millis(3000);
        let one = buffer_with(&["Hello"]);
        assert!(!one.should_analyze(now, None, interval));

        let two = buffer_with(&["Hello", "How are you?"]);
        assert!(two.should_analyze(now, None, interval));
    }

    #[test]
    fn should_analyze_respects_interval() {
        let start = Instant::now();
        let interval = Duration::from_millis(3000);
        let buffer = buffer_with(&["Hello", "How are you?"]);

        assert!(!buffer.should_analyze(start + Duration::from_millis(2999), Some(start), interval));
        assert!(buffer.should_analyze(start + Duration::from_millis(3000), Some(start), interval));
        assert!(buffer.should_analyze(start + Duration::from_millis(4500), Some(start), interval));
    }

    #[test]
    fn clock_going_backwards_is_not_elapsed() {
        let start = Instant::now() + Duration::from_secs(10);
        let buffer = buffer_with(&["A", "B"]);
        assert!(!buffer.should_analyze(Instant::now(), Some(start), Duration::from_millis(1)));
    }

    #[test]
    fn clear_empties() {
        let mut buffer = buffer_with(&["A", "B"]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.push("A"));
    }
}
