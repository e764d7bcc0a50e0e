//! Bounded episodic log: fixed-capacity FIFO of pipeline output records.

use std::collections::VecDeque;

use crate::record::EpisodeRecord;

/// Ordered record buffer; the oldest record is evicted once capacity is
/// exceeded. Persistence is a collaborator's concern (see `emota-store`).
pub struct EpisodeLog {
    capacity: usize,
    episodes: VecDeque<EpisodeRecord>,
}

impl EpisodeLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            episodes: VecDeque::new(),
        }
    }

    /// Seed a log from already-persisted records, keeping only the tail
    /// that fits the capacity.
    pub fn from_records(capacity: usize, records: Vec<EpisodeRecord>) -> Self {
        let mut log = Self::new(capacity);
        for record in records {
            log.push(record);
        }
        log
    }

    pub fn push(&mut self, record: EpisodeRecord) {
        self.episodes.push_back(record);
        while self.episodes.len() > self.capacity {
            self.episodes.pop_front();
        }
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&EpisodeRecord> {
        let start = self.episodes.len().saturating_sub(n);
        self.episodes.iter().skip(start).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EpisodeRecord> {
        self.episodes.iter()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braid::SignalInputs;
    use crate::unity::{ExperienceContext, UnityEngine};

    fn record(label: &str) -> EpisodeRecord {
        let mut engine = UnityEngine::new("log-test");
        engine.process(label, &SignalInputs::default(), &ExperienceContext::default())
    }

    #[test]
    fn test_eviction_is_fifo() {
        let mut log = EpisodeLog::new(3);
        for i in 0..5 {
            log.push(record(&format!("episode {i}")));
        }
        assert_eq!(log.len(), 3);
        let contents: Vec<&str> = log.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["episode 2", "episode 3", "episode 4"]);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut log = EpisodeLog::new(10);
        for i in 0..6 {
            log.push(record(&format!("episode {i}")));
        }
        let recent: Vec<&str> = log.recent(2).iter().map(|r| r.content.as_str()).collect();
        assert_eq!(recent, vec!["episode 4", "episode 5"]);
    }

    #[test]
    fn test_from_records_truncates_to_tail() {
        let records: Vec<EpisodeRecord> =
            (0..5).map(|i| record(&format!("episode {i}"))).collect();
        let log = EpisodeLog::from_records(2, records);
        assert_eq!(log.len(), 2);
        let contents: Vec<&str> = log.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["episode 3", "episode 4"]);
    }

    #[test]
    fn test_recent_more_than_len() {
        let mut log = EpisodeLog::new(10);
        log.push(record("only"));
        assert_eq!(log.recent(5).len(), 1);
    }
}
