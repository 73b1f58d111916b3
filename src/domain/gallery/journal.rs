//! Bounded, newest-first journal of generated images.

use serde::{Deserialize, Serialize};

use super::record::GeneratedImageRecord;

/// Maximum number of records the journal keeps.
pub const JOURNAL_CAPACITY: usize = 50;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageJournal {
    records: Vec<GeneratedImageRecord>,
}

impl ImageJournal {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn records(&self) -> &[GeneratedImageRecord] { &self.records }
    pub fn into_records(self) -> Vec<GeneratedImageRecord> { self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn newest(&self) -> Option<&GeneratedImageRecord> { self.records.first() }

    /// Highest numeric id in the journal that does not exceed `ceiling`.
    pub fn max_sequence(&self, ceiling: u64) -> Option<u64> {
        self.records.iter().filter_map(GeneratedImageRecord::sequence).filter(|&id| id <= ceiling).max()
    }

    /// Puts `record` in front and returns whatever no longer fits, oldest last.
    pub fn prepend(&mut self, record: GeneratedImageRecord) -> Vec<GeneratedImageRecord> {
        self.records.insert(0, record);
        if self.records.len() > JOURNAL_CAPACITY {
            self.records.split_off(JOURNAL_CAPACITY)
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: u64) -> GeneratedImageRecord {
        GeneratedImageRecord {
            id: id.to_string(),
            file_name: format!("ai-generated-{id}.jpg"),
            local_url: format!("/generated-images/ai-generated-{id}.jpg"),
            original_url: "https://example.com/out.jpg".into(),
            prompt: "studio shot".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut journal = ImageJournal::default();
        for id in 1..=3 {
            assert!(journal.prepend(record(id)).is_empty());
        }
        let ids: Vec<_> = journal.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["3", "2", "1"]);
        assert_eq!(journal.max_sequence(u64::MAX), Some(3));
        assert_eq!(journal.max_sequence(2), Some(2));
        assert_eq!(journal.max_sequence(0), None);
    }

    #[test]
    fn test_prepend_evicts_oldest_past_capacity() {
        let mut journal = ImageJournal::default();
        for id in 1..=JOURNAL_CAPACITY as u64 {
            journal.prepend(record(id));
        }
        let evicted = journal.prepend(record(51));
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        assert_eq!(journal.newest().map(|r| r.id.as_str()), Some("51"));
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, "1");
    }

    #[test]
    fn test_json_is_a_plain_array() {
        let mut journal = ImageJournal::default();
        journal.prepend(record(7));
        let json = journal.to_json().unwrap();
        assert!(json.trim_start().starts_with('['));
        assert_eq!(ImageJournal::from_json(&json).unwrap(), journal);
        assert!(ImageJournal::from_json("{not json").is_err());
    }
}
