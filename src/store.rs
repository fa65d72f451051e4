// 🗃️ Record Store - Immutable in-memory registry
//
// Flat record list (load order, duplicates kept) plus one secondary index:
// classification code → positions of the records sharing that code.
// Built once; there is no mutating API.

use crate::business::BusinessRecord;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<BusinessRecord>,
    by_classification: HashMap<String, Vec<usize>>,
}

impl RecordStore {
    /// Take ownership of the records and build the classification index
    pub fn from_records(records: Vec<BusinessRecord>) -> Self {
        let mut by_classification: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            by_classification
                .entry(record.classification_code.clone())
                .or_default()
                .push(idx);
        }

        debug!(
            records = records.len(),
            groups = by_classification.len(),
            "Built classification index"
        );

        RecordStore {
            records,
            by_classification,
        }
    }

    /// All records in load order
    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact-match lookup in the classification index
    pub fn classification_group(&self, code: &str) -> Option<ClassificationGroup<'_>> {
        self.by_classification
            .get_key_value(code)
            .map(|(code, positions)| ClassificationGroup {
                code,
                positions,
                records: &self.records,
            })
    }

    /// Every group, in no particular order
    pub fn classification_groups(&self) -> impl Iterator<Item = ClassificationGroup<'_>> {
        self.by_classification
            .iter()
            .map(|(code, positions)| ClassificationGroup {
                code,
                positions,
                records: &self.records,
            })
    }

    pub fn group_count(&self) -> usize {
        self.by_classification.len()
    }
}

/// Group - the records sharing one classification code
#[derive(Debug, Clone, Copy)]
pub struct ClassificationGroup<'a> {
    code: &'a str,
    positions: &'a [usize],
    records: &'a [BusinessRecord],
}

impl<'a> ClassificationGroup<'a> {
    pub fn code(&self) -> &'a str {
        self.code
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Groups are created on first record, so never empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BusinessRecord> + 'a {
        let records = self.records;
        let positions = self.positions;
        positions.iter().map(move |&idx| &records[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, zip: &str, code: &str) -> BusinessRecord {
        BusinessRecord::new(
            name,
            "1 Main St",
            "Springfield",
            "IL",
            zip,
            code,
            "Downtown",
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        )
    }

    #[test]
    fn test_groups_partition_records() {
        let store = RecordStore::from_records(vec![
            record("A", "62704", "541110"),
            record("B", "62704", "722511"),
            record("C", "62701", "541110"),
            record("C", "62701", "541110"),
            record("D", "62702", "311811"),
        ]);

        let total: usize = store.classification_groups().map(|g| g.len()).sum();
        assert_eq!(total, store.len());
        assert_eq!(store.group_count(), 3);

        let mut seen: Vec<usize> = store
            .by_classification
            .values()
            .flat_map(|positions| positions.iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_group_lookup_is_exact() {
        let store = RecordStore::from_records(vec![
            record("A", "62704", "541110"),
            record("B", "62704", "541110"),
        ]);

        let group = store.classification_group("541110").unwrap();
        assert_eq!(group.code(), "541110");
        assert_eq!(group.len(), 2);
        let names: Vec<&str> = group.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        assert!(store.classification_group("54111").is_none());
        assert!(store.classification_group(" 541110").is_none());
    }

    #[test]
    fn test_records_keep_load_order_and_duplicates() {
        let store = RecordStore::from_records(vec![
            record("Z", "1", "1"),
            record("A", "1", "1"),
            record("Z", "1", "1"),
        ]);

        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "Z"]);
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::from_records(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.group_count(), 0);
        assert_eq!(store.classification_groups().count(), 0);
    }
}
