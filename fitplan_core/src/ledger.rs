//! Body-weight progress ledger, kept sorted ascending by date.

use crate::ProgressEntry;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressLedger {
    entries: Vec<ProgressEntry>,
}

impl ProgressLedger {
    /// Build from stored entries, restoring the sort order in case the
    /// snapshot was edited by hand.
    pub fn from_entries(mut entries: Vec<ProgressEntry>) -> Self {
        entries.sort_by_key(|e| e.date);
        Self { entries }
    }

    /// Insert and re-sort. Equal dates keep insertion order.
    pub fn add(&self, entry: ProgressEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        // sort_by_key is stable
        entries.sort_by_key(|e| e.date);
        Self { entries }
    }

    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&ProgressEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&ProgressEntry> {
        self.entries.last()
    }

    pub fn latest_weight(&self) -> Option<f64> {
        self.last().map(|e| e.weight)
    }

    /// `last - first`; None with fewer than two entries
    pub fn net_change(&self) -> Option<f64> {
        if self.entries.len() < 2 {
            return None;
        }
        Some(self.last()?.weight - self.first()?.weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(date: &str, weight: f64) -> ProgressEntry {
        ProgressEntry {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            weight,
        }
    }

    #[test]
    fn test_add_keeps_ascending_order() {
        let ledger = ProgressLedger::default()
            .add(entry("2024-01-10", 80.0))
            .add(entry("2024-01-05", 82.0));
        assert_eq!(
            ledger.entries(),
            &[entry("2024-01-05", 82.0), entry("2024-01-10", 80.0)]
        );
    }

    #[test]
    fn test_equal_dates_keep_insertion_order() {
        let ledger = ProgressLedger::default()
            .add(entry("2024-01-05", 81.0))
            .add(entry("2024-01-01", 83.0))
            .add(entry("2024-01-05", 80.5));
        let weights: Vec<f64> = ledger.entries().iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![83.0, 81.0, 80.5]);
    }

    #[test]
    fn test_net_change() {
        let empty = ProgressLedger::default();
        assert!(empty.first().is_none());
        assert!(empty.net_change().is_none());

        let one = empty.add(entry("2024-02-01", 90.0));
        assert_eq!(one.first(), one.last());
        assert!(one.net_change().is_none());

        let two = one.add(entry("2024-03-01", 87.5));
        assert_eq!(two.net_change(), Some(-2.5));
        assert_eq!(two.latest_weight(), Some(87.5));
    }

    #[test]
    fn test_add_does_not_mutate_previous() {
        let before = ProgressLedger::default().add(entry("2024-01-10", 80.0));
        let _after = before.add(entry("2024-01-11", 79.0));
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_from_entries_sorts_and_serializes_as_list() {
        let ledger = ProgressLedger::from_entries(vec![
            entry("2024-05-02", 70.0),
            entry("2024-05-01", 71.0),
        ]);
        assert_eq!(ledger.first().unwrap().weight, 71.0);

        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.starts_with('['));
    }
}
